use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use derive_more::Display;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::core::config::{ConfigError, Result};
use crate::core::subtitles::parsers::DEFAULT_MICROSEC_PER_FRAME;
use crate::core::subtitles::{SubtitleType, AUTO_DETECT};

/// The amount of microseconds within a tenth of a second.
const MICROS_PER_TENTH: i64 = 100_000;

const DEFAULT_FPS: fn() -> f32 = || 0.0;
const DEFAULT_ORIGINAL_FPS: fn() -> f32 = || 0.0;
const DEFAULT_DELAY: fn() -> i64 = || 0;
const DEFAULT_SUB_TYPE: fn() -> String = || AUTO_DETECT.to_string();
const DEFAULT_DESCRIPTION: fn() -> Option<String> = || None;

/// The settings of the subtitle demuxer.
#[derive(Debug, Display, Clone, Serialize, Deserialize, PartialEq)]
#[display("fps: {}, delay: {}, sub_type: {}", fps, delay, sub_type)]
pub struct DemuxSettings {
    /// The frame rate override, only used when `>= 1.0`.
    #[serde(default = "DEFAULT_FPS")]
    pub fps: f32,
    /// The frame rate of the media, only used when `>= 1.0`.
    #[serde(default = "DEFAULT_ORIGINAL_FPS")]
    pub original_fps: f32,
    /// The initial subtitle delay in tenths of a second.
    #[serde(default = "DEFAULT_DELAY")]
    pub delay: i64,
    /// The subtitle type to use, or `auto` to detect it.
    #[serde(default = "DEFAULT_SUB_TYPE")]
    pub sub_type: String,
    /// Overrides the description of the subtitle track.
    #[serde(default = "DEFAULT_DESCRIPTION")]
    pub description: Option<String>,
}

impl DemuxSettings {
    /// Load the settings from the given JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let filepath = path.to_string_lossy().to_string();
        debug!("Loading demux settings from {}", filepath);

        let file =
            File::open(path).map_err(|e| ConfigError::Io(filepath.clone(), e.to_string()))?;
        serde_json::from_reader(BufReader::new(file))
            .map_err(|e| ConfigError::Parse(filepath, e.to_string()))
    }

    /// Verify if the frame rate override has been set.
    pub fn frame_rate_override(&self) -> bool {
        self.fps >= 1.0
    }

    /// The microseconds per frame used by frame based subtitle types.
    /// The override takes precedence over the media frame rate.
    pub fn microsec_per_frame(&self) -> i64 {
        if self.frame_rate_override() {
            (1_000_000f64 / self.fps as f64) as i64
        } else if self.original_fps >= 1.0 {
            (1_000_000f64 / self.original_fps as f64) as i64
        } else {
            DEFAULT_MICROSEC_PER_FRAME
        }
    }

    /// The initial delay in microseconds, saturating at the bounds of the timeline.
    pub fn initial_delay_micros(&self) -> i64 {
        self.delay.saturating_mul(MICROS_PER_TENTH)
    }

    /// The subtitle type which has been forced by the settings.
    ///
    /// It returns [None] when the type should be detected.
    pub fn format_selection(&self) -> Option<SubtitleType> {
        let name = self.sub_type.trim();
        if name.is_empty() || name.eq_ignore_ascii_case(AUTO_DETECT) {
            return None;
        }

        let result = SubtitleType::from_name(name);
        if result.is_none() {
            warn!("Subtitle type {} is unknown, falling back to detection", name);
        }
        result
    }

    /// The track description override, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|e| !e.trim().is_empty())
    }
}

impl Default for DemuxSettings {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS(),
            original_fps: DEFAULT_ORIGINAL_FPS(),
            delay: DEFAULT_DELAY(),
            sub_type: DEFAULT_SUB_TYPE(),
            description: DEFAULT_DESCRIPTION(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_from_file() {
        let temp_dir = tempdir().unwrap();
        let filepath = temp_dir.path().join("settings.json");
        fs::write(&filepath, r#"{"fps": 23.976, "sub_type": "microdvd", "delay": -15}"#).unwrap();
        let expected_result = DemuxSettings {
            fps: 23.976,
            original_fps: 0.0,
            delay: -15,
            sub_type: "microdvd".to_string(),
            description: None,
        };

        let result = DemuxSettings::from_file(&filepath).unwrap();

        assert_eq!(expected_result, result);
    }

    #[test]
    fn test_from_file_empty_object() {
        let temp_dir = tempdir().unwrap();
        let filepath = temp_dir.path().join("settings.json");
        fs::write(&filepath, "{}").unwrap();

        let result = DemuxSettings::from_file(&filepath).unwrap();

        assert_eq!(DemuxSettings::default(), result);
    }

    #[test]
    fn test_from_file_invalid() {
        let temp_dir = tempdir().unwrap();
        let filepath = temp_dir.path().join("settings.json");
        fs::write(&filepath, "lorem ipsum").unwrap();

        let result = DemuxSettings::from_file(&filepath);

        assert!(
            matches!(result, Err(ConfigError::Parse(_, _))),
            "expected a parse error, got {:?}",
            result
        );
    }

    #[test]
    fn test_from_file_missing() {
        let temp_dir = tempdir().unwrap();

        let result = DemuxSettings::from_file(temp_dir.path().join("missing.json"));

        assert!(
            matches!(result, Err(ConfigError::Io(_, _))),
            "expected an io error, got {:?}",
            result
        );
    }

    #[test]
    fn test_microsec_per_frame() {
        let mut settings = DemuxSettings::default();
        assert_eq!(40_000, settings.microsec_per_frame());
        assert!(!settings.frame_rate_override());

        settings.original_fps = 24.0;
        assert_eq!(41_666, settings.microsec_per_frame());

        settings.fps = 30.0;
        assert_eq!(33_333, settings.microsec_per_frame());
        assert!(settings.frame_rate_override());
    }

    #[test]
    fn test_initial_delay_micros() {
        let settings = DemuxSettings {
            delay: 25,
            ..DemuxSettings::default()
        };

        assert_eq!(2_500_000, settings.initial_delay_micros());
    }

    #[test]
    fn test_initial_delay_micros_saturates() {
        let settings = DemuxSettings {
            delay: i64::MAX / 10,
            ..DemuxSettings::default()
        };

        assert_eq!(i64::MAX, settings.initial_delay_micros());
    }

    #[test]
    fn test_format_selection() {
        let mut settings = DemuxSettings::default();
        assert_eq!(None, settings.format_selection());

        settings.sub_type = "SSA2-4".to_string();
        assert_eq!(Some(SubtitleType::Ssa2_4), settings.format_selection());

        settings.sub_type = "text/vtt".to_string();
        assert_eq!(Some(SubtitleType::Vtt), settings.format_selection());

        settings.sub_type = "lorem".to_string();
        assert_eq!(None, settings.format_selection());
    }

    #[test]
    fn test_description() {
        let mut settings = DemuxSettings::default();
        assert_eq!(None, settings.description());

        settings.description = Some("  ".to_string());
        assert_eq!(None, settings.description());

        settings.description = Some("Director's commentary".to_string());
        assert_eq!(Some("Director's commentary"), settings.description());
    }
}
