use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use derive_more::Display;
use itertools::{Either, Itertools};
use log::{debug, info, LevelFilter};
use subsync_core::core::config::DemuxSettings;
use subsync_core::core::demux::{CueSink, SubtitleDemux};
use subsync_core::core::sync::SyncTrigger;

use crate::console::ConsoleHost;
use crate::errors::{Result, SubsyncError};

const TIME_SEPARATOR: char = '@';
const VALUE_SEPARATOR: char = '=';

/// The command line arguments of the subsync application.
#[derive(Debug, Clone, Display, Parser)]
#[command(name = "subsync", version, about)]
#[display("input: {:?}, sub_type: {:?}", input, sub_type)]
pub struct SubsyncArgs {
    /// The text subtitle file to demux.
    pub input: PathBuf,
    /// The subtitle type to use instead of detecting it, e.g. `subrip` or `microdvd`.
    #[arg(long)]
    pub sub_type: Option<String>,
    /// The frame rate override for frame based subtitles.
    #[arg(long)]
    pub fps: Option<f32>,
    /// The initial subtitle delay in tenths of a second.
    #[arg(long, allow_negative_numbers = true)]
    pub delay: Option<i64>,
    /// The JSON file with the demux settings.
    #[arg(long)]
    pub settings: Option<PathBuf>,
    /// The resync trigger to replay, as `NAME[=VALUE][@MILLIS]`.
    /// Triggers without a playback time are replayed after all subtitles have been emitted.
    #[arg(long = "trigger")]
    pub triggers: Vec<TriggerArg>,
    /// Write the adjusted SubRip export, to the given path or next to the input file.
    #[arg(long, num_args = 0..=1)]
    pub export: Option<Option<PathBuf>>,
    /// The root log level.
    #[arg(long, default_value_t = LevelFilter::Info)]
    pub log_level: LevelFilter,
    /// The file to which the log is written.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl SubsyncArgs {
    /// Create the demux settings from the settings file, overridden by the given arguments.
    pub fn demux_settings(&self) -> Result<DemuxSettings> {
        let mut settings = match self.settings.as_ref() {
            Some(path) => DemuxSettings::from_file(path)?,
            None => DemuxSettings::default(),
        };

        if let Some(sub_type) = self.sub_type.as_ref() {
            settings.sub_type = sub_type.clone();
        }
        if let Some(fps) = self.fps {
            settings.fps = fps;
        }
        if let Some(delay) = self.delay {
            settings.delay = delay;
        }

        Ok(settings)
    }
}

/// A resync trigger replayed at an optional playback time.
#[derive(Debug, Display, Clone, PartialEq)]
#[display("{}", trigger)]
pub struct TriggerArg {
    pub trigger: SyncTrigger,
    /// The playback time in microseconds.
    pub at: Option<i64>,
}

impl FromStr for TriggerArg {
    type Err = SubsyncError;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = || SubsyncError::InvalidTrigger(value.to_string());
        let (trigger, at) = match value.rsplit_once(TIME_SEPARATOR) {
            Some((trigger, at)) => {
                let millis = at.trim().parse::<i64>().map_err(|_| invalid())?;
                (trigger, Some(millis.checked_mul(1000).ok_or_else(invalid)?))
            }
            None => (value, None),
        };
        let (name, trigger_value) = match trigger.split_once(VALUE_SEPARATOR) {
            Some((name, trigger_value)) => {
                (name, trigger_value.trim().parse::<i64>().map_err(|_| invalid())?)
            }
            None => (trigger, 0),
        };

        SyncTrigger::from_name(name.trim(), trigger_value)
            .map(|trigger| Self { trigger, at })
            .ok_or_else(invalid)
    }
}

/// The subsync application which demuxes a single subtitle file.
#[derive(Debug)]
pub struct Subsync {
    args: SubsyncArgs,
    demux: SubtitleDemux,
}

impl Subsync {
    /// Open the subtitle file of the given arguments.
    pub fn new(args: SubsyncArgs) -> Result<Self> {
        let settings = args.demux_settings()?;
        debug!("Using demux settings {}", settings);
        let demux = SubtitleDemux::open_file(&args.input, &settings, Box::new(ConsoleHost))?;

        Ok(Self { args, demux })
    }

    pub fn demux(&self) -> &SubtitleDemux {
        &self.demux
    }

    /// Emit all subtitles to the given sink, replaying the triggers at their playback times.
    /// The adjusted export is written afterwards when requested.
    ///
    /// It returns the path of the written export, if any.
    pub fn run(&mut self, sink: &mut dyn CueSink) -> Result<Option<PathBuf>> {
        let (timed, untimed): (Vec<(i64, SyncTrigger)>, Vec<SyncTrigger>) =
            self.args.triggers.iter().partition_map(|arg| match arg.at {
                Some(at) => Either::Left((at, arg.trigger)),
                None => Either::Right(arg.trigger),
            });

        for (at, trigger) in timed.into_iter().sorted_by_key(|(at, _)| *at) {
            self.demux.set_next_demux_time(at);
            self.demux.demux(sink);
            self.demux.trigger(trigger);
        }

        self.demux.set_next_demux_time(i64::MAX);
        self.demux.demux(sink);
        for trigger in untimed {
            self.demux.trigger(trigger);
        }

        match self.args.export.as_ref() {
            Some(path) => {
                let path = self.demux.write_export(path.as_deref())?;
                info!("Adjusted subtitle written to {}", path.display());
                Ok(Some(path))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use subsync_core::core::demux::CueCollector;
    use subsync_core::core::subtitles::SubtitleType;
    use tempfile::tempdir;

    use super::*;

    const SUBRIP: &str = "1\n00:00:00,000 --> 00:00:01,000\nHello\n\n2\n00:00:02,000 --> 00:00:03,000\nWorld\n\n";

    fn args(input: PathBuf) -> SubsyncArgs {
        SubsyncArgs {
            input,
            sub_type: None,
            fps: None,
            delay: None,
            settings: None,
            triggers: vec![],
            export: None,
            log_level: LevelFilter::Off,
            log_file: None,
        }
    }

    #[test]
    fn test_args_parse() {
        let result = SubsyncArgs::try_parse_from([
            "subsync",
            "movie.srt",
            "--sub-type",
            "subrip",
            "--delay",
            "-15",
            "--trigger",
            "sub-syncreset",
            "--trigger",
            "spu-delau=500000@2000",
            "--export",
        ])
        .unwrap();

        assert_eq!(PathBuf::from("movie.srt"), result.input);
        assert_eq!(Some(-15), result.delay);
        assert_eq!(
            vec![
                TriggerArg {
                    trigger: SyncTrigger::ResetSync,
                    at: None,
                },
                TriggerArg {
                    trigger: SyncTrigger::WriteDelay(500_000),
                    at: Some(2_000_000),
                },
            ],
            result.triggers
        );
        assert_eq!(Some(None), result.export);
        assert_eq!(LevelFilter::Info, result.log_level);
    }

    #[test]
    fn test_trigger_arg_from_str_invalid() {
        assert!(TriggerArg::from_str("lorem").is_err());
        assert!(TriggerArg::from_str("sub-syncbookmarks@abc").is_err());
        assert!(TriggerArg::from_str("spu-delau=abc").is_err());
    }

    #[test]
    fn test_trigger_arg_from_str_out_of_range_time() {
        let value = "sub-bookmarkaudio@9223372036854776";

        let result = TriggerArg::from_str(value);

        assert_eq!(Err(SubsyncError::InvalidTrigger(value.to_string())), result);
        assert_eq!(
            Ok(TriggerArg {
                trigger: SyncTrigger::BookmarkAudio,
                at: Some(9_223_372_036_854_775_000),
            }),
            TriggerArg::from_str("sub-bookmarkaudio@9223372036854775")
        );
    }

    #[test]
    fn test_demux_settings() {
        let temp_dir = tempdir().unwrap();
        let settings_path = temp_dir.path().join("settings.json");
        fs::write(&settings_path, r#"{"sub_type": "vtt", "original_fps": 24.0}"#).unwrap();
        let mut args = args(PathBuf::from("movie.srt"));
        args.settings = Some(settings_path);
        args.sub_type = Some("microdvd".to_string());
        args.fps = Some(25.0);

        let result = args.demux_settings().unwrap();

        assert_eq!("microdvd", result.sub_type);
        assert_eq!(25.0, result.fps);
        assert_eq!(24.0, result.original_fps);
    }

    #[test]
    fn test_run() {
        let temp_dir = tempdir().unwrap();
        let input = temp_dir.path().join("movie.srt");
        fs::write(&input, SUBRIP).unwrap();
        let mut args = args(input);
        args.triggers = vec![
            TriggerArg::from_str("sub-bookmarksubtitle@500").unwrap(),
            TriggerArg::from_str("sub-bookmarkaudio@1000").unwrap(),
            TriggerArg::from_str("sub-syncbookmarks@1000").unwrap(),
        ];
        args.export = Some(None);
        let mut sink = CueCollector::default();
        let mut subsync = Subsync::new(args).unwrap();

        let result = subsync.run(&mut sink).unwrap();

        assert_eq!(Some(temp_dir.path().join("movie_adjusted.srt")), result);
        assert_eq!(500_000, subsync.demux().state().delay());
        // the visible cue is emitted again with the corrected timing
        assert_eq!(
            vec![0, 500_000, 2_500_000],
            sink.blocks().iter().map(|e| e.pts).collect::<Vec<_>>()
        );
        assert!(fs::read_to_string(temp_dir.path().join("movie_adjusted.srt"))
            .unwrap()
            .contains("00:00:02,500 --> 00:00:03,500"));
    }

    #[test]
    fn test_run_microdvd() {
        let temp_dir = tempdir().unwrap();
        let input = temp_dir.path().join("movie.nl.sub");
        fs::write(&input, "{1}{1}25.000\n{25}{50}Lorem|ipsum\n{75}{100}dolor\n").unwrap();
        let mut args = args(input);
        args.fps = Some(50.0);
        let mut sink = CueCollector::default();
        let mut subsync = Subsync::new(args).unwrap();

        let result = subsync.run(&mut sink).unwrap();

        assert_eq!(None, result);
        assert_eq!(SubtitleType::MicroDvd, subsync.demux().subtitle_type());
        assert_eq!(Some("nl".to_string()), subsync.demux().track().language);
        assert_eq!(
            vec![500_000, 1_500_000],
            sink.blocks().iter().map(|e| e.pts).collect::<Vec<_>>()
        );
    }
}
