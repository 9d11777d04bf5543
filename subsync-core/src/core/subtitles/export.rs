use std::path::{Path, PathBuf};

use crate::core::subtitles::CueStore;

const CRLF: &str = "\r\n";
const EXPORT_SUFFIX: &str = "_adjusted.srt";

/// Render the given cues as a SubRip document with the adjusted timestamps.
///
/// * `cues` - The cues to render.
/// * `adjust` - The mapping from a raw cue timestamp to the adjusted playback timestamp.
pub fn export_srt<F>(cues: &CueStore, adjust: F) -> String
where
    F: Fn(i64) -> i64,
{
    let mut output = String::new();

    for (index, cue) in cues.iter().enumerate() {
        let start = adjust(cue.start());
        let stop = if cue.has_stop() {
            adjust(cue.stop())
        } else {
            start
        };
        let text = cue.text();
        let text = text
            .strip_suffix(CRLF)
            .or_else(|| text.strip_suffix('\n'))
            .unwrap_or(text);

        output.push_str(format!("{}{}", index + 1, CRLF).as_str());
        output.push_str(
            format!(
                "{} --> {}{}",
                format_timestamp(start),
                format_timestamp(stop),
                CRLF
            )
            .as_str(),
        );
        output.push_str(text);
        output.push_str(CRLF);
        output.push_str(CRLF);
    }

    output
}

/// Format the given time in microseconds as a SubRip timestamp (`HH:MM:SS,mmm`).
/// Negative times are clamped to zero.
pub fn format_timestamp(time: i64) -> String {
    let millis = (time.max(0) + 500) / 1000;
    let hours = millis / 3_600_000;
    let minutes = (millis / 60_000) % 60;
    let seconds = (millis / 1000) % 60;

    format!(
        "{:02}:{:02}:{:02},{:03}",
        hours,
        minutes,
        seconds,
        millis % 1000
    )
}

/// Retrieve the suggested path of the adjusted export for the given subtitle file,
/// e.g. `movie_adjusted.srt` for `movie.sub`.
pub fn export_path<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();
    let stem = path
        .file_stem()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_default();

    path.with_file_name(format!("{}{}", stem, EXPORT_SUFFIX))
}
