use std::io;

use thiserror::Error;

/// The specialized subtitle result.
pub type Result<T> = std::result::Result<T, SubtitleError>;

/// Represents errors specific to subtitle demuxing.
#[derive(PartialEq, Debug, Clone, Error)]
pub enum SubtitleError {
    /// Reading the subtitle stream failed.
    #[error("failed to read subtitle stream, {0}")]
    Io(String),
    /// The subtitle stream didn't contain a single line.
    #[error("subtitle stream is empty")]
    EmptyInput,
    /// None of the known grammars matched the probed lines.
    #[error("failed to recognize subtitle type")]
    UnrecognizedFormat,
    /// No subtitle is available at or after the requested time.
    #[error("no subtitle available after {0}")]
    EndOfStream(i64),
    /// The control query is not supported by the subtitle demuxer.
    #[error("query {0} is not supported")]
    UnsupportedQuery(String),
}

impl From<io::Error> for SubtitleError {
    fn from(err: io::Error) -> Self {
        SubtitleError::Io(err.to_string())
    }
}
