use thiserror::Error;

/// The specialized configuration result.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Represents errors which occur while loading the demuxer settings.
#[derive(PartialEq, Debug, Clone, Error)]
pub enum ConfigError {
    /// The settings file couldn't be read.
    #[error("failed to read settings {0}, {1}")]
    Io(String, String),
    /// The settings file contains invalid data.
    #[error("failed to parse settings {0}, {1}")]
    Parse(String, String),
}
