use subsync_core::core::config::ConfigError;
use subsync_core::core::subtitles::SubtitleError;
use thiserror::Error;

/// The result type of the subsync application.
pub type Result<T> = std::result::Result<T, SubsyncError>;

/// The errors which abort the subsync application.
#[derive(Debug, PartialEq, Error)]
pub enum SubsyncError {
    #[error("failed to load settings, {0}")]
    Config(#[from] ConfigError),
    #[error("failed to process subtitle, {0}")]
    Subtitle(#[from] SubtitleError),
    #[error("failed to initialize logger, {0}")]
    Logger(#[from] subsync_logging::Error),
    #[error("trigger {0} is invalid")]
    InvalidTrigger(String),
}
