use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, LevelFilter};
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::rolling_file::policy::compound::roll::fixed_window::FixedWindowRoller;
use log4rs::append::rolling_file::policy::compound::trigger::size::SizeTrigger;
use log4rs::append::rolling_file::policy::compound::CompoundPolicy;
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::config::{Appender, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::{Config, Handle};

use crate::{Error, Result};

const LOG_FORMAT_CONSOLE: &str = "\x1B[37m{d(%Y-%m-%d %H:%M:%S%.3f)}\x1B[0m {h({l:>5.5})} \x1B[37m---\x1B[0m \x1B[36m{t:<50.50}\x1B[0m \x1B[37m:\x1B[0m {m}{n}";
const LOG_FORMAT_FILE: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} {l:>5.5} --- {t:<50.50} : {m}{n}";
const CONSOLE_APPENDER: &str = "stderr";
const FILE_APPENDER: &str = "file";
const ROLLED_LOG_FILENAME: &str = "subsync.{}.log";
const ROLLED_LOG_COUNT: u32 = 3;
const DEFAULT_LOG_FILE_SIZE: u64 = 10 * 1024 * 1024;

static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// The process wide logger of the subsync applications.
///
/// The console output is written to stderr so it doesn't interleave with the subtitle output
/// on stdout. Only one instance can be initialized per process.
#[derive(Debug)]
pub struct SubsyncLogger {
    handle: Handle,
}

impl SubsyncLogger {
    /// Returns a builder instance for the logger.
    pub fn builder() -> SubsyncLoggerBuilder {
        SubsyncLoggerBuilder::default()
    }

    /// Returns the root logging level of the logger.
    pub fn root_log_level(&self) -> LevelFilter {
        self.handle.max_log_level()
    }

    fn new(config: Config) -> Result<Self> {
        if INITIALIZED.swap(true, Ordering::SeqCst) {
            return Err(Error::AlreadyInitialized);
        }

        let handle = log4rs::init_config(config).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        debug!("Subsync logger has been initialized");
        Ok(Self { handle })
    }

    fn create_config(
        root_level: LevelFilter,
        log_path: Option<&Path>,
        max_file_size: u64,
        loggers: Vec<(String, LevelFilter)>,
    ) -> Result<Config> {
        let mut root = Root::builder().appender(CONSOLE_APPENDER);
        let mut config_builder = Config::builder().appender(
            Appender::builder().build(
                CONSOLE_APPENDER,
                Box::new(
                    ConsoleAppender::builder()
                        .target(Target::Stderr)
                        .encoder(Box::new(PatternEncoder::new(LOG_FORMAT_CONSOLE)))
                        .build(),
                ),
            ),
        );

        if let Some(path) = log_path {
            config_builder =
                config_builder.appender(Self::create_file_appender(path, max_file_size)?);
            root = root.appender(FILE_APPENDER);
        }

        for (logger, level) in loggers.into_iter() {
            config_builder = config_builder.logger(Logger::builder().build(logger, level));
        }

        config_builder
            .build(root.build(root_level))
            .map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    fn create_file_appender(path: &Path, max_file_size: u64) -> Result<Appender> {
        let directory = path
            .parent()
            .filter(|e| !e.as_os_str().is_empty())
            .map(|e| e.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));
        std::fs::create_dir_all(&directory)?;

        // rolled files are kept next to the active log file
        let roller_pattern = directory.join(ROLLED_LOG_FILENAME);
        let roller = FixedWindowRoller::builder()
            .base(1)
            .build(roller_pattern.to_string_lossy().as_ref(), ROLLED_LOG_COUNT)
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        let policy = CompoundPolicy::new(
            Box::new(SizeTrigger::new(max_file_size)),
            Box::new(roller),
        );

        Ok(Appender::builder().build(
            FILE_APPENDER,
            Box::new(
                RollingFileAppender::builder()
                    .encoder(Box::new(PatternEncoder::new(LOG_FORMAT_FILE)))
                    .append(false)
                    .build(path, Box::new(policy))
                    .map_err(|e| Error::InvalidConfig(e.to_string()))?,
            ),
        ))
    }
}

/// The builder of the [SubsyncLogger].
#[derive(Debug, Default)]
pub struct SubsyncLoggerBuilder {
    root_level: Option<LevelFilter>,
    log_path: Option<PathBuf>,
    max_file_size: Option<u64>,
    loggers: HashMap<String, LevelFilter>,
}

impl SubsyncLoggerBuilder {
    /// Set the root level of the logger.
    pub fn root_level(&mut self, level: LevelFilter) -> &mut Self {
        self.root_level = Some(level);
        self
    }

    /// Set the log file path of the logger.
    pub fn log_path(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.log_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the size in bytes after which the log file is rolled.
    pub fn max_file_size(&mut self, size: u64) -> &mut Self {
        self.max_file_size = Some(size);
        self
    }

    /// Add a log level filter for the given module path.
    pub fn logger<S: AsRef<str>>(&mut self, module: S, level: LevelFilter) -> &mut Self {
        self.loggers.insert(module.as_ref().to_string(), level);
        self
    }

    /// Consumes the builder state and initializes the process wide logger.
    pub fn build(&mut self) -> Result<SubsyncLogger> {
        let config = self.build_config()?;
        SubsyncLogger::new(config)
    }

    fn build_config(&mut self) -> Result<Config> {
        let root_level = self.root_level.take().unwrap_or(LevelFilter::Info);
        let log_path = self.log_path.take();
        let max_file_size = self.max_file_size.take().unwrap_or(DEFAULT_LOG_FILE_SIZE);
        let loggers = self.loggers.drain().collect::<Vec<_>>();

        SubsyncLogger::create_config(root_level, log_path.as_deref(), max_file_size, loggers)
    }
}
