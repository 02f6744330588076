use chrono::Local;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    config::{Config, LOGGING_SECTION, expand_path},
    log::{
        console_sink::ConsoleSink, file_sink::FileSink, log_error::LogError,
        log_format::FILE_DATE_FORMAT, log_level::LogLevel, logger::Logger,
        registry::LoggerRegistry,
    },
};

/// Name used when none is configured.
pub const DEFAULT_LOGGER_NAME: &str = "logger";

/// Settings for one factory-built logger.
///
/// Defaults are resolved once, when the config is created: the directory is
/// `<parent of cwd>/logs` and the filename is today's local date
/// (`YYYY-MM-DD`). Build a new config to reconfigure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggerConfig {
    level: LogLevel,
    name: String,
    directory: PathBuf,
    filename: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_LOGGER_NAME)
    }
}

impl LoggerConfig {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Info,
            name: name.into(),
            directory: default_log_dir(),
            filename: Local::now().format(FILE_DATE_FORMAT).to_string(),
        }
    }

    /// Builds a config from the `[Logging]` section (`level`, `name`, `dir`,
    /// `filename`), keeping defaults for missing or empty keys.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let get = |key: &str| config.get_non_empty(LOGGING_SECTION, key);

        let mut out = Self::new(get("name").unwrap_or(DEFAULT_LOGGER_NAME));
        if let Some(level) = get("level") {
            out = out.with_level_name(level);
        }
        if let Some(dir) = get("dir") {
            out = out.with_directory(expand_path(dir));
        }
        if let Some(filename) = get("filename") {
            out = out.with_filename(filename);
        }
        out
    }

    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Sets the level from its configured name; unknown names become INFO.
    #[must_use]
    pub fn with_level_name(self, name: &str) -> Self {
        self.with_level(LogLevel::from_name(name))
    }

    #[must_use]
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    /// Sets the file stem; `.log` is appended when the file is opened.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    #[must_use]
    pub fn level(&self) -> LogLevel {
        self.level
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// `<directory>/<filename>.log`
    #[must_use]
    pub fn log_path(&self) -> PathBuf {
        self.directory.join(format!("{}.log", self.filename))
    }
}

/// `logs` next to the current working directory, i.e. `<cwd>/../logs`.
#[must_use]
pub fn default_log_dir() -> PathBuf {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    cwd.parent().map_or_else(|| cwd.join("logs"), |p| p.join("logs"))
}

/// Builds fully configured loggers in a shared [`LoggerRegistry`].
#[derive(Clone, Default)]
pub struct LoggerFactory {
    registry: LoggerRegistry,
}

impl LoggerFactory {
    #[must_use]
    pub fn new(registry: LoggerRegistry) -> Self {
        Self { registry }
    }

    #[must_use]
    pub fn registry(&self) -> &LoggerRegistry {
        &self.registry
    }

    /// Configures the logger named `config.name()` with a console sink and a
    /// file sink, both at `config.level()`, replacing whatever sinks it had.
    ///
    /// The log directory is created on a best-effort basis; failures there are
    /// ignored and surface, if at all, when the file is opened.
    ///
    /// # Errors
    /// Returns [`LogError::Io`] if `<directory>/<filename>.log` cannot be
    /// opened. The logger keeps its previous level and sinks in that case.
    pub fn configure(&self, config: &LoggerConfig) -> Result<Arc<Logger>, LogError> {
        let _ = fs::create_dir_all(config.directory());

        // Both sinks exist before the logger is touched, so a failed open
        // leaves its level and sinks as they were.
        let file = FileSink::open(config.log_path(), config.level())?;
        let console = ConsoleSink::new(config.level());

        let logger = self.registry.get(config.name());
        logger.set_level(config.level());
        logger.set_sinks(vec![Arc::new(console), Arc::new(file)]);
        Ok(logger)
    }
}
