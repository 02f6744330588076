use parking_lot::RwLock;
use std::sync::Arc;

use crate::log::{
    log_error::LogError, log_level::LogLevel, log_record::LogRecord, log_sink::LogSink,
};

/// A named logger owning an ordered set of sinks.
///
/// Loggers are shared as `Arc<Logger>` through a
/// [`LoggerRegistry`](crate::log::registry::LoggerRegistry); reconfiguring a
/// name mutates the shared instance in place, so every holder observes the new
/// level and sinks.
///
/// Sinks are only ever replaced as a whole via [`set_sinks`](Self::set_sinks).
pub struct Logger {
    name: String,
    level: RwLock<LogLevel>,
    sinks: RwLock<Vec<Arc<dyn LogSink>>>,
}

impl Logger {
    /// Creates a logger with no sinks at [`LogLevel::Info`].
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: RwLock::new(LogLevel::Info),
            sinks: RwLock::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn level(&self) -> LogLevel {
        *self.level.read()
    }

    pub fn set_level(&self, level: LogLevel) {
        *self.level.write() = level;
    }

    /// Detaches every current sink and installs `sinks` in their place.
    pub fn set_sinks(&self, sinks: Vec<Arc<dyn LogSink>>) {
        *self.sinks.write() = sinks;
    }

    #[must_use]
    pub fn sink_count(&self) -> usize {
        self.sinks.read().len()
    }

    /// Returns `true` if a record at `level` passes this logger's threshold.
    #[must_use]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.level()
    }

    /// Builds a record for this logger and hands it to the sinks.
    ///
    /// Records below the logger's level are discarded without being built.
    /// `file`/`line` normally come from `file!()`/`line!()`; the
    /// `logger_*!` macros fill them in.
    ///
    /// # Errors
    /// Returns the first sink error, after every sink has been tried.
    pub fn log(
        &self,
        level: LogLevel,
        message: impl Into<String>,
        file: &'static str,
        line: u32,
    ) -> Result<(), LogError> {
        if !self.enabled(level) {
            return Ok(());
        }
        let record = LogRecord::new(self.name.clone(), level, message, file, line);
        self.handle(&record)
    }

    /// Dispatches an existing record to every attached sink.
    ///
    /// The logger's own level is not consulted here: records arriving through
    /// the aggregation queue were already filtered by the producer. Each sink
    /// still applies its own threshold.
    ///
    /// # Errors
    /// Returns the first sink error, after every sink has been tried.
    pub fn handle(&self, record: &LogRecord) -> Result<(), LogError> {
        // Snapshot so a concurrent `set_sinks` never blocks on sink I/O.
        let sinks: Vec<Arc<dyn LogSink>> = self.sinks.read().clone();

        let mut first_err = None;
        for sink in &sinks {
            if let Err(e) = sink.handle(record) {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.level())
            .field("sinks", &self.sink_count())
            .finish()
    }
}
