use chrono::{DateTime, Local};
use std::path::Path;

use crate::log::log_level::LogLevel;

/// A single log event, produced by a logger write call and consumed by sinks.
///
/// Records are immutable once created and cheap enough to move across the
/// aggregation queue.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    /// Name of the logger that produced the record; the listener dispatches on it.
    pub name: String,
    /// The severity level of the record.
    pub level: LogLevel,
    /// The rendered message text.
    pub message: String,
    /// Local wall-clock time at which the record was created.
    pub timestamp: DateTime<Local>,
    /// Source file of the call site, as given by `file!()`.
    pub file: &'static str,
    /// Source line of the call site.
    pub line: u32,
}

impl LogRecord {
    /// Creates a record stamped with the current local time.
    ///
    /// # Example
    ///
    /// ```rust
    /// use logfunnel::log::{log_level::LogLevel, log_record::LogRecord};
    ///
    /// let record = LogRecord::new("worker", LogLevel::Info, "started", file!(), line!());
    /// assert_eq!(record.name, "worker");
    /// ```
    pub fn new(
        name: impl Into<String>,
        level: LogLevel,
        message: impl Into<String>,
        file: &'static str,
        line: u32,
    ) -> Self {
        Self {
            name: name.into(),
            level,
            message: message.into(),
            timestamp: Local::now(),
            file,
            line,
        }
    }

    /// Final component of [`file`](Self::file), e.g. `main.rs` for `src/main.rs`.
    #[must_use]
    pub fn file_name(&self) -> &str {
        Path::new(self.file)
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or(self.file)
    }
}
