use crate::log::{log_error::LogError, log_level::LogLevel, log_record::LogRecord};

/// A destination that formats and writes log records.
///
/// Implementors supply [`format`](Self::format) and [`emit`](Self::emit); the
/// provided [`handle`](Self::handle) applies the sink's own level threshold
/// before formatting.
pub trait LogSink: Send + Sync {
    /// Minimum level this sink accepts.
    fn level(&self) -> LogLevel;

    /// Renders a record into one line of text, without trailing newline.
    fn format(&self, record: &LogRecord) -> String;

    /// Writes an already formatted line.
    ///
    /// # Errors
    /// Returns [`LogError`] if the underlying destination rejects the write.
    fn emit(&self, record: &LogRecord, line: &str) -> Result<(), LogError>;

    /// Filters, formats and emits a record.
    ///
    /// # Errors
    /// Propagates errors from [`emit`](Self::emit).
    fn handle(&self, record: &LogRecord) -> Result<(), LogError> {
        if record.level < self.level() {
            return Ok(());
        }
        let line = self.format(record);
        self.emit(record, &line)
    }
}
