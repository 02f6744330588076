//! Line layouts shared by the console and file sinks.

use crate::log::log_record::LogRecord;

/// Timestamp layout of file lines, e.g. `2023-02-02,13:07:55`.
pub const FILE_TIME_FORMAT: &str = "%Y-%m-%d,%H:%M:%S";

/// Timestamp layout of the console badge.
pub const CONSOLE_TIME_FORMAT: &str = "%H:%M:%S";

/// Layout of the default file name, one file per day.
pub const FILE_DATE_FORMAT: &str = "%Y-%m-%d";

/// How a console sink lays out the text part of a record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConsoleFormat {
    /// `<logger-name> <message>`
    #[default]
    Named,
    /// `<message>`
    Plain,
}

impl ConsoleFormat {
    #[must_use]
    pub fn format(self, record: &LogRecord) -> String {
        match self {
            Self::Named => format!("{} {}", record.name, record.message),
            Self::Plain => record.message.clone(),
        }
    }
}

/// Renders the fixed-width file line (without trailing newline):
///
/// `<timestamp> <LEVEL:-8> <logger-name:-20> <source-file:-15>:<line:-5> <message>`
#[must_use]
pub fn file_line(record: &LogRecord) -> String {
    format!(
        "{} {:<8} {:<20} {:<15}:{:<5} {}",
        record.timestamp.format(FILE_TIME_FORMAT),
        record.level,
        record.name,
        record.file_name(),
        record.line,
        record.message,
    )
}
