use std::fmt;

/// Defines the severity levels for log records, ordered from least to most severe.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    /// Designates very fine-grained informational events.
    Trace,
    /// Designates fine-grained informational events that are most useful to debug an application.
    Debug,
    /// Designates informational messages that highlight the progress of the application at coarse-grained level.
    #[default]
    Info,
    /// Designates potentially harmful situations.
    Warn,
    /// Designates error events that might still allow the application to continue running.
    Error,
    /// Designates failures the application is unlikely to recover from.
    Critical,
}

/// Level names accepted from configuration, matched case-sensitively.
const LEVEL_TABLE: [(&str, LogLevel); 6] = [
    ("INFO", LogLevel::Info),
    ("DEBUG", LogLevel::Debug),
    ("WARN", LogLevel::Warn),
    ("WARNING", LogLevel::Warn),
    ("ERROR", LogLevel::Error),
    ("CRITICAL", LogLevel::Critical),
];

impl LogLevel {
    /// Maps a configured level name to a level.
    ///
    /// Unrecognized names (including `TRACE` and lowercase spellings) coerce to
    /// [`LogLevel::Info`] instead of failing.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        LEVEL_TABLE
            .iter()
            .find(|(key, _)| *key == name)
            .map_or(Self::Info, |(_, level)| *level)
    }

    /// Upper-case label used in rendered output.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `pad` keeps width/alignment flags working for fixed-width columns.
        f.pad(self.label())
    }
}
