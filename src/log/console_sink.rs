use colored::{ColoredString, Colorize};
use parking_lot::Mutex;
use std::io::{self, IsTerminal, Write};

use crate::log::{
    log_error::LogError,
    log_format::{CONSOLE_TIME_FORMAT, ConsoleFormat},
    log_level::LogLevel,
    log_record::LogRecord,
    log_sink::LogSink,
};

/// Standard stream a [`ConsoleSink`] writes to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConsoleTarget {
    Stdout,
    #[default]
    Stderr,
}

/// Colorized console sink.
///
/// The formatted text is `<logger-name> <message>` (or just the message for
/// [`ConsoleFormat::Plain`]); the rendering step prefixes it with the time and a
/// colored, fixed-width level badge.
pub struct ConsoleSink {
    level: LogLevel,
    format: ConsoleFormat,
    colored: bool,
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleSink {
    /// Colorized sink on stdout using the `<logger-name> <message>` layout.
    #[must_use]
    pub fn new(level: LogLevel) -> Self {
        Self::to_target(level, ConsoleFormat::Named, ConsoleTarget::Stdout)
    }

    /// Stderr sink with the default message-only layout, as attached by the listener configurer.
    #[must_use]
    pub fn plain(level: LogLevel) -> Self {
        Self::to_target(level, ConsoleFormat::Plain, ConsoleTarget::Stderr)
    }

    /// Sink on a standard stream. Colors are used only when that stream is a
    /// terminal; redirected output stays free of ANSI escapes.
    #[must_use]
    pub fn to_target(level: LogLevel, format: ConsoleFormat, target: ConsoleTarget) -> Self {
        let (out, colored): (Box<dyn Write + Send>, bool) = match target {
            ConsoleTarget::Stdout => (Box::new(io::stdout()), io::stdout().is_terminal()),
            ConsoleTarget::Stderr => (Box::new(io::stderr()), io::stderr().is_terminal()),
        };
        Self {
            level,
            format,
            colored,
            out: Mutex::new(out),
        }
    }

    /// Uncolored sink over an arbitrary writer (useful for capturing output).
    #[must_use]
    pub fn to_writer(level: LogLevel, format: ConsoleFormat, out: Box<dyn Write + Send>) -> Self {
        Self {
            level,
            format,
            colored: false,
            out: Mutex::new(out),
        }
    }

    fn badge(&self, level: LogLevel) -> ColoredString {
        let text = format!("{level:<8}");
        if !self.colored {
            return text.normal();
        }
        match level {
            LogLevel::Trace => text.purple(),
            LogLevel::Debug => text.blue(),
            LogLevel::Info => text.green(),
            LogLevel::Warn => text.yellow(),
            LogLevel::Error => text.red(),
            LogLevel::Critical => text.red().bold().reversed(),
        }
    }
}

impl LogSink for ConsoleSink {
    fn level(&self) -> LogLevel {
        self.level
    }

    fn format(&self, record: &LogRecord) -> String {
        self.format.format(record)
    }

    fn emit(&self, record: &LogRecord, line: &str) -> Result<(), LogError> {
        let time = record.timestamp.format(CONSOLE_TIME_FORMAT).to_string();
        let time = if self.colored { time.dimmed() } else { time.normal() };
        let badge = self.badge(record.level);

        let mut out = self.out.lock();
        writeln!(out, "{time} {badge} {line}")
            .and_then(|()| out.flush())
            .map_err(|e| LogError::io("<console>", e))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use std::sync::Arc;

    /// Writer that appends into a shared buffer the test can inspect.
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().clone()).expect("utf-8")
        }
    }

    #[test]
    fn named_layout_renders_name_and_message() {
        let buf = SharedBuf::default();
        let sink = ConsoleSink::to_writer(LogLevel::Info, ConsoleFormat::Named, Box::new(buf.clone()));

        let record = LogRecord::new("app", LogLevel::Warn, "disk low", file!(), line!());
        sink.handle(&record).expect("emit");

        let out = buf.contents();
        assert!(out.ends_with("WARNING  app disk low\n"), "got {out:?}");
    }

    #[test]
    fn plain_layout_omits_the_name() {
        let buf = SharedBuf::default();
        let sink = ConsoleSink::to_writer(LogLevel::Info, ConsoleFormat::Plain, Box::new(buf.clone()));

        let record = LogRecord::new("app", LogLevel::Info, "ready", file!(), line!());
        sink.handle(&record).expect("emit");

        assert!(buf.contents().ends_with("INFO     ready\n"));
    }

    #[test]
    fn stream_sinks_color_only_on_a_terminal() {
        let stdout = ConsoleSink::new(LogLevel::Info);
        let stderr = ConsoleSink::plain(LogLevel::Info);
        assert_eq!(stdout.colored, io::stdout().is_terminal());
        assert_eq!(stderr.colored, io::stderr().is_terminal());
    }

    #[test]
    fn uncolored_output_has_no_escape_codes() {
        let buf = SharedBuf::default();
        let sink = ConsoleSink::to_writer(LogLevel::Trace, ConsoleFormat::Named, Box::new(buf.clone()));

        for level in [LogLevel::Trace, LogLevel::Warn, LogLevel::Critical] {
            let record = LogRecord::new("app", level, "msg", file!(), line!());
            sink.handle(&record).expect("emit");
        }

        let out = buf.contents();
        assert_eq!(out.lines().count(), 3);
        assert!(!out.contains('\x1b'), "got {out:?}");
    }

    #[test]
    fn records_below_threshold_are_dropped() {
        let buf = SharedBuf::default();
        let sink = ConsoleSink::to_writer(LogLevel::Error, ConsoleFormat::Named, Box::new(buf.clone()));

        let record = LogRecord::new("app", LogLevel::Info, "chatty", file!(), line!());
        sink.handle(&record).expect("filtered records are not errors");

        assert!(buf.contents().is_empty());
    }
}
