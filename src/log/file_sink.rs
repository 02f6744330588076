use parking_lot::Mutex;
use std::{
    fs::{File, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use crate::log::{
    log_error::LogError, log_format::file_line, log_level::LogLevel, log_record::LogRecord,
    log_sink::LogSink,
};

/// Append-only UTF-8 file sink with the fixed-width file layout.
///
/// Every record is written and flushed immediately, so lines already written
/// survive a crash and repeated runs against the same path keep earlier lines.
pub struct FileSink {
    level: LogLevel,
    path: PathBuf,
    file: Mutex<File>,
}

impl FileSink {
    /// Opens (creating if needed) `path` in append mode.
    ///
    /// # Errors
    /// Returns [`LogError::Io`] if the file cannot be opened. There is no
    /// fallback destination.
    pub fn open(path: impl AsRef<Path>, level: LogLevel) -> Result<Self, LogError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| LogError::io(&path, e))?;

        Ok(Self {
            level,
            path,
            file: Mutex::new(file),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for FileSink {
    fn level(&self) -> LogLevel {
        self.level
    }

    fn format(&self, record: &LogRecord) -> String {
        file_line(record)
    }

    fn emit(&self, _record: &LogRecord, line: &str) -> Result<(), LogError> {
        // One write call per line keeps concurrent appenders from splitting lines.
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');

        let mut file = self.file.lock();
        file.write_all(buf.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|e| LogError::io(&self.path, e))
    }
}
