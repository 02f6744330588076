use std::sync::mpsc;

use crate::log::{
    log_error::LogError, log_level::LogLevel, log_record::LogRecord, log_sink::LogSink,
};

/// One slot on the aggregation queue; `None` is the shutdown sentinel.
pub type QueueItem = Option<LogRecord>;

#[derive(Clone)]
pub(crate) enum QueueSender {
    Unbounded(mpsc::Sender<QueueItem>),
    Bounded(mpsc::SyncSender<QueueItem>),
}

/// Lightweight, cloneable producer endpoint of the aggregation queue.
///
/// Producers only ever enqueue; closing the queue is the listener's business.
/// Records sent through one handle (or its clones on one thread) reach the
/// listener in the order they were sent.
///
/// As a [`LogSink`], the handle forwards whole records instead of formatting
/// them, which is how producer loggers route their writes to the listener.
///
/// # Examples
/// ```ignore
/// // Usually you obtain it via: let handle = pipeline.handle();
/// handle.enqueue(LogRecord::new("worker", LogLevel::Info, "started", file!(), line!()))?;
/// ```
#[derive(Clone)]
pub struct QueueHandle {
    pub(crate) tx: QueueSender,
}

impl LogSink for QueueHandle {
    #[inline]
    fn level(&self) -> LogLevel {
        // The producer logger's own level does the filtering.
        LogLevel::Trace
    }

    fn format(&self, record: &LogRecord) -> String {
        record.message.clone()
    }

    fn emit(&self, record: &LogRecord, _line: &str) -> Result<(), LogError> {
        self.enqueue(record.clone())
    }

    fn handle(&self, record: &LogRecord) -> Result<(), LogError> {
        self.enqueue(record.clone())
    }
}

impl QueueHandle {
    /// Enqueues a record, blocking only if a bounded queue is full.
    ///
    /// # Errors
    /// Returns [`LogError::QueueClosed`] when the listener is gone.
    pub fn enqueue(&self, record: LogRecord) -> Result<(), LogError> {
        self.send(Some(record))
    }

    /// Attempts to enqueue a record without blocking.
    ///
    /// # Errors
    /// Returns:
    /// - [`LogError::QueueFull`] when a bounded queue is at capacity (record is not sent).
    /// - [`LogError::QueueClosed`] when the listener is gone.
    pub fn try_enqueue(&self, record: LogRecord) -> Result<(), LogError> {
        match &self.tx {
            QueueSender::Unbounded(tx) => tx.send(Some(record)).map_err(|_| LogError::QueueClosed),
            QueueSender::Bounded(tx) => tx.try_send(Some(record)).map_err(|e| match e {
                mpsc::TrySendError::Full(_) => LogError::QueueFull,
                mpsc::TrySendError::Disconnected(_) => LogError::QueueClosed,
            }),
        }
    }

    /// Asks the listener to stop once it has drained everything queued before this call.
    ///
    /// # Errors
    /// Returns [`LogError::QueueClosed`] when the listener is already gone.
    pub fn send_sentinel(&self) -> Result<(), LogError> {
        self.send(None)
    }

    fn send(&self, item: QueueItem) -> Result<(), LogError> {
        match &self.tx {
            QueueSender::Unbounded(tx) => tx.send(item).map_err(|_| LogError::QueueClosed),
            QueueSender::Bounded(tx) => tx.send(item).map_err(|_| LogError::QueueClosed),
        }
    }
}
