use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors produced while configuring loggers or moving records through sinks.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("i/o error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("aggregation queue is closed")]
    QueueClosed,

    #[error("aggregation queue is full")]
    QueueFull,

    #[error("no logger registered under {0:?}")]
    UnknownLogger(String),

    #[error("malformed record: {0}")]
    MalformedRecord(&'static str),

    #[error("sink panicked while handling a record for {0:?}")]
    SinkPanicked(String),

    #[error("listener stopped after {consecutive_errors} consecutive queue errors")]
    ListenerAborted { consecutive_errors: u32 },

    #[error("failed to spawn listener thread: {0}")]
    ListenerSpawn(#[source] io::Error),

    #[error("listener thread panicked")]
    ListenerPanicked,
}

impl LogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
