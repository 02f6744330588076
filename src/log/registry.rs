use parking_lot::RwLock;
use std::{collections::HashMap, sync::Arc};

use crate::log::logger::Logger;

/// Thread-safe mapping from logger name to the shared logger instance.
///
/// The registry is an ordinary value: clone it to share the same mapping
/// between a [`LoggerFactory`](crate::log::logger_factory::LoggerFactory), an
/// [`AggregationPipeline`](crate::log::aggregation::AggregationPipeline) and
/// application code. Looking up the same name always yields the same
/// `Arc<Logger>`.
#[derive(Clone, Default)]
pub struct LoggerRegistry {
    loggers: Arc<RwLock<HashMap<String, Arc<Logger>>>>,
}

impl LoggerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the logger registered under `name`, creating it if absent.
    pub fn get(&self, name: &str) -> Arc<Logger> {
        if let Some(logger) = self.loggers.read().get(name) {
            return Arc::clone(logger);
        }
        let mut loggers = self.loggers.write();
        Arc::clone(
            loggers
                .entry(name.to_owned())
                .or_insert_with(|| Arc::new(Logger::new(name))),
        )
    }

    /// Returns the logger registered under `name` without creating one.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Arc<Logger>> {
        self.loggers.read().get(name).cloned()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.loggers.read().contains_key(name)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.loggers.read().keys().cloned().collect();
        names.sort();
        names
    }
}
