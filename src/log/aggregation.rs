use std::{
    panic::{self, AssertUnwindSafe},
    sync::{Arc, mpsc},
    thread,
};

use crate::{
    config::{Config, ConfigError, LOGGING_SECTION},
    log::{
        console_sink::ConsoleSink,
        log_error::LogError,
        log_level::LogLevel,
        log_record::LogRecord,
        logger::Logger,
        queue_handle::{QueueHandle, QueueItem, QueueSender},
        registry::LoggerRegistry,
    },
};

/// Consecutive dequeue failures tolerated before the listener gives up.
pub const DEFAULT_MAX_CONSECUTIVE_ERRORS: u32 = 16;

/// How the listener reacts to a queue that keeps failing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListenerPolicy {
    /// Stop with [`LogError::ListenerAborted`] after this many dequeue errors
    /// in a row. `None` retries forever, which spins if the queue stays broken.
    pub max_consecutive_errors: Option<u32>,
}

impl Default for ListenerPolicy {
    fn default() -> Self {
        Self {
            max_consecutive_errors: Some(DEFAULT_MAX_CONSECUTIVE_ERRORS),
        }
    }
}

impl ListenerPolicy {
    /// Reads `max_consecutive_errors` from the `[Logging]` section: an integer,
    /// or `none` for unlimited retries. Missing or empty keeps the default.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] for anything else.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        const KEY: &str = "max_consecutive_errors";

        let Some(raw) = config.get_non_empty(LOGGING_SECTION, KEY) else {
            return Ok(Self::default());
        };
        if raw.eq_ignore_ascii_case("none") {
            return Ok(Self {
                max_consecutive_errors: None,
            });
        }
        raw.parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .map(|n| Self {
                max_consecutive_errors: Some(n),
            })
            .ok_or_else(|| ConfigError::InvalidValue {
                key: KEY.to_string(),
                value: raw.to_string(),
            })
    }
}

/// Counters reported when the listener stops.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ListenerStats {
    /// Records dispatched to their logger without error.
    pub handled: u64,
    /// Records whose handling failed (each produced one diagnostic line).
    pub failed: u64,
    /// Failed dequeue attempts.
    pub queue_errors: u64,
}

/// Multi-producer, single-consumer log aggregation.
///
/// # Architecture
///
/// 1. **Producers**: any number of threads hold [`QueueHandle`]s (directly or
///    through a [`producer_logger`](Self::producer_logger)) and enqueue records.
/// 2. **Queue**: an `mpsc` channel of [`QueueItem`], unbounded unless built with
///    [`bounded`](Self::bounded).
/// 3. **Listener**: exactly one consumer runs [`run_listener`](Self::run_listener)
///    (or [`spawn_listener`](Self::spawn_listener)), the only context doing sink
///    I/O for the queued records, until it dequeues the `None` sentinel.
pub struct AggregationPipeline {
    registry: LoggerRegistry,
    tx: QueueSender,
    rx: mpsc::Receiver<QueueItem>,
    policy: ListenerPolicy,
}

impl AggregationPipeline {
    /// Pipeline over an unbounded queue.
    #[must_use]
    pub fn new(registry: LoggerRegistry) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            registry,
            tx: QueueSender::Unbounded(tx),
            rx,
            policy: ListenerPolicy::default(),
        }
    }

    /// Pipeline over a queue holding at most `cap` pending items; producers
    /// block in [`QueueHandle::enqueue`] while it is full.
    #[must_use]
    pub fn bounded(registry: LoggerRegistry, cap: usize) -> Self {
        let (tx, rx) = mpsc::sync_channel(cap);
        Self {
            registry,
            tx: QueueSender::Bounded(tx),
            rx,
            policy: ListenerPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: ListenerPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn registry(&self) -> &LoggerRegistry {
        &self.registry
    }

    /// Returns a new producer endpoint.
    #[must_use]
    pub fn handle(&self) -> QueueHandle {
        QueueHandle {
            tx: self.tx.clone(),
        }
    }

    /// Prepares the registry logger `name` to receive queued records: level
    /// INFO and a single message-only stderr [`ConsoleSink`].
    ///
    /// Sinks are replaced rather than added, so calling this repeatedly for the
    /// same name never duplicates output.
    pub fn configurer(&self, name: &str) -> Arc<Logger> {
        let logger = self.registry.get(name);
        logger.set_level(LogLevel::Info);
        logger.set_sinks(vec![Arc::new(ConsoleSink::plain(LogLevel::Info))]);
        logger
    }

    /// Builds a logger for worker code whose writes go onto the queue instead
    /// of any sink.
    ///
    /// The logger is deliberately not registered: the listener resolves names
    /// in the registry, and must never find a logger that re-enqueues.
    #[must_use]
    pub fn producer_logger(&self, name: &str, level: LogLevel) -> Logger {
        let logger = Logger::new(name);
        logger.set_level(level);
        logger.set_sinks(vec![Arc::new(self.handle())]);
        logger
    }

    /// Runs the listener loop on the current thread until the sentinel arrives.
    ///
    /// Each record is dispatched to the registry logger carrying its name.
    /// A record that cannot be handled (unknown logger, malformed, failing or
    /// panicking sink) costs one diagnostic line on stderr and the loop moves on.
    /// Records naming a logger that is not in the registry are dropped; the
    /// listener never creates loggers on their behalf.
    ///
    /// # Errors
    /// Returns [`LogError::ListenerAborted`] once the policy's consecutive
    /// dequeue error limit is reached, i.e. every producer hung up without
    /// sending a sentinel.
    pub fn run_listener(self) -> Result<ListenerStats, LogError> {
        let Self {
            registry,
            tx,
            rx,
            policy,
        } = self;
        // Only producers may keep the queue open.
        drop(tx);

        let mut stats = ListenerStats::default();
        let mut consecutive_errors: u32 = 0;

        loop {
            match rx.recv() {
                Ok(None) => return Ok(stats),
                Ok(Some(record)) => {
                    consecutive_errors = 0;
                    match dispatch(&registry, &record) {
                        Ok(()) => stats.handled += 1,
                        Err(e) => {
                            stats.failed += 1;
                            eprintln!(
                                "(logfunnel) failed to handle record for {:?}: {e}",
                                record.name
                            );
                        }
                    }
                }
                Err(e) => {
                    consecutive_errors = consecutive_errors.saturating_add(1);
                    stats.queue_errors += 1;
                    eprintln!("(logfunnel) failure in listener: {e}");

                    if policy
                        .max_consecutive_errors
                        .is_some_and(|max| consecutive_errors >= max)
                    {
                        return Err(LogError::ListenerAborted { consecutive_errors });
                    }
                }
            }
        }
    }

    /// Runs [`run_listener`](Self::run_listener) on a dedicated `log-listener` thread.
    ///
    /// # Errors
    /// Returns [`LogError::ListenerSpawn`] if the thread cannot be started.
    pub fn spawn_listener(self) -> Result<ListenerHandle, LogError> {
        let control = self.handle();
        let thread = thread::Builder::new()
            .name("log-listener".into())
            .spawn(move || self.run_listener())
            .map_err(LogError::ListenerSpawn)?;

        Ok(ListenerHandle { control, thread })
    }
}

fn dispatch(registry: &LoggerRegistry, record: &LogRecord) -> Result<(), LogError> {
    if record.name.is_empty() {
        return Err(LogError::MalformedRecord("empty logger name"));
    }
    let logger = registry
        .lookup(&record.name)
        .ok_or_else(|| LogError::UnknownLogger(record.name.clone()))?;

    panic::catch_unwind(AssertUnwindSafe(|| logger.handle(record)))
        .unwrap_or_else(|_| Err(LogError::SinkPanicked(record.name.clone())))
}

/// Owner of a listener running on its own thread.
pub struct ListenerHandle {
    control: QueueHandle,
    thread: thread::JoinHandle<Result<ListenerStats, LogError>>,
}

impl ListenerHandle {
    /// Sends the sentinel and waits for the listener to drain and exit.
    ///
    /// # Errors
    /// Propagates the listener's own error, or [`LogError::ListenerPanicked`].
    pub fn shutdown(self) -> Result<ListenerStats, LogError> {
        // Already closed means the listener has stopped on its own.
        let _ = self.control.send_sentinel();
        self.join()
    }

    /// Waits for the listener to exit without asking it to.
    ///
    /// # Errors
    /// Propagates the listener's own error, or [`LogError::ListenerPanicked`].
    pub fn join(self) -> Result<ListenerStats, LogError> {
        let Self { control, thread } = self;
        drop(control);
        thread.join().map_err(|_| LogError::ListenerPanicked)?
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::log::{log_sink::LogSink, log_format::ConsoleFormat};
    use parking_lot::Mutex;

    /// Sink that remembers formatted lines; panics or fails on demand.
    #[derive(Default)]
    struct Capture {
        lines: Mutex<Vec<String>>,
    }

    impl LogSink for Capture {
        fn level(&self) -> LogLevel {
            LogLevel::Trace
        }
        fn format(&self, record: &LogRecord) -> String {
            ConsoleFormat::Named.format(record)
        }
        fn emit(&self, record: &LogRecord, line: &str) -> Result<(), LogError> {
            match record.message.as_str() {
                "boom" => Err(LogError::MalformedRecord("boom")),
                "panic" => panic!("sink blew up"),
                _ => {
                    self.lines.lock().push(line.to_owned());
                    Ok(())
                }
            }
        }
    }

    fn capture_logger(registry: &LoggerRegistry, name: &str) -> Arc<Capture> {
        let sink = Arc::new(Capture::default());
        registry.get(name).set_sinks(vec![sink.clone()]);
        sink
    }

    fn rec(name: &str, message: &str) -> LogRecord {
        LogRecord::new(name, LogLevel::Info, message, file!(), line!())
    }

    #[test]
    fn sentinel_stops_after_earlier_records() {
        let registry = LoggerRegistry::new();
        let sink = capture_logger(&registry, "app");
        let pipeline = AggregationPipeline::new(registry);
        let handle = pipeline.handle();

        handle.enqueue(rec("app", "one")).unwrap();
        handle.enqueue(rec("app", "two")).unwrap();
        handle.send_sentinel().unwrap();
        handle.enqueue(rec("app", "after")).unwrap();

        let stats = pipeline.run_listener().expect("listener");

        assert_eq!(stats.handled, 2);
        assert_eq!(*sink.lines.lock(), vec!["app one".to_owned(), "app two".to_owned()]);
    }

    #[test]
    fn bad_records_do_not_stop_the_loop() {
        let registry = LoggerRegistry::new();
        let sink = capture_logger(&registry, "app");
        let pipeline = AggregationPipeline::new(registry);
        let handle = pipeline.handle();

        handle.enqueue(rec("app", "first")).unwrap();
        handle.enqueue(rec("app", "boom")).unwrap();
        handle.enqueue(rec("ghost", "nobody home")).unwrap();
        handle.enqueue(rec("", "nameless")).unwrap();
        handle.enqueue(rec("app", "panic")).unwrap();
        handle.enqueue(rec("app", "second")).unwrap();
        handle.send_sentinel().unwrap();

        let stats = pipeline.run_listener().expect("listener");

        assert_eq!(stats.handled, 2);
        assert_eq!(stats.failed, 4);
        assert_eq!(*sink.lines.lock(), vec!["app first".to_owned(), "app second".to_owned()]);
    }

    #[test]
    fn unknown_names_are_dropped_without_registering() {
        let registry = LoggerRegistry::new();
        let pipeline = AggregationPipeline::new(registry.clone());
        let handle = pipeline.handle();

        handle.enqueue(rec("ghost", "nobody home")).unwrap();
        handle.send_sentinel().unwrap();

        let stats = pipeline.run_listener().expect("listener");

        assert_eq!(stats.failed, 1);
        assert!(!registry.contains("ghost"));
        assert!(matches!(
            dispatch(&registry, &rec("ghost", "again")),
            Err(LogError::UnknownLogger(name)) if name == "ghost"
        ));
    }

    #[test]
    fn extra_sentinels_are_harmless() {
        let pipeline = AggregationPipeline::new(LoggerRegistry::new());
        let handle = pipeline.handle();
        handle.send_sentinel().unwrap();
        handle.send_sentinel().unwrap();

        assert_eq!(pipeline.run_listener().expect("listener"), ListenerStats::default());
    }

    #[test]
    fn hung_up_producers_trip_the_error_limit() {
        let pipeline = AggregationPipeline::new(LoggerRegistry::new()).with_policy(ListenerPolicy {
            max_consecutive_errors: Some(3),
        });
        drop(pipeline.handle());

        match pipeline.run_listener() {
            Err(LogError::ListenerAborted { consecutive_errors }) => assert_eq!(consecutive_errors, 3),
            other => panic!("expected ListenerAborted, got {other:?}"),
        }
    }

    #[test]
    fn configurer_replaces_sinks_on_every_call() {
        let pipeline = AggregationPipeline::new(LoggerRegistry::new());
        let first = pipeline.configurer("listener");
        first.set_level(LogLevel::Error);
        let second = pipeline.configurer("listener");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.sink_count(), 1);
        assert_eq!(second.level(), LogLevel::Info);
    }

    #[test]
    fn producer_logger_filters_then_enqueues() {
        let registry = LoggerRegistry::new();
        let sink = capture_logger(&registry, "worker");
        let pipeline = AggregationPipeline::new(registry);
        let worker = pipeline.producer_logger("worker", LogLevel::Info);

        worker.log(LogLevel::Debug, "dropped at source", file!(), line!()).unwrap();
        worker.log(LogLevel::Warn, "queued", file!(), line!()).unwrap();
        pipeline.handle().send_sentinel().unwrap();

        // The producer logger never replaced the registered one.
        assert_eq!(pipeline.registry().lookup("worker").map(|l| l.sink_count()), Some(1));
        let stats = pipeline.run_listener().expect("listener");
        assert_eq!(stats.handled, 1);
        assert_eq!(*sink.lines.lock(), vec!["worker queued".to_owned()]);
    }

    #[test]
    fn spawned_listener_shuts_down_cleanly() {
        let registry = LoggerRegistry::new();
        let sink = capture_logger(&registry, "app");
        let pipeline = AggregationPipeline::bounded(registry, 4);
        let handle = pipeline.handle();
        let listener = pipeline.spawn_listener().expect("spawn");

        for i in 0..10 {
            handle.enqueue(rec("app", &format!("line {i}"))).unwrap();
        }
        let stats = listener.shutdown().expect("shutdown");

        assert_eq!(stats.handled, 10);
        assert_eq!(sink.lines.lock().len(), 10);
    }

    #[test]
    fn policy_from_config() {
        let parse = |text: &str| ListenerPolicy::from_config(&Config::parse(text));

        assert_eq!(parse("").unwrap(), ListenerPolicy::default());
        assert_eq!(
            parse("[Logging]\nmax_consecutive_errors = 5\n").unwrap().max_consecutive_errors,
            Some(5)
        );
        assert_eq!(
            parse("[Logging]\nmax_consecutive_errors = none\n").unwrap().max_consecutive_errors,
            None
        );
        assert!(matches!(
            parse("[Logging]\nmax_consecutive_errors = lots\n"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
