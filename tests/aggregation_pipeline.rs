#![allow(clippy::expect_used)]

use logfunnel::log::{
    AggregationPipeline, LogError, LogLevel, LogRecord, LoggerConfig, LoggerFactory,
    LoggerRegistry, log_format::ConsoleFormat, log_sink::LogSink,
};
use std::collections::HashMap;
use std::fs;
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;

/// Collects every emitted line; the listener is its only writer.
#[derive(Default)]
struct Collector {
    lines: Mutex<Vec<String>>,
}

impl LogSink for Collector {
    fn level(&self) -> LogLevel {
        LogLevel::Trace
    }

    fn format(&self, record: &LogRecord) -> String {
        ConsoleFormat::Plain.format(record)
    }

    fn emit(&self, _record: &LogRecord, line: &str) -> Result<(), LogError> {
        if line == "poison" {
            return Err(LogError::MalformedRecord("poison"));
        }
        self.lines.lock().push(line.to_owned());
        Ok(())
    }
}

fn collector_for(registry: &LoggerRegistry, name: &str) -> Arc<Collector> {
    let sink = Arc::new(Collector::default());
    registry.get(name).set_sinks(vec![sink.clone()]);
    sink
}

#[test]
fn concurrent_producers_keep_per_producer_order() {
    const PRODUCERS: usize = 8;
    const PER_PRODUCER: usize = 250;

    let registry = LoggerRegistry::new();
    let sink = collector_for(&registry, "worker");
    let pipeline = AggregationPipeline::new(registry);

    let producers: Vec<_> = (0..PRODUCERS)
        .map(|p| {
            let logger = pipeline.producer_logger("worker", LogLevel::Info);
            thread::spawn(move || {
                for seq in 0..PER_PRODUCER {
                    logger
                        .log(LogLevel::Info, format!("{p}:{seq}"), file!(), line!())
                        .expect("enqueue");
                }
            })
        })
        .collect();

    let control = pipeline.handle();
    let listener = pipeline.spawn_listener().expect("spawn listener");

    for producer in producers {
        producer.join().expect("producer thread");
    }
    control.send_sentinel().expect("sentinel");
    let stats = listener.join().expect("listener");

    assert_eq!(stats.handled, (PRODUCERS * PER_PRODUCER) as u64);
    assert_eq!(stats.failed, 0);

    let lines = sink.lines.lock().clone();
    assert_eq!(lines.len(), PRODUCERS * PER_PRODUCER);

    let mut next_seq: HashMap<usize, usize> = HashMap::new();
    for line in &lines {
        let (p, seq) = line.split_once(':').expect("tagged line");
        let p: usize = p.parse().expect("producer id");
        let seq: usize = seq.parse().expect("sequence");
        let expected = next_seq.entry(p).or_insert(0);
        assert_eq!(seq, *expected, "producer {p} out of order");
        *expected += 1;
    }
    assert!(next_seq.values().all(|&n| n == PER_PRODUCER));
}

#[test]
fn failing_record_between_valid_ones_is_skipped() {
    let registry = LoggerRegistry::new();
    let sink = collector_for(&registry, "app");
    let pipeline = AggregationPipeline::new(registry);
    let handle = pipeline.handle();

    for message in ["before", "poison", "after"] {
        handle
            .enqueue(LogRecord::new("app", LogLevel::Info, message, file!(), line!()))
            .expect("enqueue");
    }
    handle.send_sentinel().expect("sentinel");

    let stats = pipeline.run_listener().expect("listener");

    assert_eq!(stats.handled, 2);
    assert_eq!(stats.failed, 1);
    assert_eq!(*sink.lines.lock(), vec!["before", "after"]);
}

#[test]
fn listener_writes_queued_records_to_a_factory_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let registry = LoggerRegistry::new();
    let factory = LoggerFactory::new(registry.clone());
    let config = LoggerConfig::new("funnel")
        .with_directory(dir.path())
        .with_filename("aggregate");
    factory.configure(&config).expect("configure");

    let pipeline = AggregationPipeline::new(registry);
    let workers: Vec<_> = (0..3)
        .map(|id| {
            let logger = pipeline.producer_logger("funnel", LogLevel::Info);
            thread::spawn(move || {
                logger
                    .log(LogLevel::Warn, format!("from worker {id}"), file!(), line!())
                    .expect("enqueue");
            })
        })
        .collect();
    let listener = pipeline.spawn_listener().expect("spawn");
    for worker in workers {
        worker.join().expect("worker");
    }
    let stats = listener.shutdown().expect("shutdown");
    assert_eq!(stats.handled, 3);

    let content = fs::read_to_string(config.log_path()).expect("read log file");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    for line in lines {
        assert!(line.contains(" WARNING  funnel "), "unexpected line {line:?}");
        assert!(line.contains("aggregation_pipeline.rs:"));
    }
}
