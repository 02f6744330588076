//! logfunnel is a small logging facade built around named loggers.
//!
//! It offers two ways to get records onto disk and screen:
//! - `LoggerFactory`: configures a named logger with a colorized console sink
//!   and an append-only, day-named file sink.
//! - `AggregationPipeline`: lets many worker threads funnel records through one
//!   queue to a single listener, which is the only context performing sink I/O.
//!
//! Both share an explicit `LoggerRegistry`, so the same name always resolves to
//! the same logger.

/// Handles configuration loading and management.
pub mod config;
/// Loggers, sinks, the registry and the aggregation pipeline.
pub mod log;
