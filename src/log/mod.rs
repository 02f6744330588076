pub mod aggregation;
pub mod console_sink;
pub mod file_sink;
pub mod log_error;
pub mod log_format;
pub mod log_level;
pub mod log_macros;
pub mod log_record;
pub mod log_sink;
pub mod logger;
pub mod logger_factory;
pub mod queue_handle;
pub mod registry;

pub use aggregation::{AggregationPipeline, ListenerHandle, ListenerPolicy, ListenerStats};
pub use log_error::LogError;
pub use log_level::LogLevel;
pub use log_record::LogRecord;
pub use logger::Logger;
pub use logger_factory::{LoggerConfig, LoggerFactory};
pub use registry::LoggerRegistry;
