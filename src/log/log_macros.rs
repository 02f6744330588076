//! Leveled logging macros for [`Logger`](crate::log::logger::Logger) and
//! [`QueueHandle`](crate::log::queue_handle::QueueHandle).
//!
//! Every macro records the call site (`file!()`, `line!()`), which the file
//! sink prints in its source column.
//!
//! # Feature Flags
//! specific log levels are controlled by cargo features:
//! `log-trace`, `log-debug`, `log-info`, `log-warn`, `log-error`.
//! `critical` records share the `log-error` gate.
//!
//! If a feature is disabled, the corresponding macros expand to `()`, removing
//! all formatting and allocation overhead at compile time.

// ============================================================================
// 1. GENERIC INTERNAL MACROS (The "Workers")
// ============================================================================
// These remain available so the enabled macros below can use them.
// Sink errors are dropped here; call `Logger::log` directly to observe them.

#[macro_export]
macro_rules! logger_log {
    ($logger:expr, $lvl:expr, $($arg:tt)*) => {{
        let _ = $logger.log($lvl, format!($($arg)*), file!(), line!());
    }};
}

#[macro_export]
macro_rules! queue_log {
    ($handle:expr, $name:expr, $lvl:expr, $($arg:tt)*) => {{
        let _ = $handle.enqueue($crate::log::log_record::LogRecord::new(
            $name,
            $lvl,
            format!($($arg)*),
            file!(),
            line!(),
        ));
    }};
}

// ============================================================================
// 2. LEVEL-SPECIFIC MACROS (Feature Gated)
// ============================================================================

// ---------------------- TRACE ----------------------
#[cfg(feature = "log-trace")]
#[macro_export]
macro_rules! logger_trace { ($logger:expr, $($arg:tt)*)          => { $crate::logger_log!($logger, $crate::log::log_level::LogLevel::Trace, $($arg)*) } }
#[cfg(feature = "log-trace")]
#[macro_export]
macro_rules! queue_trace  { ($handle:expr, $name:expr, $($arg:tt)*) => { $crate::queue_log!($handle, $name, $crate::log::log_level::LogLevel::Trace, $($arg)*) } }

#[cfg(not(feature = "log-trace"))]
#[macro_export]
macro_rules! logger_trace {
    ($($arg:tt)*) => {
        ()
    };
}
#[cfg(not(feature = "log-trace"))]
#[macro_export]
macro_rules! queue_trace {
    ($($arg:tt)*) => {
        ()
    };
}

// ---------------------- DEBUG ----------------------
#[cfg(feature = "log-debug")]
#[macro_export]
macro_rules! logger_debug { ($logger:expr, $($arg:tt)*)          => { $crate::logger_log!($logger, $crate::log::log_level::LogLevel::Debug, $($arg)*) } }
#[cfg(feature = "log-debug")]
#[macro_export]
macro_rules! queue_debug  { ($handle:expr, $name:expr, $($arg:tt)*) => { $crate::queue_log!($handle, $name, $crate::log::log_level::LogLevel::Debug, $($arg)*) } }

#[cfg(not(feature = "log-debug"))]
#[macro_export]
macro_rules! logger_debug {
    ($($arg:tt)*) => {
        ()
    };
}
#[cfg(not(feature = "log-debug"))]
#[macro_export]
macro_rules! queue_debug {
    ($($arg:tt)*) => {
        ()
    };
}

// ---------------------- INFO ----------------------
#[cfg(feature = "log-info")]
#[macro_export]
macro_rules! logger_info { ($logger:expr, $($arg:tt)*)          => { $crate::logger_log!($logger, $crate::log::log_level::LogLevel::Info, $($arg)*) } }
#[cfg(feature = "log-info")]
#[macro_export]
macro_rules! queue_info  { ($handle:expr, $name:expr, $($arg:tt)*) => { $crate::queue_log!($handle, $name, $crate::log::log_level::LogLevel::Info, $($arg)*) } }

#[cfg(not(feature = "log-info"))]
#[macro_export]
macro_rules! logger_info {
    ($($arg:tt)*) => {
        ()
    };
}
#[cfg(not(feature = "log-info"))]
#[macro_export]
macro_rules! queue_info {
    ($($arg:tt)*) => {
        ()
    };
}

// ---------------------- WARN ----------------------
#[cfg(feature = "log-warn")]
#[macro_export]
macro_rules! logger_warn { ($logger:expr, $($arg:tt)*)          => { $crate::logger_log!($logger, $crate::log::log_level::LogLevel::Warn, $($arg)*) } }
#[cfg(feature = "log-warn")]
#[macro_export]
macro_rules! queue_warn  { ($handle:expr, $name:expr, $($arg:tt)*) => { $crate::queue_log!($handle, $name, $crate::log::log_level::LogLevel::Warn, $($arg)*) } }

#[cfg(not(feature = "log-warn"))]
#[macro_export]
macro_rules! logger_warn {
    ($($arg:tt)*) => {
        ()
    };
}
#[cfg(not(feature = "log-warn"))]
#[macro_export]
macro_rules! queue_warn {
    ($($arg:tt)*) => {
        ()
    };
}

// ---------------------- ERROR / CRITICAL ----------------------
#[cfg(feature = "log-error")]
#[macro_export]
macro_rules! logger_error    { ($logger:expr, $($arg:tt)*)          => { $crate::logger_log!($logger, $crate::log::log_level::LogLevel::Error, $($arg)*) } }
#[cfg(feature = "log-error")]
#[macro_export]
macro_rules! queue_error     { ($handle:expr, $name:expr, $($arg:tt)*) => { $crate::queue_log!($handle, $name, $crate::log::log_level::LogLevel::Error, $($arg)*) } }
#[cfg(feature = "log-error")]
#[macro_export]
macro_rules! logger_critical { ($logger:expr, $($arg:tt)*)          => { $crate::logger_log!($logger, $crate::log::log_level::LogLevel::Critical, $($arg)*) } }
#[cfg(feature = "log-error")]
#[macro_export]
macro_rules! queue_critical  { ($handle:expr, $name:expr, $($arg:tt)*) => { $crate::queue_log!($handle, $name, $crate::log::log_level::LogLevel::Critical, $($arg)*) } }

#[cfg(not(feature = "log-error"))]
#[macro_export]
macro_rules! logger_error {
    ($($arg:tt)*) => {
        ()
    };
}
#[cfg(not(feature = "log-error"))]
#[macro_export]
macro_rules! queue_error {
    ($($arg:tt)*) => {
        ()
    };
}
#[cfg(not(feature = "log-error"))]
#[macro_export]
macro_rules! logger_critical {
    ($($arg:tt)*) => {
        ()
    };
}
#[cfg(not(feature = "log-error"))]
#[macro_export]
macro_rules! queue_critical {
    ($($arg:tt)*) => {
        ()
    };
}
