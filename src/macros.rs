//! Logging macros for ergonomic log message formatting.
//!
//! These macros provide a convenient interface for logging with automatic
//! string formatting, similar to `println!` and `format!`. Structured fields
//! follow the format arguments after a `;`.
//!
//! # Examples
//!
//! ```
//! use service_logger::prelude::*;
//! use service_logger::info;
//!
//! let logger = Logger::new();
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! // With structured fields
//! info!(logger, "User {} logged in", "alice"; "user_id" => 42, "admin" => false);
//!
//! // Against the process-wide logger
//! # if false {
//! info!(service_logger::global::logger(), "Cache warmed"; "entries" => 1024_u64);
//! # }
//! ```

/// Build an array of [`Field`](crate::Field)s from `key => value` pairs.
///
/// # Examples
///
/// ```
/// use service_logger::fields;
///
/// let fields = fields!["user" => "alice", "attempt" => 3];
/// assert_eq!(fields.len(), 2);
/// assert_eq!(fields[0].key, "user");
/// ```
#[macro_export]
macro_rules! fields {
    ($($key:expr => $value:expr),* $(,)?) => {
        [$($crate::Field::new($key, $value)),*]
    };
}

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use service_logger::prelude::*;
/// # let logger = Logger::new();
/// use service_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// log!(logger, LogLevel::Warn, "Slow query"; "table" => "users", "ms" => 1200);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $fmt:literal $(, $arg:expr)* ; $($key:expr => $value:expr),+ $(,)?) => {
        $logger.log($level, &format!($fmt $(, $arg)*), &$crate::fields![$($key => $value),+])
    };
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, &format!($($arg)+), &[])
    };
}

/// Log a trace-level message.
///
/// # Examples
///
/// ```
/// # use service_logger::prelude::*;
/// # let logger = Logger::new();
/// use service_logger::trace;
/// trace!(logger, "Entering function: calculate()");
/// trace!(logger, "Variable value: {}", 42);
/// ```
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use service_logger::prelude::*;
/// # let logger = Logger::new();
/// use service_logger::info;
/// info!(logger, "Application started");
/// info!(logger, "Processing {} items", 100; "batch" => 7);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use service_logger::prelude::*;
/// # let logger = Logger::new();
/// use service_logger::error;
/// error!(logger, "Failed to connect to database");
/// error!(logger, "Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a development-panic message: panics only on development loggers.
#[macro_export]
macro_rules! dpanic {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::DPanic, $($arg)+)
    };
}

/// Log a fatal-level message, then apply the logger's fatal action.
///
/// # Examples
///
/// ```no_run
/// # use service_logger::prelude::*;
/// # let logger = Logger::new();
/// use service_logger::fatal;
/// fatal!(logger, "Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}
