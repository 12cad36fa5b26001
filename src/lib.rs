//! # Service Logger
//!
//! A process-wide structured logging facade. One initialization call sets a
//! minimum level; every record is then written both as a JSON line to a log
//! file and as colored, human-readable text to stdout.
//!
//! ## Features
//!
//! - **Initialize once**: [`global::initialize`] builds the logger exactly
//!   once per process; later calls are no-ops
//! - **Lazy defaults**: any emit function initializes at `info` if nothing
//!   did before it
//! - **Structured fields**: ordered, typed key/value pairs on every record
//! - **Call sites and stack traces**: every record names its caller; records
//!   at `ERROR` and above carry a stack trace
//! - **Never fails the caller**: an unopenable log file falls back to stdout
//!
//! ```no_run
//! use service_logger::{global, Field, LogLevel};
//!
//! global::initialize("warn");
//! global::info("not written", &[]);
//! global::error("written to file and console", &[Field::new("code", 500)]);
//! global::log_with_context(LogLevel::Warn, "cache miss", &[Field::new("key", "user:1")]);
//! ```

pub mod appenders;
pub mod core;
pub mod global;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, FileAppender};
    pub use crate::core::{
        Appender, Caller, Encoder, EncoderConfig, FatalAction, Field, FieldValue, LevelFormat,
        LogLevel, LogRecord, Logger, LoggerBuilder, LoggerError, LoggerMetrics, Result,
        TimestampFormat,
    };
    pub use crate::global::{self, FacadeConfig};
}

pub use crate::appenders::{ConsoleAppender, FileAppender};
pub use crate::core::{
    Appender, Caller, CallerFormat, DurationFormat, Encoder, EncoderConfig, Encoding,
    FatalAction, Field, FieldValue, LevelFormat, LogLevel, LogRecord, Logger, LoggerBuilder,
    LoggerError, LoggerMetrics, Result, TimestampFormat,
};
pub use crate::global::FacadeConfig;
