//! Core logger types and traits

pub mod appender;
pub mod encoder;
pub mod error;
pub mod field;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod record;
pub mod timestamp;

pub use appender::Appender;
pub use encoder::{CallerFormat, DurationFormat, Encoder, EncoderConfig, Encoding, LevelFormat};
pub use error::{LoggerError, Result};
pub use field::{Field, FieldValue};
pub use log_level::LogLevel;
pub use logger::{FatalAction, Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use record::{Caller, LogRecord};
pub use timestamp::TimestampFormat;
