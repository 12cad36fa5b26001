//! Appender trait for log output destinations
//!
//! An appender is one sink: a destination, an encoding and a minimum level.
//! Methods take `&self`; implementations guard their writer so that a record
//! is written in one piece even when many threads log at once.

use super::{error::Result, log_level::LogLevel, record::LogRecord};

pub trait Appender: Send + Sync {
    /// Whether records at `level` pass this appender's filter
    fn enabled(&self, level: LogLevel) -> bool;
    fn append(&self, record: &LogRecord) -> Result<()>;
    fn flush(&self) -> Result<()>;
    fn name(&self) -> &str;
}
