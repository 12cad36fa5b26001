//! Log level definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a log record.
///
/// Ordered from least to most severe. The two panic variants sit above
/// `Fatal`: they are admitted by every filter that admits `Fatal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    #[default]
    Info = 2,
    Warn = 3,
    Error = 4,
    Fatal = 5,
    /// Panics in development mode, logs only otherwise
    DPanic = 6,
    Panic = 7,
}

impl LogLevel {
    /// Every level, least severe first.
    pub const ALL: [LogLevel; 8] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Fatal,
        LogLevel::DPanic,
        LogLevel::Panic,
    ];

    /// Capitalized label, as rendered in log output
    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
            LogLevel::DPanic => "DPANIC",
            LogLevel::Panic => "PANIC",
        }
    }

    /// Lowercase name, as accepted by [`LogLevel::from_config_name`]
    pub fn as_lowercase(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Fatal => "fatal",
            LogLevel::DPanic => "dpanic",
            LogLevel::Panic => "panic",
        }
    }

    /// Resolve the minimum level requested at initialization.
    ///
    /// Matching is exact and case-sensitive against `debug`, `info`, `warn`,
    /// `error` and `fatal`. Anything else, the empty string included,
    /// resolves to [`LogLevel::Info`].
    ///
    /// ```
    /// use service_logger::LogLevel;
    ///
    /// assert_eq!(LogLevel::from_config_name("warn"), LogLevel::Warn);
    /// assert_eq!(LogLevel::from_config_name("WARN"), LogLevel::Info);
    /// assert_eq!(LogLevel::from_config_name(""), LogLevel::Info);
    /// ```
    pub fn from_config_name(name: &str) -> Self {
        match name {
            "debug" => LogLevel::Debug,
            "info" => LogLevel::Info,
            "warn" => LogLevel::Warn,
            "error" => LogLevel::Error,
            "fatal" => LogLevel::Fatal,
            _ => LogLevel::Info,
        }
    }

    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            LogLevel::Trace => BrightBlack,
            LogLevel::Debug => Magenta,
            LogLevel::Info => Blue,
            LogLevel::Warn => Yellow,
            LogLevel::Error => Red,
            LogLevel::Fatal | LogLevel::DPanic | LogLevel::Panic => BrightRed,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "FATAL" => Ok(LogLevel::Fatal),
            "DPANIC" => Ok(LogLevel::DPanic),
            "PANIC" => Ok(LogLevel::Panic),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}
