//! Log record structure

use super::field::Field;
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::panic::Location;

/// Call site of the emitting function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Caller {
    pub file: &'static str,
    pub line: u32,
}

impl Caller {
    /// Capture the location of the outermost `#[track_caller]` frame
    #[track_caller]
    pub fn capture() -> Self {
        Self::from(Location::caller())
    }

    /// `dir/file.rs:line`, keeping only the last directory of the path
    pub fn short(&self) -> String {
        let mut parts = self.file.rsplitn(3, ['/', '\\']);
        let file = parts.next().unwrap_or(self.file);
        match parts.next() {
            Some(dir) => format!("{}/{}:{}", dir, file, self.line),
            None => format!("{}:{}", file, self.line),
        }
    }

    /// Full source path and line
    pub fn full(&self) -> String {
        format!("{}:{}", self.file, self.line)
    }
}

impl From<&'static Location<'static>> for Caller {
    fn from(location: &'static Location<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
        }
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logger_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caller: Option<Caller>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stacktrace: Option<String>,
    pub fields: Vec<Field>,
}

impl LogRecord {
    pub fn new(level: LogLevel, message: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            logger_name: None,
            caller: None,
            message: message.to_string(),
            stacktrace: None,
            fields: Vec::new(),
        }
    }

    pub fn with_logger_name(mut self, name: Option<String>) -> Self {
        self.logger_name = name;
        self
    }

    pub fn with_caller(mut self, caller: Caller) -> Self {
        self.caller = Some(caller);
        self
    }

    pub fn with_stacktrace(mut self, stacktrace: String) -> Self {
        self.stacktrace = Some(stacktrace);
        self
    }

    pub fn with_fields(mut self, fields: Vec<Field>) -> Self {
        self.fields = fields;
        self
    }
}
