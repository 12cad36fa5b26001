//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// File appender error with path
    #[error("File appender error for '{path}': {message}")]
    FileAppenderError { path: String, message: String },

    /// Flushing an appender failed
    #[error("Failed to sync appender '{appender}': {message}")]
    SyncError { appender: String, message: String },

    /// An appender panicked while handling a record
    #[error("Appender '{appender}' panicked: {message}")]
    AppenderPanic { appender: String, message: String },

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    WriterError(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a file appender error
    pub fn file_appender(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileAppenderError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a sync error
    pub fn sync(appender: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::SyncError {
            appender: appender.into(),
            message: message.into(),
        }
    }

    /// Create an appender panic error
    pub fn appender_panic(appender: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::AppenderPanic {
            appender: appender.into(),
            message: message.into(),
        }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }
}
