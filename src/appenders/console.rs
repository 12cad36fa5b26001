//! Console appender implementation

use crate::core::{Appender, Encoder, EncoderConfig, LevelFormat, LogLevel, LogRecord, Result};
use parking_lot::Mutex;
use std::io::{self, Write};

/// Writes human-readable records to standard output
///
/// Every level goes to stdout. [`ConsoleAppender::with_writer`] redirects
/// output to any writer.
pub struct ConsoleAppender {
    writer: Mutex<Box<dyn Write + Send>>,
    encoder: Encoder,
    level: LogLevel,
}

impl ConsoleAppender {
    /// Colored console encoding on stdout
    pub fn new(level: LogLevel) -> Self {
        let config = EncoderConfig::default().with_level_format(LevelFormat::CapitalColor);
        Self::with_encoder(Encoder::console(config), level)
    }

    pub fn with_encoder(encoder: Encoder, level: LogLevel) -> Self {
        Self::with_writer(io::stdout(), encoder, level)
    }

    pub fn with_writer<W>(writer: W, encoder: Encoder, level: LogLevel) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            writer: Mutex::new(Box::new(writer)),
            encoder,
            level,
        }
    }
}

impl Appender for ConsoleAppender {
    fn enabled(&self, level: LogLevel) -> bool {
        level >= self.level
    }

    fn append(&self, record: &LogRecord) -> Result<()> {
        let line = self.encoder.encode(record);
        self.writer.lock().write_all(line.as_bytes())?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
