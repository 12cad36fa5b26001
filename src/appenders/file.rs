//! File appender implementation

use crate::core::{Appender, Encoder, LogLevel, LogRecord, LoggerError, Result};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Where a [`FileAppender`] actually writes
enum FileTarget {
    File(File),
    /// The log file could not be opened
    Stdout(io::Stdout),
}

impl FileTarget {
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match self {
            FileTarget::File(file) => file.write_all(buf),
            FileTarget::Stdout(stdout) => stdout.lock().write_all(buf),
        }
    }

    fn sync(&mut self) -> io::Result<()> {
        match self {
            FileTarget::File(file) => file.sync_data(),
            FileTarget::Stdout(stdout) => stdout.flush(),
        }
    }
}

/// Appends encoded records to a log file
///
/// The file is opened append-only and created when absent (mode `0644` on
/// Unix). Writes are unbuffered: each record reaches the file in a single
/// `write_all` made under the appender's lock, so lines from concurrent
/// threads never interleave and nothing is lost if the process exits
/// without flushing.
pub struct FileAppender {
    path: PathBuf,
    target: Mutex<FileTarget>,
    encoder: Encoder,
    level: LogLevel,
}

impl FileAppender {
    pub fn open(path: impl AsRef<Path>, encoder: Encoder, level: LogLevel) -> Result<Self> {
        let path = path.as_ref();
        let file = open_log_file(path).map_err(|e| {
            LoggerError::io_operation(
                "opening log file",
                format!("cannot open '{}' for appending", path.display()),
                e,
            )
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            target: Mutex::new(FileTarget::File(file)),
            encoder,
            level,
        })
    }

    /// Like [`FileAppender::open`], but falls back to standard output when
    /// the file cannot be opened
    ///
    /// The failure is reported on stderr and never returned.
    pub fn open_or_stdout(path: impl AsRef<Path>, encoder: Encoder, level: LogLevel) -> Self {
        let path = path.as_ref();
        match Self::open(path, encoder.clone(), level) {
            Ok(appender) => appender,
            Err(e) => {
                eprintln!("[LOGGER WARNING] Failed to open log file: {}. Writing to stdout instead.", e);
                Self {
                    path: path.to_path_buf(),
                    target: Mutex::new(FileTarget::Stdout(io::stdout())),
                    encoder,
                    level,
                }
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when records go to stdout because the file could not be opened
    pub fn is_stdout_fallback(&self) -> bool {
        matches!(*self.target.lock(), FileTarget::Stdout(_))
    }
}

fn open_log_file(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.create(true).append(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }

    options.open(path)
}

impl Appender for FileAppender {
    fn enabled(&self, level: LogLevel) -> bool {
        level >= self.level
    }

    fn append(&self, record: &LogRecord) -> Result<()> {
        let line = self.encoder.encode(record);
        self.target.lock().write_all(line.as_bytes()).map_err(|e| {
            LoggerError::file_appender(self.path.display().to_string(), e.to_string())
        })
    }

    fn flush(&self) -> Result<()> {
        self.target.lock().sync()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}
