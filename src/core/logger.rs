//! Main logger implementation

use super::{
    appender::Appender,
    error::{LoggerError, Result},
    field::Field,
    log_level::LogLevel,
    metrics::LoggerMetrics,
    record::{Caller, LogRecord},
};
use std::any::Any;
use std::backtrace::Backtrace;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// What a `Fatal` record does after it has been written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatalAction {
    /// Terminate the process with the given exit code
    Exit(i32),
    /// Unwind instead of exiting
    Panic,
}

impl Default for FatalAction {
    fn default() -> Self {
        FatalAction::Exit(1)
    }
}

/// State shared by a logger and every child derived from it
struct Core {
    appenders: Vec<Box<dyn Appender>>,
    add_caller: bool,
    stacktrace_level: Option<LogLevel>,
    development: bool,
    fatal_action: FatalAction,
    metrics: LoggerMetrics,
}

impl Core {
    fn enabled(&self, level: LogLevel) -> bool {
        self.appenders.iter().any(|appender| appender.enabled(level))
    }

    /// Write a record to every appender that admits its level
    ///
    /// **Per-Appender Panic Isolation**: each appender call is wrapped in
    /// catch_unwind so one failing appender cannot keep the record from the
    /// others.
    fn dispatch(&self, record: &LogRecord) {
        let mut has_error = false;

        for appender in self
            .appenders
            .iter()
            .filter(|appender| appender.enabled(record.level))
        {
            let append_result = catch_unwind(AssertUnwindSafe(|| appender.append(record)));

            match append_result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!("[LOGGER ERROR] Appender '{}' failed: {}", appender.name(), e);
                    has_error = true;
                }
                Err(panic_info) => {
                    eprintln!(
                        "[LOGGER CRITICAL] Appender '{}' panicked: {}. \
                         Other appenders continue to function.",
                        appender.name(),
                        panic_message(&*panic_info)
                    );
                    has_error = true;
                }
            }
        }

        if has_error {
            self.metrics.record_failed_write();
        } else {
            self.metrics.record_logged();
        }
    }
}

fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Structured logger fanning every admitted record out to its appenders
///
/// Cloning is cheap: clones and children created with [`Logger::named`] or
/// [`Logger::with`] share the same appenders and metrics.
#[derive(Clone)]
pub struct Logger {
    core: Arc<Core>,
    name: Option<String>,
    context: Vec<Field>,
}

impl Logger {
    /// A logger without appenders; every record is discarded
    #[must_use]
    pub fn new() -> Self {
        LoggerBuilder::new().build()
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use service_logger::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .appender(ConsoleAppender::new(LogLevel::Debug))
    ///     .add_caller(true)
    ///     .stacktrace_level(LogLevel::Error)
    ///     .build();
    /// assert!(logger.enabled(LogLevel::Debug));
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Whether any appender admits records at `level`
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.core.enabled(level)
    }

    /// The lowest level any appender admits, `None` without appenders
    pub fn level(&self) -> Option<LogLevel> {
        LogLevel::ALL.into_iter().find(|level| self.enabled(*level))
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_development(&self) -> bool {
        self.core.development
    }

    /// Child logger whose name is this logger's name joined with `name` by a dot
    #[must_use]
    pub fn named(&self, name: &str) -> Logger {
        let name = match self.name {
            Some(ref parent) if !parent.is_empty() => format!("{}.{}", parent, name),
            _ => name.to_string(),
        };
        Logger {
            core: Arc::clone(&self.core),
            name: Some(name),
            context: self.context.clone(),
        }
    }

    /// Child logger that adds `fields` ahead of every record's own fields
    #[must_use]
    pub fn with(&self, fields: &[Field]) -> Logger {
        let mut context = self.context.clone();
        context.extend_from_slice(fields);
        Logger {
            core: Arc::clone(&self.core),
            name: self.name.clone(),
            context,
        }
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.core.metrics
    }

    /// Flush every appender
    ///
    /// All appenders are flushed even when one fails; the first failure is
    /// returned.
    pub fn sync(&self) -> Result<()> {
        let mut first_error = None;

        for appender in &self.core.appenders {
            let result = match catch_unwind(AssertUnwindSafe(|| appender.flush())) {
                Ok(result) => {
                    result.map_err(|e| LoggerError::sync(appender.name(), e.to_string()))
                }
                Err(panic_info) => Err(LoggerError::appender_panic(
                    appender.name(),
                    panic_message(&*panic_info),
                )),
            };

            if let Err(e) = result {
                self.core.metrics.record_sync_failure();
                first_error.get_or_insert(e);
            }
        }

        first_error.map_or(Ok(()), Err)
    }

    /// Log at `level`, then escalate for `Fatal`, `DPanic` and `Panic`
    #[track_caller]
    pub fn log(&self, level: LogLevel, message: &str, fields: &[Field]) {
        self.write(level, message, fields, Caller::capture());
        match level {
            LogLevel::Fatal | LogLevel::Panic => self.terminate(level, message),
            LogLevel::DPanic if self.core.development => self.terminate(level, message),
            _ => {}
        }
    }

    #[inline]
    #[track_caller]
    pub fn trace(&self, message: &str, fields: &[Field]) {
        self.log(LogLevel::Trace, message, fields);
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, message: &str, fields: &[Field]) {
        self.log(LogLevel::Debug, message, fields);
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, message: &str, fields: &[Field]) {
        self.log(LogLevel::Info, message, fields);
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, message: &str, fields: &[Field]) {
        self.log(LogLevel::Warn, message, fields);
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, message: &str, fields: &[Field]) {
        self.log(LogLevel::Error, message, fields);
    }

    /// Logs, then panics in development mode only
    #[inline]
    #[track_caller]
    pub fn dpanic(&self, message: &str, fields: &[Field]) {
        self.log(LogLevel::DPanic, message, fields);
    }

    /// Logs, then panics with `message`, whether or not the record was admitted
    #[track_caller]
    pub fn panic(&self, message: &str, fields: &[Field]) -> ! {
        self.write(LogLevel::Panic, message, fields, Caller::capture());
        self.terminate(LogLevel::Panic, message)
    }

    /// Logs, flushes, then applies the configured [`FatalAction`]
    #[track_caller]
    pub fn fatal(&self, message: &str, fields: &[Field]) -> ! {
        self.write(LogLevel::Fatal, message, fields, Caller::capture());
        self.terminate(LogLevel::Fatal, message)
    }

    fn write(&self, level: LogLevel, message: &str, fields: &[Field], caller: Caller) {
        if !self.core.enabled(level) {
            return;
        }

        let mut all_fields = Vec::with_capacity(self.context.len() + fields.len());
        all_fields.extend_from_slice(&self.context);
        all_fields.extend_from_slice(fields);

        let mut record = LogRecord::new(level, message)
            .with_logger_name(self.name.clone())
            .with_fields(all_fields);
        if self.core.add_caller {
            record = record.with_caller(caller);
        }
        if self.core.stacktrace_level.is_some_and(|threshold| level >= threshold) {
            record = record.with_stacktrace(Backtrace::force_capture().to_string());
        }

        self.core.dispatch(&record);
    }

    #[track_caller]
    fn terminate(&self, level: LogLevel, message: &str) -> ! {
        if level == LogLevel::Fatal {
            if let Err(e) = self.sync() {
                eprintln!("[LOGGER ERROR] Failed to flush before exit: {}", e);
            }
            if let FatalAction::Exit(code) = self.core.fatal_action {
                std::process::exit(code);
            }
        }
        panic!("{}", message)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let appenders: Vec<&str> = self.core.appenders.iter().map(|a| a.name()).collect();
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("appenders", &appenders)
            .field("context", &self.context)
            .field("development", &self.core.development)
            .finish()
    }
}

/// Builder for creating a Logger with custom configuration
pub struct LoggerBuilder {
    appenders: Vec<Box<dyn Appender>>,
    name: Option<String>,
    context: Vec<Field>,
    add_caller: bool,
    stacktrace_level: Option<LogLevel>,
    development: bool,
    fatal_action: FatalAction,
}

impl LoggerBuilder {
    /// Caller capture on, stack traces from `Error` up, production mode
    pub fn new() -> Self {
        Self {
            appenders: Vec::new(),
            name: None,
            context: Vec::new(),
            add_caller: true,
            stacktrace_level: Some(LogLevel::Error),
            development: false,
            fatal_action: FatalAction::default(),
        }
    }

    /// Add an appender
    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appenders.push(Box::new(appender));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Fields added to every record
    #[must_use = "builder methods return a new value"]
    pub fn fields(mut self, fields: &[Field]) -> Self {
        self.context.extend_from_slice(fields);
        self
    }

    /// Record the call site of every record
    #[must_use = "builder methods return a new value"]
    pub fn add_caller(mut self, enabled: bool) -> Self {
        self.add_caller = enabled;
        self
    }

    /// Attach a stack trace to records at `level` or above
    #[must_use = "builder methods return a new value"]
    pub fn stacktrace_level(mut self, level: LogLevel) -> Self {
        self.stacktrace_level = Some(level);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn without_stacktrace(mut self) -> Self {
        self.stacktrace_level = None;
        self
    }

    /// In development mode `DPanic` records panic after being written
    #[must_use = "builder methods return a new value"]
    pub fn development(mut self, enabled: bool) -> Self {
        self.development = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn fatal_action(mut self, action: FatalAction) -> Self {
        self.fatal_action = action;
        self
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        Logger {
            core: Arc::new(Core {
                appenders: self.appenders,
                add_caller: self.add_caller,
                stacktrace_level: self.stacktrace_level,
                development: self.development,
                fatal_action: self.fatal_action,
                metrics: LoggerMetrics::new(),
            }),
            name: self.name,
            context: self.context,
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    /// Keeps admitted records in memory
    #[derive(Clone)]
    struct MemoryAppender {
        level: LogLevel,
        records: Arc<Mutex<Vec<LogRecord>>>,
    }

    impl MemoryAppender {
        fn new(level: LogLevel) -> Self {
            Self {
                level,
                records: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn records(&self) -> Vec<LogRecord> {
            self.records.lock().clone()
        }
    }

    impl Appender for MemoryAppender {
        fn enabled(&self, level: LogLevel) -> bool {
            level >= self.level
        }

        fn append(&self, record: &LogRecord) -> Result<()> {
            self.records.lock().push(record.clone());
            Ok(())
        }

        fn flush(&self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "memory"
        }
    }

    struct FailingAppender;

    impl Appender for FailingAppender {
        fn enabled(&self, _level: LogLevel) -> bool {
            true
        }

        fn append(&self, _record: &LogRecord) -> Result<()> {
            Err(LoggerError::writer("disk unplugged"))
        }

        fn flush(&self) -> Result<()> {
            Err(LoggerError::writer("disk unplugged"))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct PanickingAppender;

    impl Appender for PanickingAppender {
        fn enabled(&self, _level: LogLevel) -> bool {
            true
        }

        fn append(&self, _record: &LogRecord) -> Result<()> {
            panic!("appender bug");
        }

        fn flush(&self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "panicking"
        }
    }

    #[test]
    fn test_builder_default() {
        let logger = Logger::builder().build();
        assert_eq!(logger.level(), None);
        assert!(!logger.enabled(LogLevel::Panic));
        assert!(!logger.is_development());
    }

    #[test]
    fn test_level_is_lowest_admitted() {
        let logger = Logger::builder()
            .appender(MemoryAppender::new(LogLevel::Warn))
            .appender(MemoryAppender::new(LogLevel::Error))
            .build();
        assert_eq!(logger.level(), Some(LogLevel::Warn));
        assert!(!logger.enabled(LogLevel::Info));
    }

    #[test]
    fn test_filtering_per_appender() {
        let verbose = MemoryAppender::new(LogLevel::Debug);
        let quiet = MemoryAppender::new(LogLevel::Error);
        let logger = Logger::builder()
            .appender(verbose.clone())
            .appender(quiet.clone())
            .build();

        logger.trace("dropped everywhere", &[]);
        logger.debug("verbose only", &[]);
        logger.error("both", &[]);

        assert_eq!(verbose.records().len(), 2);
        assert_eq!(quiet.records().len(), 1);
        assert_eq!(quiet.records()[0].message, "both");
    }

    #[test]
    fn test_caller_points_at_call_site() {
        let memory = MemoryAppender::new(LogLevel::Info);
        let logger = Logger::builder().appender(memory.clone()).build();

        let line = line!() + 1;
        logger.info("here", &[]);

        let caller = memory.records()[0].caller.expect("caller captured");
        assert!(caller.file.ends_with("logger.rs"));
        assert_eq!(caller.line, line);
    }

    #[test]
    fn test_caller_disabled() {
        let memory = MemoryAppender::new(LogLevel::Info);
        let logger = Logger::builder()
            .appender(memory.clone())
            .add_caller(false)
            .build();

        logger.info("nowhere", &[]);
        assert!(memory.records()[0].caller.is_none());
    }

    #[test]
    fn test_stacktrace_only_from_threshold() {
        let memory = MemoryAppender::new(LogLevel::Info);
        let logger = Logger::builder().appender(memory.clone()).build();

        logger.warn("no trace", &[]);
        logger.error("with trace", &[]);

        let records = memory.records();
        assert!(records[0].stacktrace.is_none());
        assert!(!records[1].stacktrace.as_deref().unwrap_or("").is_empty());
    }

    #[test]
    fn test_without_stacktrace() {
        let memory = MemoryAppender::new(LogLevel::Info);
        let logger = Logger::builder()
            .appender(memory.clone())
            .without_stacktrace()
            .build();

        logger.error("no trace either", &[]);
        assert!(memory.records()[0].stacktrace.is_none());
    }

    #[test]
    fn test_named_and_with() {
        let memory = MemoryAppender::new(LogLevel::Info);
        let logger = Logger::builder()
            .appender(memory.clone())
            .fields(&[Field::new("service", "users")])
            .build();

        let child = logger
            .named("http")
            .named("handler")
            .with(&[Field::new("request_id", "abc")]);
        child.info("handled", &[Field::new("status", 200)]);

        let record = &memory.records()[0];
        assert_eq!(record.logger_name.as_deref(), Some("http.handler"));
        let keys: Vec<&str> = record.fields.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["service", "request_id", "status"]);
        assert_eq!(logger.name(), None);
    }

    #[test]
    fn test_failing_appender_does_not_block_others() {
        let memory = MemoryAppender::new(LogLevel::Info);
        let logger = Logger::builder()
            .appender(FailingAppender)
            .appender(PanickingAppender)
            .appender(memory.clone())
            .build();

        logger.info("still delivered", &[]);

        assert_eq!(memory.records().len(), 1);
        assert_eq!(logger.metrics().failed_writes(), 1);
        assert_eq!(logger.metrics().total_logged(), 0);
    }

    #[test]
    fn test_sync_reports_first_failure() {
        let logger = Logger::builder()
            .appender(MemoryAppender::new(LogLevel::Info))
            .appender(FailingAppender)
            .build();

        let err = logger.sync().unwrap_err();
        assert!(matches!(err, LoggerError::SyncError { ref appender, .. } if appender == "failing"));
        assert_eq!(logger.metrics().sync_failures(), 1);
    }

    #[test]
    fn test_dpanic_logs_only_in_production() {
        let memory = MemoryAppender::new(LogLevel::Info);
        let logger = Logger::builder()
            .appender(memory.clone())
            .development(false)
            .build();

        logger.dpanic("tolerated", &[]);
        assert_eq!(memory.records()[0].level, LogLevel::DPanic);
    }

    #[test]
    #[should_panic(expected = "not tolerated")]
    fn test_dpanic_panics_in_development() {
        let logger = Logger::builder()
            .appender(MemoryAppender::new(LogLevel::Info))
            .development(true)
            .build();

        logger.dpanic("not tolerated", &[]);
    }

    #[test]
    fn test_panic_logs_before_unwinding() {
        let memory = MemoryAppender::new(LogLevel::Info);
        let logger = Logger::builder().appender(memory.clone()).build();

        let result = catch_unwind(AssertUnwindSafe(|| {
            logger.panic("giving up", &[Field::new("attempt", 3)]);
        }));

        assert!(result.is_err());
        let records = memory.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level, LogLevel::Panic);
    }

    #[test]
    #[should_panic(expected = "filtered but fatal")]
    fn test_fatal_escalates_even_when_filtered() {
        let logger = Logger::builder()
            .fatal_action(FatalAction::Panic)
            .build();

        logger.fatal("filtered but fatal", &[]);
    }

    #[test]
    fn test_log_dispatches_every_level() {
        let memory = MemoryAppender::new(LogLevel::Trace);
        let logger = Logger::builder().appender(memory.clone()).build();

        for level in [LogLevel::Trace, LogLevel::Debug, LogLevel::Info, LogLevel::Warn, LogLevel::Error] {
            logger.log(level, "msg", &[]);
        }

        let levels: Vec<LogLevel> = memory.records().iter().map(|r| r.level).collect();
        assert_eq!(levels, LogLevel::ALL[..5].to_vec());
    }
}
