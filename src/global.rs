//! Process-wide logger
//!
//! One [`Logger`] per process, built exactly once, either by an explicit
//! [`initialize`]/[`initialize_with`] call or lazily with default settings
//! by the first function that needs it. Every record goes to two appenders
//! sharing one minimum level: JSON lines appended to a log file and
//! colored text on stdout.
//!
//! ```no_run
//! use service_logger::{global, Field};
//!
//! global::initialize("debug");
//! global::info("server started", &[Field::new("port", 8080)]);
//! ```
//!
//! Nothing here returns an error. Problems met while setting up (an
//! unopenable log file, a failed flush) are reported on stderr and the
//! logger carries on; only `fatal` and `panic` interrupt the caller.

use crate::appenders::{ConsoleAppender, FileAppender};
use crate::core::{Encoder, EncoderConfig, Field, LevelFormat, LogLevel, Logger};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::OnceLock;

pub const DEFAULT_LOG_PATH: &str = "./user-service.log";
pub const DEFAULT_MODULE: &str = "product-service";
/// Key of the field [`log_with_context`] adds to every record
pub const MODULE_KEY: &str = "module";

static FACADE: OnceLock<Facade> = OnceLock::new();

/// Settings for the process-wide logger
///
/// Every field has a default, so a partial document deserializes:
///
/// ```
/// use service_logger::global::FacadeConfig;
///
/// let config: FacadeConfig = serde_json::from_str(r#"{"level": "warn"}"#).unwrap();
/// assert_eq!(config.log_path.to_str(), Some("./user-service.log"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FacadeConfig {
    /// Minimum level name, resolved with [`LogLevel::from_config_name`]
    pub level: String,
    pub log_path: PathBuf,
    /// Value of the `module` field added by [`log_with_context`]
    pub module: String,
    pub logger_name: Option<String>,
    /// `dpanic` panics when set
    pub development: bool,
}

impl Default for FacadeConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info.as_lowercase().to_string(),
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            module: DEFAULT_MODULE.to_string(),
            logger_name: None,
            development: cfg!(debug_assertions),
        }
    }
}

impl FacadeConfig {
    pub fn with_level(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            ..Self::default()
        }
    }

    pub fn resolved_level(&self) -> LogLevel {
        LogLevel::from_config_name(&self.level)
    }

    /// Build the two-appender logger this configuration describes
    ///
    /// Falls back to stdout for the file stream when the log file cannot
    /// be opened.
    pub fn build_logger(&self) -> Logger {
        let level = self.resolved_level();
        let encoder_config = EncoderConfig::default();

        let file = FileAppender::open_or_stdout(
            &self.log_path,
            Encoder::json(encoder_config.clone()),
            level,
        );
        let console = ConsoleAppender::with_encoder(
            Encoder::console(encoder_config.with_level_format(LevelFormat::CapitalColor)),
            level,
        );

        let mut builder = Logger::builder()
            .appender(file)
            .appender(console)
            .add_caller(true)
            .stacktrace_level(LogLevel::Error)
            .development(self.development);
        if let Some(ref name) = self.logger_name {
            builder = builder.name(name.clone());
        }
        builder.build()
    }
}

struct Facade {
    logger: Logger,
    module: String,
}

impl Facade {
    fn new(config: FacadeConfig) -> Self {
        let logger = config.build_logger();
        if let Err(e) = logger.sync() {
            eprintln!("[LOGGER ERROR] Failed to flush logger: {}", e);
        }
        Self {
            logger,
            module: config.module,
        }
    }
}

fn facade() -> &'static Facade {
    FACADE.get_or_init(|| {
        eprintln!("[LOGGER WARNING] Logger not initialized. Initializing with default settings.");
        Facade::new(FacadeConfig::default())
    })
}

/// Initialize the process-wide logger with a minimum level name
///
/// Only the first initialization takes effect; later calls do nothing.
/// Unrecognized names, the empty string included, mean `info`.
pub fn initialize(level: &str) {
    initialize_with(FacadeConfig::with_level(level));
}

/// Initialize the process-wide logger from a full configuration
///
/// Returns `true` when this call built the logger, `false` when one already
/// existed and `config` was ignored.
pub fn initialize_with(config: FacadeConfig) -> bool {
    let mut constructed = false;
    FACADE.get_or_init(|| {
        constructed = true;
        Facade::new(config)
    });
    constructed
}

pub fn is_initialized() -> bool {
    FACADE.get().is_some()
}

/// The process-wide logger, initialized at `info` if nothing else did first
pub fn logger() -> &'static Logger {
    &facade().logger
}

#[track_caller]
pub fn trace(message: &str, fields: &[Field]) {
    logger().trace(message, fields);
}

#[track_caller]
pub fn debug(message: &str, fields: &[Field]) {
    logger().debug(message, fields);
}

#[track_caller]
pub fn info(message: &str, fields: &[Field]) {
    logger().info(message, fields);
}

#[track_caller]
pub fn warn(message: &str, fields: &[Field]) {
    logger().warn(message, fields);
}

#[track_caller]
pub fn error(message: &str, fields: &[Field]) {
    logger().error(message, fields);
}

/// Logs, flushes and exits the process with status 1
#[track_caller]
pub fn fatal(message: &str, fields: &[Field]) -> ! {
    logger().fatal(message, fields)
}

/// Logs, then panics with `message`
#[track_caller]
pub fn panic(message: &str, fields: &[Field]) -> ! {
    logger().panic(message, fields)
}

/// Logs, then panics only when the logger runs in development mode
#[track_caller]
pub fn dpanic(message: &str, fields: &[Field]) {
    logger().dpanic(message, fields);
}

/// Log at `level` with the configured `module` field ahead of `fields`
///
/// Initializes the logger with defaults when needed, like every other
/// function here. Each level goes to its own emitter, so `Fatal`, `DPanic`
/// and `Panic` escalate exactly as [`fatal`], [`dpanic`] and [`panic`] do.
#[track_caller]
pub fn log_with_context(level: LogLevel, message: &str, fields: &[Field]) {
    let facade = facade();
    let mut all_fields = Vec::with_capacity(fields.len() + 1);
    all_fields.push(Field::string(MODULE_KEY, facade.module.as_str()));
    all_fields.extend_from_slice(fields);

    let logger = &facade.logger;
    match level {
        LogLevel::Trace => logger.trace(message, &all_fields),
        LogLevel::Debug => logger.debug(message, &all_fields),
        LogLevel::Info => logger.info(message, &all_fields),
        LogLevel::Warn => logger.warn(message, &all_fields),
        LogLevel::Error => logger.error(message, &all_fields),
        LogLevel::Fatal => logger.fatal(message, &all_fields),
        LogLevel::DPanic => logger.dpanic(message, &all_fields),
        LogLevel::Panic => logger.panic(message, &all_fields),
    }
}
