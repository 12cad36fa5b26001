//! Process-wide logger whose log file cannot be opened
//!
//! Global state lives for the whole test binary, so the scenario runs as a
//! single test.

use service_logger::global::{self, FacadeConfig};
use service_logger::LogLevel;
use tempfile::TempDir;

#[test]
fn test_missing_directory_degrades_to_stdout() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("removed").join("user-service.log");

    let constructed = global::initialize_with(FacadeConfig {
        log_path: log_file.clone(),
        ..FacadeConfig::with_level("info")
    });
    assert!(constructed);

    // Both appenders now write to stdout; nothing fails
    global::info("z", &[]);
    global::warn("still here", &[]);

    let logger = global::logger();
    assert_eq!(logger.level(), Some(LogLevel::Info));
    assert_eq!(logger.metrics().failed_writes(), 0);
    assert_eq!(logger.metrics().total_logged(), 2);
    assert!(logger.sync().is_ok());
    assert!(!log_file.exists());
}
