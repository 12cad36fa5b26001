//! File logging example
//!
//! Demonstrates a custom log path and module tag through
//! `global::initialize_with`.
//!
//! Run with: cargo run --example file_logging

use service_logger::prelude::*;
use std::path::PathBuf;

fn main() {
    println!("=== Service Logger - File Logging Example ===\n");

    let log_path = PathBuf::from("application.log");
    let constructed = global::initialize_with(FacadeConfig {
        log_path: log_path.clone(),
        module: "billing-service".to_string(),
        logger_name: Some("billing".to_string()),
        ..FacadeConfig::with_level("info")
    });
    println!("Logger constructed by this call: {}\n", constructed);

    println!("1. Logging to both console and file:");
    global::info("Application started", &[]);
    global::debug("Loading configuration...", &[]);
    global::info("Configuration loaded successfully", &[]);
    global::warn("Using default settings for some options", &[]);
    global::info("Connecting to database...", &[]);
    global::info("Database connection established", &[]);
    global::error("Failed to load optional plugin", &[Field::new("plugin", "reports")]);

    println!("\n2. Performing some operations:");
    for i in 1..=5 {
        global::log_with_context(
            LogLevel::Info,
            &format!("Processing item {}/5", i),
            &[Field::new("item", i)],
        );
        if i == 3 {
            global::warn("Item 3 took longer than expected", &[]);
        }
    }

    global::info("All operations completed", &[]);

    // File writes are unbuffered; sync flushes the console too
    if let Err(e) = global::logger().sync() {
        eprintln!("sync failed: {}", e);
    }

    println!("\n=== Example completed successfully! ===");
    println!("Check '{}' for the full log output", log_path.display());
}
