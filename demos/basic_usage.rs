//! Basic facade usage example
//!
//! Demonstrates one-time initialization, every non-terminating level, and
//! context-tagged records. Records go to `./user-service.log` as JSON lines
//! and to stdout as colored text.
//!
//! Run with: cargo run --example basic_usage

use service_logger::prelude::*;
use std::panic;
use std::time::Duration;

fn main() {
    println!("=== Service Logger - Basic Usage Example ===\n");

    // Only the first call counts
    global::initialize("debug");
    global::initialize("error");

    println!("1. Logging at different levels:");
    global::trace("This is a trace message (below debug, hidden)", &[]);
    global::debug("This is a debug message", &[]);
    global::info("This is an info message", &[Field::new("user_id", 42)]);
    global::warn(
        "This is a warning message",
        &[Field::duration("latency", Duration::from_millis(870))],
    );
    global::error("This is an error message (with stack trace)", &[]);

    println!("\n2. Context-tagged records:");
    global::log_with_context(LogLevel::Info, "cache miss", &[Field::new("key", "user:42")]);
    global::log_with_context(LogLevel::Warn, "slow query", &[Field::new("rows", 12_000)]);

    println!("\n3. Panic levels write the record, then unwind:");
    let result = panic::catch_unwind(|| global::panic("unrecoverable state", &[]));
    println!("   panic level unwound: {}", result.is_err());

    // Development mode (debug builds) makes dpanic panic too
    let result = panic::catch_unwind(|| global::dpanic("should never happen", &[]));
    println!("   dpanic level unwound: {}", result.is_err());

    // global::fatal would write its record and exit with status 1

    println!("\n=== Example completed successfully! ===");
    println!("Check 'user-service.log' for the JSON output");
}
