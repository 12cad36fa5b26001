//! Logger metrics for observability
//!
//! Counters for monitoring logger health: records written, appender write
//! failures and flush failures.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use service_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_logged();
/// metrics.record_failed_write();
///
/// assert_eq!(metrics.total_logged(), 1);
/// assert_eq!(metrics.failed_writes(), 1);
/// ```
#[derive(Debug, Default)]
pub struct LoggerMetrics {
    /// Records delivered to every enabled appender
    total_logged: AtomicU64,

    /// Records that at least one appender failed to write
    failed_writes: AtomicU64,

    /// Failed flush attempts
    sync_failures: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            total_logged: AtomicU64::new(0),
            failed_writes: AtomicU64::new(0),
            sync_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn total_logged(&self) -> u64 {
        self.total_logged.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn failed_writes(&self) -> u64 {
        self.failed_writes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sync_failures(&self) -> u64 {
        self.sync_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_logged(&self) -> u64 {
        self.total_logged.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_failed_write(&self) -> u64 {
        self.failed_writes.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sync_failure(&self) -> u64 {
        self.sync_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of records that failed to reach some appender (0.0 - 100.0)
    pub fn failure_rate(&self) -> f64 {
        let failed = self.failed_writes();
        let total = self.total_logged() + failed;
        if total == 0 {
            0.0
        } else {
            (failed as f64 / total as f64) * 100.0
        }
    }
}
