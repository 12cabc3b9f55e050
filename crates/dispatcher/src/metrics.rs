//! Notifier counters, accumulated across invocations

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for one notifier
#[derive(Debug, Default)]
pub struct NotifierMetrics {
    /// Sends that completed successfully
    sent_count: AtomicU64,
    /// Sends that returned an error or panicked
    failure_count: AtomicU64,
    /// Targets skipped by their conditions
    excluded_count: AtomicU64,
}

impl NotifierMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent_count(&self) -> u64 {
        self.sent_count.load(Ordering::Relaxed)
    }

    pub fn inc_sent_count(&self) {
        self.sent_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn excluded_count(&self) -> u64 {
        self.excluded_count.load(Ordering::Relaxed)
    }

    pub fn inc_excluded_count(&self) {
        self.excluded_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            sent_count: self.sent_count(),
            failure_count: self.failure_count(),
            excluded_count: self.excluded_count(),
        }
    }
}

/// Snapshot of notifier counters (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub sent_count: u64,
    pub failure_count: u64,
    pub excluded_count: u64,
}
