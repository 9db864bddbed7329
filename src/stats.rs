//! Counters for a running schedule.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of a schedule's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PublishStats {
    /// Ticks that started a read
    pub ticks: u64,
    /// Lines the broker client accepted
    pub published: u64,
    /// Lines the broker client rejected (dropped, not retried)
    pub publish_failures: u64,
    /// Reads that failed for a reason other than end-of-input
    pub read_failures: u64,
}

impl PublishStats {
    /// Lines handed to the broker client, whether or not delivery succeeded
    pub fn attempted(&self) -> u64 {
        self.published + self.publish_failures
    }
}

/// Shared atomic counters behind [`PublishStats`].
#[derive(Debug, Default)]
pub(crate) struct StatsRecorder {
    ticks: AtomicU64,
    published: AtomicU64,
    publish_failures: AtomicU64,
    read_failures: AtomicU64,
}

impl StatsRecorder {
    pub(crate) fn record_tick(&self) -> u64 {
        self.ticks.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(crate) fn record_published(&self) -> u64 {
        self.published.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(crate) fn record_publish_failure(&self) {
        self.publish_failures.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn record_read_failure(&self) {
        self.read_failures.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn snapshot(&self) -> PublishStats {
        PublishStats {
            ticks: self.ticks.load(Ordering::SeqCst),
            published: self.published.load(Ordering::SeqCst),
            publish_failures: self.publish_failures.load(Ordering::SeqCst),
            read_failures: self.read_failures.load(Ordering::SeqCst),
        }
    }
}
