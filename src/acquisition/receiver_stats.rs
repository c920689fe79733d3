use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared between a receiver and its worker. Never reset.
#[derive(Debug, Default)]
pub struct ReceiverStats {
    delivered: AtomicU64,
    parse_failures: AtomicU64,
    read_errors: AtomicU64,
    rejected: AtomicU64,
}

/// Point-in-time copy of [`ReceiverStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Samples handed to the handler.
    pub delivered: u64,
    pub parse_failures: u64,
    pub read_errors: u64,
    /// Datagrams dropped by source filtering.
    pub rejected: u64,
}

impl ReceiverStats {
    /// Counts one delivery and returns the running total.
    pub(crate) fn record_delivered(&self) -> u64 {
        self.delivered.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub(crate) fn record_parse_failure(&self) {
        self.parse_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_read_error(&self) {
        self.read_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            delivered: self.delivered.load(Ordering::Relaxed),
            parse_failures: self.parse_failures.load(Ordering::Relaxed),
            read_errors: self.read_errors.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
        }
    }
}
