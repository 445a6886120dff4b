use std::sync::atomic::{AtomicU64, Ordering};

/// Delivery statistics drained by the counter reporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterSnapshot {
    pub successes: u64,
    pub failures: u64,
}

/// Process-wide success/failure tally.
///
/// The resolver increments and the reporter drains from different tasks, so
/// the pair is atomic; `drain` swaps each counter to zero so increments
/// landing during a report are never lost.
#[derive(Debug, Default)]
pub struct DeliveryCounters {
    successes: AtomicU64,
    failures: AtomicU64,
}

impl DeliveryCounters {
    pub fn record_success(&self) {
        self.successes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the accumulated counts and resets both to zero.
    pub fn drain(&self) -> CounterSnapshot {
        CounterSnapshot {
            successes: self.successes.swap(0, Ordering::Relaxed),
            failures: self.failures.swap(0, Ordering::Relaxed),
        }
    }
}
