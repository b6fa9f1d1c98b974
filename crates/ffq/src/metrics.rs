use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for monitoring queue activity. Uses atomics
/// internally so any consumer or the producer can update it without
/// coordination; reading a [`MetricsSnapshot`] is a separate, non-atomic
/// step since the individual counters are not meant to be read consistently
/// as a group.
#[derive(Debug, Default)]
pub struct Metrics {
    messages_enqueued: AtomicU64,
    messages_dequeued: AtomicU64,
    gaps_written: AtomicU64,
    gaps_skipped: AtomicU64,
    backoff_waits: AtomicU64,
}

impl Metrics {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn add_enqueued(&self, n: u64) {
        self.messages_enqueued.fetch_add(n, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_dequeued(&self, n: u64) {
        self.messages_dequeued.fetch_add(n, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_gap_written(&self, n: u64) {
        self.gaps_written.fetch_add(n, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_gap_skipped(&self, n: u64) {
        self.gaps_skipped.fetch_add(n, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_backoff_wait(&self, n: u64) {
        self.backoff_waits.fetch_add(n, Ordering::Relaxed);
    }

    /// Takes a point-in-time snapshot of all counters.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            messages_enqueued: self.messages_enqueued.load(Ordering::Relaxed),
            messages_dequeued: self.messages_dequeued.load(Ordering::Relaxed),
            gaps_written: self.gaps_written.load(Ordering::Relaxed),
            gaps_skipped: self.gaps_skipped.load(Ordering::Relaxed),
            backoff_waits: self.backoff_waits.load(Ordering::Relaxed),
        }
    }
}

/// A consistent-enough point-in-time read of [`Metrics`]. Individual fields
/// may be slightly stale relative to each other; this is a monitoring
/// affordance, not a correctness mechanism.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub messages_enqueued: u64,
    pub messages_dequeued: u64,
    pub gaps_written: u64,
    pub gaps_skipped: u64,
    pub backoff_waits: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_updates() {
        let metrics = Metrics::new();
        metrics.add_enqueued(3);
        metrics.add_gap_written(1);
        metrics.add_dequeued(2);
        metrics.add_gap_skipped(1);
        metrics.add_backoff_wait(5);

        let snap = metrics.snapshot();
        assert_eq!(snap.messages_enqueued, 3);
        assert_eq!(snap.messages_dequeued, 2);
        assert_eq!(snap.gaps_written, 1);
        assert_eq!(snap.gaps_skipped, 1);
        assert_eq!(snap.backoff_waits, 5);
    }
}
