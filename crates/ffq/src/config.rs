use crate::error::FfqError;
use std::time::Duration;

/// Configuration for a [`crate::FfqHandle`] / [`crate::Region`].
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// Number of cells in the ring. Fixed for the lifetime of the region.
    pub(crate) n: usize,
    /// Collect `Metrics` (slight overhead on every enqueue/dequeue).
    pub enable_metrics: bool,
    /// Mirror the producer's local `tail` into the region on every enqueue.
    /// Off by default: the source's "dead tail broadcast" is advisory only
    /// and must not appear on the fast path unless explicitly requested.
    pub publish_tail_mirror: bool,
    /// Advisory cap on consecutive unpublished-rank waits before `dequeue`
    /// gives up with `FfqError::RetryExhausted`. `None` means never give up,
    /// which is the only behavior a fully correct execution should ever
    /// need.
    pub retry_cap: Option<u32>,
    /// Initial backoff sleep duration.
    pub backoff_base: Duration,
    /// Maximum backoff sleep duration.
    pub backoff_max: Duration,
}

impl Config {
    /// Creates a configuration for a queue of `n` cells.
    ///
    /// # Errors
    ///
    /// Returns `FfqError::ConfigInvalid` if `n < 2`.
    pub fn new(n: usize) -> Result<Self, FfqError> {
        if n < 2 {
            return Err(FfqError::ConfigInvalid {
                reason: "N must be >= 2",
            });
        }
        Ok(Self {
            n,
            enable_metrics: false,
            publish_tail_mirror: false,
            retry_cap: None,
            backoff_base: Duration::from_micros(100),
            backoff_max: Duration::from_millis(10),
        })
    }

    /// Returns the ring's cell count.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.n
    }

    /// Enables or disables metrics collection.
    #[must_use]
    pub fn with_metrics(mut self, enable: bool) -> Self {
        self.enable_metrics = enable;
        self
    }

    /// Enables or disables the advisory `tail` mirror write.
    #[must_use]
    pub fn with_tail_mirror(mut self, publish: bool) -> Self {
        self.publish_tail_mirror = publish;
        self
    }

    /// Sets the advisory dequeue retry cap.
    #[must_use]
    pub fn with_retry_cap(mut self, cap: u32) -> Self {
        self.retry_cap = Some(cap);
        self
    }

    /// Overrides the backoff bounds.
    ///
    /// # Panics
    ///
    /// Panics if `max < base`.
    #[must_use]
    pub fn with_backoff(mut self, base: Duration, max: Duration) -> Self {
        assert!(max >= base, "backoff max must be >= base");
        self.backoff_base = base;
        self.backoff_max = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_n_below_two() {
        assert!(matches!(
            Config::new(0),
            Err(FfqError::ConfigInvalid { .. })
        ));
        assert!(matches!(
            Config::new(1),
            Err(FfqError::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn accepts_smallest_legal_queue() {
        let config = Config::new(2).unwrap();
        assert_eq!(config.capacity(), 2);
    }

    #[test]
    fn builder_methods_chain() {
        let config = Config::new(4)
            .unwrap()
            .with_metrics(true)
            .with_tail_mirror(true)
            .with_retry_cap(1_000);
        assert!(config.enable_metrics);
        assert!(config.publish_tail_mirror);
        assert_eq!(config.retry_cap, Some(1_000));
    }
}
