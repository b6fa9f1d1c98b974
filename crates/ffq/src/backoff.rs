use std::thread;
use std::time::Duration;

/// Adaptive backoff for a consumer waiting on an unpublished rank.
///
/// Unlike a same-core SPSC cursor wait, the rank a consumer is waiting on
/// may be published by a process on a different node over RMA, so spinning
/// with `hint::spin_loop()` alone is the wrong tool: the wait starts at a
/// short sleep and doubles on every unsuccessful poll up to a ceiling,
/// resetting the moment the caller observes any progress (a gap skip or a
/// successful claim).
#[derive(Debug)]
pub struct Backoff {
    current: Duration,
    base: Duration,
    max: Duration,
    attempts: u32,
    retry_cap: Option<u32>,
}

impl Backoff {
    /// Creates a new backoff with the given bounds and advisory retry cap.
    #[must_use]
    pub fn new(base: Duration, max: Duration, retry_cap: Option<u32>) -> Self {
        Self {
            current: base,
            base,
            max,
            attempts: 0,
            retry_cap,
        }
    }

    /// Sleeps for the current backoff duration and doubles it (bounded by
    /// `max`) for next time. Returns `false` if the advisory retry cap has
    /// been exceeded — the caller should treat this as `RetryExhausted`,
    /// not as a queue-invariant violation.
    pub fn wait(&mut self) -> bool {
        if let Some(cap) = self.retry_cap {
            if self.attempts >= cap {
                return false;
            }
        }
        self.attempts += 1;
        thread::sleep(self.current);
        self.current = (self.current * 2).min(self.max);
        true
    }

    /// Resets the backoff to its initial, tightest interval. Called whenever
    /// the waiting consumer observes progress (e.g. skips a gap).
    pub fn reset(&mut self) {
        self.current = self.base;
        self.attempts = 0;
    }

    /// Number of consecutive unsuccessful waits since the last reset.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doubles_up_to_max() {
        let mut backoff = Backoff::new(
            Duration::from_micros(1),
            Duration::from_micros(8),
            None,
        );
        assert_eq!(backoff.current, Duration::from_micros(1));
        backoff.wait();
        assert_eq!(backoff.current, Duration::from_micros(2));
        backoff.wait();
        assert_eq!(backoff.current, Duration::from_micros(4));
        backoff.wait();
        assert_eq!(backoff.current, Duration::from_micros(8));
        backoff.wait();
        assert_eq!(backoff.current, Duration::from_micros(8));
    }

    #[test]
    fn reset_restores_base_interval() {
        let mut backoff = Backoff::new(Duration::from_micros(1), Duration::from_micros(8), None);
        backoff.wait();
        backoff.wait();
        backoff.reset();
        assert_eq!(backoff.current, Duration::from_micros(1));
        assert_eq!(backoff.attempts(), 0);
    }

    #[test]
    fn retry_cap_eventually_fires() {
        let mut backoff = Backoff::new(Duration::from_micros(1), Duration::from_micros(2), Some(3));
        assert!(backoff.wait());
        assert!(backoff.wait());
        assert!(backoff.wait());
        assert!(!backoff.wait());
    }

    #[test]
    fn no_cap_never_exhausts() {
        let mut backoff = Backoff::new(Duration::from_micros(1), Duration::from_micros(2), None);
        for _ in 0..50 {
            assert!(backoff.wait());
        }
    }
}
