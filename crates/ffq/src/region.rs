use crate::backoff::Backoff;
use crate::cell::{Cell, EMPTY};
use crate::config::Config;
use crate::error::FfqError;
use crate::invariants::{
    debug_assert_gap_monotonic, debug_assert_head_monotonic, debug_assert_rank_matches,
    debug_assert_slot_reuse,
};
use crate::metrics::{Metrics, MetricsSnapshot};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

// =============================================================================
// MEMORY ORDERING & SYNCHRONIZATION STRATEGY
// =============================================================================
//
// ## Head (consumer-shared claim counter)
//
// `head.fetch_add(1, SeqCst)` is the only write to `head`. SeqCst gives the
// fetch-add a total order across every consumer thread, which is what
// guarantees that no two `dequeue` calls ever claim the same rank.
//
// ## Per-cell rank (producer publish / consumer release)
//
// Producer: write payload, then `rank.store(r, Release)`. Any consumer whose
// `rank.load(Acquire)` observes `r` is guaranteed (by the Release/Acquire
// synchronizes-with relationship on this same atomic) to also observe the
// payload write that preceded it.
//
// Consumer: after copying the payload out, `rank.store(EMPTY, Release)`. The
// producer's next `rank.load(Acquire)` on that cell observes `EMPTY` only
// after the consumer has finished reading, so the producer never overwrites
// a payload a consumer is still copying.
//
// ## Per-cell gap (producer-only, monotonic)
//
// Only the producer ever writes `gap`. We still use Release on the store and
// Acquire on the load (rather than Relaxed, which would be sufficient for a
// single-writer field) so that a consumer spinning on a cell observes the
// update promptly without needing a separate fence.
//
// =============================================================================

/// The shared queue region: `{N, head, tail mirror, dequeued_count, cells}`.
/// Allocated once by the owning rank of a [`crate::LocalGroup`]; every
/// [`crate::handle::FfqHandle`] holds an `Arc` to the same region.
pub struct Region<P> {
    n: usize,
    cells: Box<[Cell<P>]>,
    head: AtomicU64,
    /// Advisory mirror of the producer's local tail. Only written when
    /// `Config::publish_tail_mirror` is set.
    tail_mirror: AtomicU64,
    /// Advisory, non-load-bearing count of successful dequeues.
    dequeued_count: AtomicU64,
    producer_taken: AtomicBool,
    config: Config,
    metrics: Metrics,
}

// Safety: Region is Send + Sync as long as P is Send. Synchronization is
// carried entirely by the atomics on `head`/`Cell::rank`/`Cell::gap`.
unsafe impl<P: Send> Send for Region<P> {}
unsafe impl<P: Send> Sync for Region<P> {}

impl<P> Region<P> {
    pub(crate) fn new(config: Config) -> Self {
        let n = config.capacity();
        let cells = (0..n).map(|_| Cell::new()).collect::<Vec<_>>().into_boxed_slice();
        Self {
            n,
            cells,
            head: AtomicU64::new(0),
            tail_mirror: AtomicU64::new(0),
            dequeued_count: AtomicU64::new(0),
            producer_taken: AtomicBool::new(false),
            config,
            metrics: Metrics::new(),
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.n
    }

    pub(crate) fn config(&self) -> Config {
        self.config
    }

    pub(crate) fn take_producer_slot(&self) -> Result<(), FfqError> {
        if self.producer_taken.swap(true, Ordering::AcqRel) {
            Err(FfqError::ProducerAlreadyTaken)
        } else {
            Ok(())
        }
    }

    /// Advisory: the producer-private tail, if mirrored.
    pub(crate) fn tail_mirror(&self) -> u64 {
        self.tail_mirror.load(Ordering::Relaxed)
    }

    /// Advisory: count of successful dequeues so far.
    pub(crate) fn dequeued_count(&self) -> u64 {
        self.dequeued_count.load(Ordering::Relaxed)
    }

    pub(crate) fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    // -------------------------------------------------------------------
    // ENQUEUE (single producer)
    // -------------------------------------------------------------------

    /// Publishes `item` at the producer's next rank, advancing `local_tail`
    /// as far as necessary.
    ///
    /// This is the producer's entire fast-forward loop: it never blocks and
    /// never returns without having either published the payload or — if
    /// every cell it visits is still occupied by an unreleased payload —
    /// written a `gap` and moved to the next rank. **If every cell in the
    /// ring is currently occupied and no consumer ever advances, this call
    /// never returns**: it forces at least one gap write and then blocks
    /// indefinitely. That is the documented trade-off of a producer that
    /// promises never to wait on consumer progress, not a bug to paper over
    /// with an artificial retry limit.
    pub(crate) fn enqueue(&self, local_tail: &mut u64, item: P) {
        loop {
            let r = *local_tail;
            let i = (r % self.n as u64) as usize;
            let cell = &self.cells[i];

            let cur_rank = cell.rank.load(Ordering::Acquire);
            if cur_rank == EMPTY {
                // SAFETY: rank == EMPTY means no consumer holds a live
                // reference into this slot's payload; we are the sole
                // producer and about to publish it ourselves.
                unsafe { cell.write_payload(item) };
                cell.rank.store(r as i64, Ordering::Release);
                // Re-read what's actually published, not the value we
                // already know we wrote: catches a second producer
                // clobbering this cell between our store and now.
                debug_assert_rank_matches!(cell.rank.load(Ordering::Acquire), r as i64);

                let new_tail = r.wrapping_add(1);
                debug_assert_head_monotonic!(r, new_tail);
                *local_tail = new_tail;

                if self.config.publish_tail_mirror {
                    self.tail_mirror.store(new_tail, Ordering::Relaxed);
                }
                if self.config.enable_metrics {
                    self.metrics.add_enqueued(1);
                }
                return;
            }

            // Slot still holds a value some consumer has not released.
            // Write a monotonic gap watermark and move to the next rank
            // without waiting.
            let new_gap = r as i64;
            let old_gap = cell.gap.load(Ordering::Acquire);
            if new_gap > old_gap {
                cell.gap.store(new_gap, Ordering::Release);
            }
            // Check the field's actual current value, not the local
            // `new_gap`/`old_gap` we already compared to decide whether to
            // store: this only passes if the store above (or a previous
            // one) really left `gap` non-decreasing.
            debug_assert_gap_monotonic!(old_gap, cell.gap.load(Ordering::Acquire));

            let new_tail = r.wrapping_add(1);
            debug_assert_head_monotonic!(r, new_tail);
            *local_tail = new_tail;
            if self.config.publish_tail_mirror {
                self.tail_mirror.store(new_tail, Ordering::Relaxed);
            }
            if self.config.enable_metrics {
                self.metrics.add_gap_written(1);
            }
        }
    }

    // -------------------------------------------------------------------
    // DEQUEUE (multiple consumers)
    // -------------------------------------------------------------------

    /// Claims and returns one payload, skipping over any gaps the producer
    /// wrote and backing off while waiting for a claimed rank to publish.
    ///
    /// # Errors
    ///
    /// Returns `FfqError::RetryExhausted` if the consumer's advisory retry
    /// cap fires while waiting for a rank to be published. This never fires
    /// for `Config { retry_cap: None, .. }` (the default), and firing it
    /// never violates a queue invariant — the caller may simply call
    /// `dequeue` again.
    pub(crate) fn dequeue(&self, backoff: &mut Backoff) -> Result<P, FfqError> {
        let mut r = self.claim_rank();

        loop {
            let i = (r % self.n as u64) as usize;
            let cell = &self.cells[i];

            let rank = cell.rank.load(Ordering::Acquire);
            if rank == r as i64 {
                // SAFETY: the Acquire load above observed the producer's
                // Release publish of this exact rank, so the payload write
                // that preceded it is visible here.
                let item = unsafe { cell.read_payload() };
                cell.rank.store(EMPTY, Ordering::Release);
                // A cell becomes reusable only once this release is
                // actually visible as EMPTY; check the value we just wrote
                // rather than the `rank == r as i64` condition that got us
                // here, which says nothing about the store below it.
                debug_assert_slot_reuse!(cell.rank.load(Ordering::Acquire), EMPTY);

                if self.config.enable_metrics {
                    self.metrics.add_dequeued(1);
                }
                self.dequeued_count.fetch_add(1, Ordering::Relaxed);
                return Ok(item);
            }

            let gap = cell.gap.load(Ordering::Acquire);
            if gap >= r as i64 && rank != r as i64 {
                // Producer skipped this rank; claim a new one and retry
                // immediately without sleeping — this is progress, not a
                // stall.
                if self.config.enable_metrics {
                    self.metrics.add_gap_skipped(1);
                }
                backoff.reset();
                r = self.claim_rank();
                continue;
            }

            // Neither published nor marked as a gap: the producer simply
            // has not reached this rank yet. Back off and re-check the
            // same rank.
            if self.config.enable_metrics {
                self.metrics.add_backoff_wait(1);
            }
            if !backoff.wait() {
                return Err(FfqError::RetryExhausted);
            }
        }
    }

    #[inline]
    fn claim_rank(&self) -> u64 {
        let old = self.head.fetch_add(1, Ordering::SeqCst);
        debug_assert_head_monotonic!(old, old.wrapping_add(1));
        old
    }
}
