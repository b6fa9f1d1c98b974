use crate::backoff::Backoff;
use crate::config::Config;
use crate::error::FfqError;
use crate::group::LocalGroup;
use crate::metrics::MetricsSnapshot;
use crate::region::Region;
use std::sync::Arc;

/// A process's binding to one queue region.
///
/// `open` performs the construction-barrier rendezvous: rank 0 allocates the
/// `Region<P>` and publishes it, every rank (including rank 0) then crosses
/// the group's barrier, and only afterwards does a peer read the published
/// region. From a `FfqHandle`, call [`FfqHandle::producer`] at most once and
/// [`FfqHandle::consumer`] as many times as needed.
pub struct FfqHandle<P> {
    region: Arc<Region<P>>,
}

impl<P> FfqHandle<P> {
    /// Allocates (rank 0) or attaches to (every other rank) a region of `n`
    /// cells, then waits at the group's construction barrier.
    ///
    /// # Errors
    ///
    /// Returns `FfqError::ConfigInvalid` if `n < 2`, or
    /// `FfqError::RegionAllocFailed` if rank 0's published region cannot be
    /// observed by a peer after the barrier returns (a bug in the group
    /// implementation, not a runtime race — by the time a peer crosses the
    /// barrier, rank 0's publish has already happened-before it).
    pub fn open(n: usize, group: &LocalGroup<P>) -> Result<Self, FfqError> {
        let config = Config::new(n)?;
        Self::open_with_config(config, group)
    }

    /// Same as [`FfqHandle::open`], but with a fully customized [`Config`].
    pub fn open_with_config(config: Config, group: &LocalGroup<P>) -> Result<Self, FfqError> {
        if group.rank() == 0 {
            let region = Arc::new(Region::new(config));
            group.publish(Arc::clone(&region));
        }

        group.barrier();

        let region = group.attach().ok_or(FfqError::RegionAllocFailed)?;
        Ok(Self { region })
    }

    /// Claims the single producer role for this region.
    ///
    /// # Errors
    ///
    /// Returns `FfqError::ProducerAlreadyTaken` if a `Producer` has already
    /// been created for this region.
    pub fn producer(&self) -> Result<Producer<P>, FfqError> {
        self.region.take_producer_slot()?;
        Ok(Producer {
            region: Arc::clone(&self.region),
            local_tail: 0,
        })
    }

    /// Creates a new consumer handle. Any number of consumers may be
    /// created; each tracks its own backoff state independently.
    #[must_use]
    pub fn consumer(&self, id: usize) -> Consumer<P> {
        let config = self.region.config();
        Consumer {
            region: Arc::clone(&self.region),
            id,
            backoff: Backoff::new(config.backoff_base, config.backoff_max, config.retry_cap),
        }
    }

    /// Advisory count of successful dequeues observed so far. Not
    /// synchronized with any particular enqueue/dequeue pair — purely a
    /// coarse progress indicator.
    #[must_use]
    pub fn peek_dequeued_count(&self) -> u64 {
        self.region.dequeued_count()
    }

    /// Advisory mirror of the producer's local tail, if `Config::publish_tail_mirror`
    /// was enabled.
    #[must_use]
    pub fn peek_tail_mirror(&self) -> u64 {
        self.region.tail_mirror()
    }

    /// Snapshot of the region's metrics counters.
    #[must_use]
    pub fn metrics(&self) -> MetricsSnapshot {
        self.region.metrics_snapshot()
    }

    /// The region's fixed cell count.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.region.capacity()
    }

    /// Releases this handle's reference to the region. Other handles sharing
    /// the same region are unaffected; the region itself is freed once every
    /// handle, producer, and consumer referencing it has been dropped.
    pub fn close(self) {
        drop(self);
    }
}

impl<P> Clone for FfqHandle<P> {
    fn clone(&self) -> Self {
        Self {
            region: Arc::clone(&self.region),
        }
    }
}

// Safety: FfqHandle is Send + Sync as long as P is Send.
unsafe impl<P: Send> Send for FfqHandle<P> {}
unsafe impl<P: Send> Sync for FfqHandle<P> {}

/// The sole producer handle for a region.
///
/// Does not implement `Clone`: a second live `Producer` for the same region
/// would violate the single-producer precondition that lets `enqueue` run
/// wait-free without any producer-side synchronization.
pub struct Producer<P> {
    region: Arc<Region<P>>,
    local_tail: u64,
}

impl<P> Producer<P> {
    /// Publishes `item` at the producer's next rank. Never blocks; if every
    /// cell is currently occupied and no consumer advances, this call
    /// forces at least one gap write and loops indefinitely (see
    /// [`Region::enqueue`]).
    #[inline]
    pub fn enqueue(&mut self, item: P) {
        self.region.enqueue(&mut self.local_tail, item);
    }

    /// The producer's local tail, i.e. the next rank it will attempt.
    #[must_use]
    pub fn local_tail(&self) -> u64 {
        self.local_tail
    }
}

// Safety: Producer is Send + Sync as long as P is Send.
unsafe impl<P: Send> Send for Producer<P> {}
unsafe impl<P: Send> Sync for Producer<P> {}

/// One consumer's handle onto the region. `Clone`-able: cloning
/// gives the clone its own independent `Backoff`, tracking only the
/// well-defined per-call state a consumer needs.
pub struct Consumer<P> {
    region: Arc<Region<P>>,
    id: usize,
    backoff: Backoff,
}

impl<P> Consumer<P> {
    /// This consumer's id, as passed to [`FfqHandle::consumer`].
    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }

    /// Claims and returns the next available payload, skipping gaps and
    /// backing off while waiting for an in-flight rank to publish.
    ///
    /// # Errors
    ///
    /// Returns `FfqError::RetryExhausted` if this consumer's advisory retry
    /// cap fires. Safe to call again afterward.
    #[inline]
    pub fn dequeue(&mut self) -> Result<P, FfqError> {
        let item = self.region.dequeue(&mut self.backoff)?;
        self.backoff.reset();
        Ok(item)
    }
}

impl<P> Clone for Consumer<P> {
    fn clone(&self) -> Self {
        let config = self.region.config();
        Self {
            region: Arc::clone(&self.region),
            id: self.id,
            backoff: Backoff::new(config.backoff_base, config.backoff_max, config.retry_cap),
        }
    }
}

// Safety: Consumer is Send + Sync as long as P is Send.
unsafe impl<P: Send> Send for Consumer<P> {}
unsafe impl<P: Send> Sync for Consumer<P> {}
