use crate::region::Region;
use std::sync::{Arc, Barrier, OnceLock};

/// A construction-time rendezvous between the ranks that will share one
/// queue region.
///
/// A peer "attaches" to a region the owning rank allocated, but there's no
/// way for it to obtain a reference to something it didn't construct
/// without some rendezvous. In this crate's in-process execution model,
/// `LocalGroup<P>` provides that: rank 0 allocates the region and
/// publishes it into a shared slot, every rank (rank 0 included) then
/// crosses a `Barrier`, and only after the barrier returns does a peer read
/// the slot. This reproduces "construction barrier synchronizes
/// construction across all participants, and only then does the producer
/// begin enqueuing" with ordinary thread rendezvous standing in for a real
/// RMA window.
pub struct LocalGroup<P> {
    rank: usize,
    size: usize,
    barrier: Arc<Barrier>,
    region_slot: Arc<OnceLock<Arc<Region<P>>>>,
}

impl<P> LocalGroup<P> {
    /// Builds `size` group handles, one per simulated process/rank, sharing
    /// one barrier and one rendezvous slot.
    #[must_use]
    pub fn fleet(size: usize) -> Vec<Self> {
        assert!(size >= 1, "a group needs at least one rank");
        let barrier = Arc::new(Barrier::new(size));
        let region_slot = Arc::new(OnceLock::new());
        (0..size)
            .map(|rank| Self {
                rank,
                size,
                barrier: Arc::clone(&barrier),
                region_slot: Arc::clone(&region_slot),
            })
            .collect()
    }

    /// A single-rank group for the fully degenerate, single-thread case.
    #[must_use]
    pub fn solo() -> Self {
        Self::fleet(1).remove(0)
    }

    /// This rank's index within the group. Rank 0 is the owning/constructing
    /// rank.
    #[must_use]
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Number of ranks participating in the group.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    pub(crate) fn publish(&self, region: Arc<Region<P>>) {
        // `set` can only fail if rank 0 is called twice; that is a caller
        // bug, not a condition this crate needs to report specially.
        let _ = self.region_slot.set(region);
    }

    pub(crate) fn attach(&self) -> Option<Arc<Region<P>>> {
        self.region_slot.get().cloned()
    }

    /// Blocks until every rank in the group has called this. `std::sync::Barrier`
    /// has no timeout or failure path, so unlike `publish`/`attach` this can't
    /// surface an error: a rank that never calls it blocks its peers forever,
    /// which is a caller bug (a rank dropped before opening its handle), not a
    /// runtime condition this crate detects.
    pub(crate) fn barrier(&self) {
        self.barrier.wait();
    }
}

impl<P> Clone for LocalGroup<P> {
    fn clone(&self) -> Self {
        Self {
            rank: self.rank,
            size: self.size,
            barrier: Arc::clone(&self.barrier),
            region_slot: Arc::clone(&self.region_slot),
        }
    }
}
