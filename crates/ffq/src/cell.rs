use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::AtomicI64;

/// Sentinel for both `rank` and `gap`: an unused/available slot, or a cell
/// that has never been skipped.
pub(crate) const EMPTY: i64 = -1;

/// One slot of the ring: `{rank, gap, payload}`.
///
/// - `rank` is written by the producer (to a non-negative value, publishing
///   a payload) and by a consumer (back to `EMPTY`, releasing the slot).
/// - `gap` is written only by the producer, monotonically.
/// - `payload` is written only by the producer (between observing `EMPTY`
///   and publishing `rank`) and read only by the consumer that claims the
///   matching rank.
#[repr(C)]
pub(crate) struct Cell<P> {
    pub(crate) rank: AtomicI64,
    pub(crate) gap: AtomicI64,
    payload: UnsafeCell<MaybeUninit<P>>,
}

impl<P> Cell<P> {
    pub(crate) fn new() -> Self {
        Self {
            rank: AtomicI64::new(EMPTY),
            gap: AtomicI64::new(EMPTY),
            payload: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }

    /// Writes the payload. Safety: only call this when `rank == EMPTY` (the
    /// producer is the sole writer of an available slot) and no consumer can
    /// be concurrently reading it, which the caller establishes by checking
    /// `rank` before calling.
    #[inline]
    pub(crate) unsafe fn write_payload(&self, item: P) {
        (*self.payload.get()).write(item);
    }

    /// Reads the payload out by value. Safety: only call this after
    /// observing `rank == r` via an `Acquire` load, which synchronizes-with
    /// the producer's `Release` publish and makes the payload write visible.
    #[inline]
    pub(crate) unsafe fn read_payload(&self) -> P {
        (*self.payload.get()).assume_init_read()
    }
}

// Safety: Cell is Send + Sync as long as P is Send. The rank/gap atomics
// plus the single-writer discipline on `payload` (documented on each method
// above) provide the synchronization that makes sharing across threads
// sound.
unsafe impl<P: Send> Send for Cell<P> {}
unsafe impl<P: Send> Sync for Cell<P> {}
