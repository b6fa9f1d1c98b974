//! Error types for the queue's control path (`open`/`producer`/`dequeue`).
//!
//! The hot paths (`Region::enqueue`, `Region::dequeue`'s success case) never
//! return an error: enqueue has no bounded retry limit by design, and a
//! successful dequeue simply returns the payload.

use thiserror::Error;

/// Errors surfaced by the queue's control path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FfqError {
    /// `N` was less than 2, or otherwise outside the configured bounds.
    #[error("invalid queue configuration: {reason}")]
    ConfigInvalid {
        /// Human-readable reason, e.g. "N must be >= 2".
        reason: &'static str,
    },

    /// The region's backing allocation failed.
    #[error("failed to allocate queue region")]
    RegionAllocFailed,

    /// `FfqHandle::producer` was called more than once against the same
    /// region. The core does not require this check (single-producer use is
    /// a documented precondition), but it is cheap to catch.
    #[error("a producer has already been registered for this queue")]
    ProducerAlreadyTaken,

    /// A consumer's advisory retry cap fired while waiting for a rank to be
    /// published. No queue invariant was violated; the caller may retry.
    #[error("dequeue retry cap exceeded while waiting for rank to publish")]
    RetryExhausted,
}

impl FfqError {
    /// Returns `true` if the caller may reasonably retry the operation that
    /// produced this error.
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::RetryExhausted)
    }

    /// Returns `true` if this error means the handle is permanently unusable.
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::ConfigInvalid { .. } | Self::RegionAllocFailed)
    }
}
