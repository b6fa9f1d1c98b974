//! Debug assertion macros for the cell state machine's invariants. Active
//! only in debug builds (`#[cfg(debug_assertions)]`), so there is zero
//! overhead in release builds.
//!
//! Used by [`crate::region::Region`].

// =============================================================================
// INV-SEQ-01: Monotonic head
// =============================================================================

/// Assert that `head` only increases across a fetch-add.
///
/// **Invariant**: `new_head >= old_head`.
macro_rules! debug_assert_head_monotonic {
    ($old:expr, $new:expr) => {
        debug_assert!(
            $new >= $old,
            "INV-SEQ-01 violated: head decreased from {} to {}",
            $old,
            $new
        )
    };
}

// =============================================================================
// INV-GAP-01: Monotonic gap
// =============================================================================

/// Assert that a cell's `gap` watermark only increases.
///
/// **Invariant**: `new_gap >= old_gap`.
macro_rules! debug_assert_gap_monotonic {
    ($old:expr, $new:expr) => {
        debug_assert!(
            $new >= $old,
            "INV-GAP-01 violated: gap decreased from {} to {}",
            $old,
            $new
        )
    };
}

// =============================================================================
// INV-SLOT-01: Slot reuse precondition
// =============================================================================

/// Assert that a slot a consumer just released actually reads back `EMPTY`,
/// the precondition the producer relies on before reusing it.
///
/// **Invariant**: a cell is reused only after a consumer has written `EMPTY`
/// to its `rank`.
macro_rules! debug_assert_slot_reuse {
    ($rank:expr, $empty:expr) => {
        debug_assert!(
            $rank == $empty,
            "INV-SLOT-01 violated: slot release left rank {} instead of EMPTY",
            $rank
        )
    };
}

// =============================================================================
// INV-RANK-01: Published rank matches the claim
// =============================================================================

/// Assert that the rank a cell publishes is exactly the rank the producer
/// intended to publish, not some other value.
macro_rules! debug_assert_rank_matches {
    ($published:expr, $expected:expr) => {
        debug_assert!(
            $published == $expected,
            "INV-RANK-01 violated: published rank {} does not match claimed rank {}",
            $published,
            $expected
        )
    };
}

pub(crate) use debug_assert_gap_monotonic;
pub(crate) use debug_assert_head_monotonic;
pub(crate) use debug_assert_rank_matches;
pub(crate) use debug_assert_slot_reuse;
