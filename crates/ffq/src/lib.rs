//! FFQ - a bounded, wait-free-producer Fast-Forward Queue
//!
//! A single-producer/multiple-consumer FIFO ring where every cell carries
//! its own `{rank, gap}` sequence stamps instead of a shared cursor pair.
//! The producer never blocks: if it finds a slot still occupied, it writes a
//! monotonic gap watermark and moves on rather than waiting for a consumer.
//! Consumers claim ranks with a single atomic fetch-add on a shared `head`,
//! then poll their claimed cell, skipping over any rank the producer marked
//! as gapped and backing off adaptively while waiting for an in-flight
//! publish.
//!
//! # Key Properties
//!
//! - Wait-free producer: `enqueue` never blocks on consumer progress.
//! - No duplicate delivery: `head`'s atomic fetch-add hands each rank to
//!   exactly one consumer.
//! - Advisory instrumentation only: metrics, the tail mirror, and the
//!   dequeue retry cap can all be disabled without changing correctness.
//!
//! # Example
//!
//! ```
//! use ffq::{FfqHandle, LocalGroup};
//!
//! let group = LocalGroup::<u64>::solo();
//! let handle = FfqHandle::open(8, &group).unwrap();
//! let mut producer = handle.producer().unwrap();
//! let mut consumer = handle.consumer(0);
//!
//! producer.enqueue(42);
//! assert_eq!(consumer.dequeue().unwrap(), 42);
//! ```

mod backoff;
mod cell;
mod config;
mod error;
mod group;
mod handle;
mod invariants;
mod metrics;
mod region;

pub use backoff::Backoff;
pub use config::Config;
pub use error::FfqError;
pub use group::LocalGroup;
pub use handle::{Consumer, FfqHandle, Producer};
pub use metrics::{Metrics, MetricsSnapshot};
