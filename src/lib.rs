//! # axon-queue
//!
//! Lock-free single-producer single-consumer (SPSC) queues built around one
//! index-coordination protocol and pluggable slot storage.
//!
//! ## Features
//!
//! - **Ring buffer**: bounded queue of `T` with power-of-two capacity and
//!   bitmask index wrapping
//! - **Token queue**: payload-less variant for counting/signaling, bounded
//!   or unbounded
//! - **Layout control**: cursors cache-line padded ([`layout::Padded`],
//!   the default) or packed tightly ([`layout::Compact`])
//!
//! ## Design Goals
//!
//! - Acquire/release only - no compare-and-swap, no fences, no locks
//! - Non-blocking everywhere: full and empty are values, never waits
//! - No allocations after construction
//! - The cursor protocol is written once and shared by every storage policy
//!
//! ## Example
//!
//! ```
//! use axon_queue::spsc;
//!
//! // Create a queue with capacity for 1024 elements
//! // (will be rounded up to the next power of two)
//! let (mut tx, mut rx) = spsc::ring_buffer::<u64>(1024);
//!
//! tx.push(42).unwrap();
//! assert_eq!(rx.pop(), Some(42));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use std::fmt;

pub mod layout;
pub mod spsc;

pub use spsc::{ring_buffer, Consumer, Producer, Storage};

/// Error returned by [`Producer::push`] when the queue is full.
///
/// Carries the rejected element back to the caller. A full queue is
/// backpressure, not failure: the caller decides whether to retry, drop,
/// or hand the element elsewhere.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Full<T>(pub T);

impl<T> Full<T> {
    /// Returns the element that could not be enqueued.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Display for Full<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "queue is full")
    }
}

impl<T> fmt::Debug for Full<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Full").finish()
    }
}

impl<T> std::error::Error for Full<T> {}
