//! Cursor placement policies.
//!
//! The queue's two cursors are written by different threads: `head` by the
//! consumer, `tail` by the producer. If both live on one cache line, every
//! publish by one side invalidates the line the other side is polling,
//! generating coherence traffic for logically independent variables (false
//! sharing). [`Padded`] gives each cursor its own cache line via
//! [`CachePadded`]; [`Compact`] packs them tightly and accepts the traffic.
//!
//! The choice is made at construction time and has no behavioral effect,
//! only a footprint/throughput trade-off. [`Padded`] is the default.
//!
//! # Example
//!
//! ```
//! use axon_queue::layout::Compact;
//! use axon_queue::spsc;
//!
//! // A queue for a memory-constrained context: cursors packed tightly.
//! let (mut tx, mut rx) = spsc::ring_buffer_with::<u8, Compact>(16);
//! tx.push(1).unwrap();
//! assert_eq!(rx.pop(), Some(1));
//! ```

#[cfg(not(loom))]
use std::sync::atomic::AtomicUsize;

#[cfg(loom)]
use loom::sync::atomic::AtomicUsize;

use crossbeam_utils::CachePadded;

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::Padded {}
    impl Sealed for super::Compact {}
}

/// Selects how the queue's cursors are laid out in memory.
///
/// Implemented by [`Padded`] and [`Compact`]; this trait is sealed.
pub trait Layout: sealed::Sealed {
    /// The cell holding one cursor.
    type Cursor: Cursor;
}

/// One atomic cursor cell. Implementation detail of [`Layout`].
pub trait Cursor: Send + Sync {
    /// Creates a cell holding `value`.
    fn new(value: usize) -> Self;

    /// The underlying atomic.
    fn atomic(&self) -> &AtomicUsize;
}

/// Each cursor on its own cache line. The default layout.
pub enum Padded {}

/// Cursors packed adjacently; smallest footprint.
pub enum Compact {}

impl Layout for Padded {
    type Cursor = CachePadded<AtomicUsize>;
}

impl Layout for Compact {
    type Cursor = AtomicUsize;
}

impl Cursor for CachePadded<AtomicUsize> {
    fn new(value: usize) -> Self {
        CachePadded::new(AtomicUsize::new(value))
    }

    #[inline(always)]
    fn atomic(&self) -> &AtomicUsize {
        self
    }
}

impl Cursor for AtomicUsize {
    fn new(value: usize) -> Self {
        AtomicUsize::new(value)
    }

    #[inline(always)]
    fn atomic(&self) -> &AtomicUsize {
        self
    }
}
