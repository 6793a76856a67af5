//! The cursor coordinator.
//!
//! Owns the two monotonically increasing cursors and the acquire/release
//! protocol that publishes slot contents across threads. The protocol is
//! written exactly once here, generic over a [`Storage`] policy; the ring
//! buffer and the token queue are both this coordinator with a different
//! policy plugged in.
//!
//! # Ordering
//!
//! ```text
//! producer: write slot, then Release-store tail  →  consumer: Acquire-load tail, then read slot
//! consumer: read slot, then Release-store head   →  producer: Acquire-load head, then write slot
//! ```
//!
//! Each side reads its own cursor without ordering (program order already
//! covers its own prior writes) and the peer's cursor with Acquire, pairing
//! with the peer's Release publish. That pairing is the sole
//! synchronization mechanism: no locks, no fences, no CAS.
//!
//! # Cached cursors
//!
//! Each handle keeps the authoritative copy of its own cursor plus a cached
//! snapshot of the peer's. Cursors only grow, so a stale snapshot can only
//! understate the peer's progress: the fast path checks against the cache
//! with zero atomic loads, and only an apparent-full/apparent-empty result
//! pays the Acquire refresh on the `#[cold]` path.

use std::fmt;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use crate::layout::{Cursor, Layout, Padded};
use crate::Full;

/// A slot policy for the SPSC queue.
///
/// The coordinator owns the cursors and the ordering protocol; a `Storage`
/// decides what, if anything, physically lives in a slot. Implementations
/// receive the raw `head`/`tail` cursor values and must derive occupancy
/// from them alone: slots in `[head, tail)` hold live elements, all others
/// are vacant.
///
/// # Safety
///
/// Implementations may mutate per-slot state through `&self`; they must be
/// sound whenever the per-method protocol contracts below are upheld. The
/// coordinator's handles are the only callers.
pub unsafe trait Storage {
    /// The element type transferred through the queue.
    type Item;

    /// Stores `item` in the slot addressed by `tail`, unless the queue is
    /// full. Hands `item` back when `tail - head` has reached capacity.
    ///
    /// # Safety
    ///
    /// `tail` must be the producer's current cursor, `head` a value the
    /// consumer's cursor held at some point. Never called concurrently
    /// with itself or with `discard`.
    unsafe fn produce(&self, head: usize, tail: usize, item: Self::Item)
        -> Result<(), Self::Item>;

    /// Moves the element out of the slot addressed by `head`. Returns
    /// `None` when `head == tail`.
    ///
    /// # Safety
    ///
    /// `head` must be the consumer's current cursor, `tail` a value the
    /// producer's cursor held at some point. Never called concurrently
    /// with itself or with `discard`.
    unsafe fn consume(&self, head: usize, tail: usize) -> Option<Self::Item>;

    /// Drops the element in the slot addressed by `head` without moving it
    /// out. Returns `false` when `head == tail`.
    ///
    /// # Safety
    ///
    /// Teardown only: the caller must be the sole owner, with no live
    /// producer or consumer.
    unsafe fn discard(&self, head: usize, tail: usize) -> bool;
}

/// Rounds a requested capacity up to the next power of two, minimum 1.
///
/// Power-of-two capacities let slot addressing wrap with a bitmask
/// (`index & (capacity - 1)`) instead of a division.
pub(crate) fn round_capacity(n: usize) -> usize {
    n.max(1).next_power_of_two()
}

/// Shared state: the two cursors plus the storage policy.
///
/// The queue holds elements in the cursor range `[head, tail)`. Both
/// cursors increase monotonically and wrap through `usize` intentionally;
/// all comparisons use wrapping arithmetic.
struct Core<S: Storage, L: Layout> {
    /// Next slot to consume. Written only by the consumer.
    head: L::Cursor,
    /// Next slot to produce. Written only by the producer.
    tail: L::Cursor,
    storage: S,
}

impl<S: Storage, L: Layout> Drop for Core<S, L> {
    fn drop(&mut self) {
        // Both handles are gone, so these loads race with nothing.
        let mut head = self.head.atomic().load(Ordering::Relaxed);
        let tail = self.tail.atomic().load(Ordering::Relaxed);

        // Discard every produced-but-unconsumed element so its resources
        // are released exactly once; the storage's own drop then frees
        // only memory.
        while head != tail {
            // Safety: sole owner during teardown.
            unsafe { self.storage.discard(head, tail) };
            head = head.wrapping_add(1);
        }
    }
}

pub(super) fn pair<S: Storage, L: Layout>(storage: S) -> (Producer<S, L>, Consumer<S, L>) {
    let core = Arc::new(Core {
        head: L::Cursor::new(0),
        tail: L::Cursor::new(0),
        storage,
    });

    (
        Producer {
            core: Arc::clone(&core),
            tail: 0,
            cached_head: 0,
        },
        Consumer {
            core,
            head: 0,
            cached_tail: 0,
        },
    )
}

/// The producing half of an SPSC queue.
///
/// `Send` but operated through `&mut self`, so exactly one thread at a time
/// can produce - the single-producer role is enforced by the type system,
/// not by caller discipline.
pub struct Producer<S: Storage, L: Layout = Padded> {
    core: Arc<Core<S, L>>,
    /// Our publish cursor (authoritative copy).
    tail: usize,
    /// Conservative snapshot of the consumer's cursor.
    /// Only refreshed when the queue appears full.
    cached_head: usize,
}

impl<S: Storage, L: Layout> Producer<S, L> {
    /// Attempts to enqueue `item`.
    ///
    /// Never blocks. A full queue is backpressure, not an error condition:
    /// the caller chooses its own retry, drop, or backoff policy.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(item))` when the queue is at capacity, handing the
    /// item back untouched.
    #[inline]
    #[must_use = "push returns the rejected item when the queue is full, which should be handled"]
    pub fn push(&mut self, item: S::Item) -> Result<(), Full<S::Item>> {
        let tail = self.tail;

        // Fast path: the cached head can only understate the free space.
        // Safety: sole producer; `tail` is our cursor, `cached_head` was
        // read from the consumer's.
        match unsafe { self.core.storage.produce(self.cached_head, tail, item) } {
            Ok(()) => {
                self.publish(tail);
                Ok(())
            }
            Err(item) => self.push_slow(tail, item),
        }
    }

    #[cold]
    fn push_slow(&mut self, tail: usize, item: S::Item) -> Result<(), Full<S::Item>> {
        // Refresh the snapshot; Acquire pairs with the consumer's Release
        // publish so every slot freed before it is visible to us.
        self.cached_head = self.core.head.atomic().load(Ordering::Acquire);

        // Safety: as in `push`.
        match unsafe { self.core.storage.produce(self.cached_head, tail, item) } {
            Ok(()) => {
                self.publish(tail);
                Ok(())
            }
            Err(item) => Err(Full(item)),
        }
    }

    /// Publishes the slot written at `tail`. The Release store makes the
    /// slot contents visible to any consumer that observes the new cursor.
    #[inline]
    fn publish(&mut self, tail: usize) {
        let next = tail.wrapping_add(1);
        self.core.tail.atomic().store(next, Ordering::Release);
        self.tail = next;
    }

    /// Returns the number of elements currently in the queue.
    ///
    /// The two cursors are loaded independently, so the result is a
    /// point-in-time estimate that a concurrent `pop` can immediately
    /// stale. Treat it as advisory.
    #[inline]
    pub fn len(&self) -> usize {
        len(&self.core)
    }

    /// Returns `true` if the queue is empty. Advisory, like [`len`](Self::len).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(super) fn storage(&self) -> &S {
        &self.core.storage
    }
}

impl<S: Storage, L: Layout> fmt::Debug for Producer<S, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

/// The consuming half of an SPSC queue.
///
/// `Send` but operated through `&mut self`, so exactly one thread at a time
/// can consume.
pub struct Consumer<S: Storage, L: Layout = Padded> {
    core: Arc<Core<S, L>>,
    /// Our consume cursor (authoritative copy).
    head: usize,
    /// Conservative snapshot of the producer's cursor.
    /// Only refreshed when the queue appears empty.
    cached_tail: usize,
}

impl<S: Storage, L: Layout> Consumer<S, L> {
    /// Attempts to dequeue the oldest element.
    ///
    /// Never blocks. Returns `None` when the queue is empty; starvation is
    /// a value, not an error.
    #[inline]
    pub fn pop(&mut self) -> Option<S::Item> {
        let head = self.head;

        // Fast path: the cached tail can only understate how much has been
        // published, so anything it shows is really there.
        // Safety: sole consumer; `head` is our cursor, `cached_tail` was
        // read from the producer's.
        if let Some(item) = unsafe { self.core.storage.consume(head, self.cached_tail) } {
            self.publish(head);
            return Some(item);
        }

        self.pop_slow(head)
    }

    #[cold]
    fn pop_slow(&mut self, head: usize) -> Option<S::Item> {
        // Acquire pairs with the producer's Release publish: once we see
        // the new tail, the slot contents written before it are visible.
        self.cached_tail = self.core.tail.atomic().load(Ordering::Acquire);

        // Safety: as in `pop`.
        let item = unsafe { self.core.storage.consume(head, self.cached_tail) }?;
        self.publish(head);
        Some(item)
    }

    /// Publishes the slot vacated at `head`, signaling the producer that it
    /// may be reused.
    #[inline]
    fn publish(&mut self, head: usize) {
        let next = head.wrapping_add(1);
        self.core.head.atomic().store(next, Ordering::Release);
        self.head = next;
    }

    /// Returns the number of elements currently in the queue.
    ///
    /// Advisory point-in-time estimate; see [`Producer::len`].
    #[inline]
    pub fn len(&self) -> usize {
        len(&self.core)
    }

    /// Returns `true` if the queue is empty. Advisory, like [`len`](Self::len).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(super) fn storage(&self) -> &S {
        &self.core.storage
    }
}

impl<S: Storage, L: Layout> fmt::Debug for Consumer<S, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

fn len<S: Storage, L: Layout>(core: &Core<S, L>) -> usize {
    let head = core.head.atomic().load(Ordering::Acquire);
    let tail = core.tail.atomic().load(Ordering::Acquire);
    tail.wrapping_sub(head)
}

#[cfg(all(test, not(loom)))]
mod tests {
    use super::round_capacity;

    #[test]
    fn capacity_rounding() {
        assert_eq!(round_capacity(0), 1);
        assert_eq!(round_capacity(1), 1);
        assert_eq!(round_capacity(2), 2);
        assert_eq!(round_capacity(3), 4);
        assert_eq!(round_capacity(100), 128);
        assert_eq!(round_capacity(1024), 1024);
    }
}
