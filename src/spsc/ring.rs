//! Ring-buffer storage: a power-of-two arena of uninitialized slots.
//!
//! One contiguous allocation of `capacity` slots, made once at
//! construction. No element is constructed until produced; slot addressing
//! wraps with `index & mask`. The arena is freed by [`RingStorage`]'s drop
//! without re-scanning for live elements - draining them first is the
//! coordinator's teardown job.

use std::mem::ManuallyDrop;
use std::ptr;

use super::core::{pair, round_capacity, Consumer, Producer, Storage};
use crate::layout::{Layout, Padded};

/// Creates a bounded SPSC queue with the given capacity.
///
/// The capacity is rounded up to the next power of two (minimum 1) and the
/// cursors are cache-line padded; use [`ring_buffer_with`] to pack them
/// instead.
///
/// # Example
///
/// ```
/// use axon_queue::spsc;
///
/// let (tx, _rx) = spsc::ring_buffer::<String>(100);
/// // Actual capacity is 128 (next power of two)
/// assert_eq!(tx.capacity(), 128);
/// ```
pub fn ring_buffer<T>(capacity: usize) -> (Producer<RingStorage<T>>, Consumer<RingStorage<T>>) {
    ring_buffer_with::<T, Padded>(capacity)
}

/// [`ring_buffer`] with an explicit cursor [`Layout`].
///
/// # Example
///
/// ```
/// use axon_queue::layout::Compact;
/// use axon_queue::spsc;
///
/// let (mut tx, mut rx) = spsc::ring_buffer_with::<u64, Compact>(8);
/// tx.push(7).unwrap();
/// assert_eq!(rx.pop(), Some(7));
/// ```
pub fn ring_buffer_with<T, L: Layout>(
    capacity: usize,
) -> (Producer<RingStorage<T>, L>, Consumer<RingStorage<T>, L>) {
    pair(RingStorage::with_capacity(capacity))
}

impl<T, L: Layout> Producer<RingStorage<T>, L> {
    /// Returns the queue capacity (always a power of two).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage().capacity()
    }
}

impl<T, L: Layout> Consumer<RingStorage<T>, L> {
    /// Returns the queue capacity (always a power of two).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage().capacity()
    }
}

/// The backing arena for a payload-carrying SPSC queue.
///
/// Holds `capacity` (always a power of two) uninitialized slots of `T`.
/// A slot is live between a successful produce and the matching
/// consume/discard; occupancy is tracked entirely by the coordinator's
/// cursors, never by per-slot state.
pub struct RingStorage<T> {
    buffer: *mut T,
    mask: usize,
}

// Safety: the SPSC protocol partitions the arena - the producer only
// writes vacant slots at/after `tail`, the consumer only reads live slots
// at `head` - so shared access never touches the same slot. Elements move
// between threads, hence `T: Send`.
unsafe impl<T: Send> Send for RingStorage<T> {}
unsafe impl<T: Send> Sync for RingStorage<T> {}

impl<T> RingStorage<T> {
    fn with_capacity(capacity: usize) -> Self {
        let capacity = round_capacity(capacity);

        // Vec guarantees alignment; we keep only the raw allocation.
        let buffer = ManuallyDrop::new(Vec::<T>::with_capacity(capacity)).as_mut_ptr();

        Self {
            buffer,
            mask: capacity - 1,
        }
    }

    pub(super) fn capacity(&self) -> usize {
        self.mask + 1
    }

    /// Pointer to the slot for `index` (automatically masked).
    #[inline(always)]
    fn slot(&self, index: usize) -> *mut T {
        unsafe { self.buffer.add(index & self.mask) }
    }
}

unsafe impl<T> Storage for RingStorage<T> {
    type Item = T;

    #[inline]
    unsafe fn produce(&self, head: usize, tail: usize, item: T) -> Result<(), T> {
        if tail.wrapping_sub(head) > self.mask {
            return Err(item);
        }

        // Safety: `tail - head <= mask` puts slot `tail & mask` outside the
        // live range `[head, tail)`, so the consumer never touches it and
        // it holds no prior element.
        unsafe { self.slot(tail).write(item) };
        Ok(())
    }

    #[inline]
    unsafe fn consume(&self, head: usize, tail: usize) -> Option<T> {
        if head == tail {
            return None;
        }

        // Safety: `head != tail` means slot `head & mask` was produced and
        // published before `tail` was advanced past it. Reading the value
        // out transfers ownership and leaves the slot vacant.
        Some(unsafe { self.slot(head).read() })
    }

    unsafe fn discard(&self, head: usize, tail: usize) -> bool {
        if head == tail {
            return false;
        }

        // Safety: teardown only; the slot holds a live element that was
        // never consumed.
        unsafe { ptr::drop_in_place(self.slot(head)) };
        true
    }
}

impl<T> Drop for RingStorage<T> {
    fn drop(&mut self) {
        // Live elements were already discarded by the coordinator; only
        // the raw allocation remains.
        // Safety: `buffer` came from a Vec of this capacity with length 0
        // worth of initialized elements.
        unsafe {
            let _ = Vec::from_raw_parts(self.buffer, 0, self.mask + 1);
        }
    }
}
