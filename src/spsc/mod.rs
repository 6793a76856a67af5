//! Single-producer single-consumer (SPSC) bounded queue.
//!
//! One thread pushes, a different thread pops, with no locks and no
//! compare-and-swap: the only synchronization is an acquire/release pair
//! per operation. All operations return immediately - a full queue and an
//! empty queue are ordinary results, and the caller owns any retry,
//! backoff, or drop policy.
//!
//! The cursor protocol is defined once, generic over a [`Storage`] policy,
//! and every queue flavor is that one protocol with a different policy
//! plugged in:
//!
//! - [`ring_buffer`] - a power-of-two ring of `T` slots
//! - [`token`] - a payload-less counting queue for signaling
//!
//! # Example
//!
//! ```
//! use axon_queue::spsc;
//!
//! let (mut tx, mut rx) = spsc::ring_buffer::<u64>(1024);
//!
//! tx.push(1).unwrap();
//! tx.push(2).unwrap();
//!
//! assert_eq!(rx.pop(), Some(1));
//! assert_eq!(rx.pop(), Some(2));
//! assert_eq!(rx.pop(), None);
//! ```
//!
//! # Ordering
//!
//! The producer writes a slot and then Release-stores the advanced `tail`;
//! a consumer that Acquire-loads that `tail` is guaranteed to see the slot
//! contents. Symmetrically, the consumer vacates a slot and Release-stores
//! the advanced `head`, and the producer's Acquire-load of `head` licenses
//! reuse of the slot. `len`/`is_empty` load both cursors independently and
//! are advisory snapshots only.

mod core;
pub mod ring;
pub mod token;

pub use self::core::{Consumer, Producer, Storage};
pub use self::ring::{ring_buffer, ring_buffer_with, RingStorage};

// ============================================================================
// Tests
// ============================================================================


// ============================================================================
// Loom Tests
// ============================================================================
