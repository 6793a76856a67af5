//! Token storage: a payload-less queue used as an SPSC event counter.
//!
//! A slot carries nothing; only the count between the cursors is
//! meaningful. One side grants units, the other takes them, with the same
//! cursor protocol - and the same ordering guarantees - as the ring
//! buffer. Useful for signaling "N units available" (completions, credits,
//! doorbells) without moving any data.
//!
//! No storage is allocated. The queue is unbounded by default (within
//! counter range, which a real workload cannot exhaust); [`bounded`] caps
//! the number of outstanding tokens to a rounded power of two.
//!
//! # Example
//!
//! ```
//! use axon_queue::spsc::token;
//!
//! let (mut tx, mut rx) = token::unbounded();
//!
//! assert!(tx.grant());
//! assert!(tx.grant());
//!
//! assert!(rx.take());
//! assert!(rx.take());
//! assert!(!rx.take()); // nothing pending
//! ```

use super::core::{pair, round_capacity, Consumer, Producer, Storage};
use crate::layout::{Layout, Padded};

/// Creates a token queue with no cap on outstanding tokens.
pub fn unbounded() -> (TokenProducer, TokenConsumer) {
    unbounded_with::<Padded>()
}

/// [`unbounded`] with an explicit cursor [`Layout`].
pub fn unbounded_with<L: Layout>() -> (TokenProducer<L>, TokenConsumer<L>) {
    pair(TokenStorage { limit: usize::MAX })
}

/// Creates a token queue holding at most `capacity` outstanding tokens.
///
/// The capacity is rounded up to the next power of two (minimum 1), like
/// the ring buffer's.
pub fn bounded(capacity: usize) -> (TokenProducer, TokenConsumer) {
    bounded_with::<Padded>(capacity)
}

/// [`bounded`] with an explicit cursor [`Layout`].
pub fn bounded_with<L: Layout>(capacity: usize) -> (TokenProducer<L>, TokenConsumer<L>) {
    pair(TokenStorage {
        limit: round_capacity(capacity),
    })
}

/// The granting half of a token queue.
pub type TokenProducer<L = Padded> = Producer<TokenStorage, L>;

/// The taking half of a token queue.
pub type TokenConsumer<L = Padded> = Consumer<TokenStorage, L>;

/// Storage policy with nothing to store.
///
/// The produce/consume/discard contract is identical to the ring buffer's,
/// derived from the cursors alone; no slot memory exists.
pub struct TokenStorage {
    /// Maximum outstanding tokens; `usize::MAX` for unbounded.
    limit: usize,
}

unsafe impl Storage for TokenStorage {
    type Item = ();

    #[inline]
    unsafe fn produce(&self, head: usize, tail: usize, item: ()) -> Result<(), ()> {
        if tail.wrapping_sub(head) < self.limit {
            Ok(())
        } else {
            Err(item)
        }
    }

    #[inline]
    unsafe fn consume(&self, head: usize, tail: usize) -> Option<()> {
        (head != tail).then_some(())
    }

    unsafe fn discard(&self, head: usize, tail: usize) -> bool {
        head != tail
    }
}

impl<L: Layout> Producer<TokenStorage, L> {
    /// Makes one unit available to the consumer.
    ///
    /// Returns `false` when the queue is at its token cap (bounded queues
    /// only); the caller decides whether to retry.
    #[inline]
    #[must_use = "grant reports false when the token cap is reached, which should be handled"]
    pub fn grant(&mut self) -> bool {
        self.push(()).is_ok()
    }
}

impl<L: Layout> Consumer<TokenStorage, L> {
    /// Claims one available unit.
    ///
    /// Returns `false` when no units are pending.
    #[inline]
    #[must_use = "take reports false when no tokens are pending, which should be handled"]
    pub fn take(&mut self) -> bool {
        self.pop().is_some()
    }
}
