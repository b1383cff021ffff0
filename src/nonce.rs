//! Nonce Allocator
//!
//! Hands out sequential nonces to many concurrent senders sharing one
//! account. Seeded once from the chain's pending nonce; every agent in a
//! live swarm draws from the same allocator so no two transactions collide.
//!
//! Created: 2026-10-19

use parking_lot::Mutex;
use tracing::debug;

/// Gap-free, collision-free nonce counter
#[derive(Debug)]
pub struct NonceAllocator {
    next: Mutex<u64>,
}

impl NonceAllocator {
    pub fn new(start: u64) -> Self {
        Self {
            next: Mutex::new(start),
        }
    }

    /// Return the next nonce and advance the counter.
    pub fn allocate(&self) -> u64 {
        let mut next = self.next.lock();
        let nonce = *next;
        *next += 1;
        nonce
    }

    /// Overwrite the counter. Blind write: a lower value rewinds.
    pub fn reset(&self, value: u64) {
        let mut next = self.next.lock();
        debug!("Nonce reset: {} -> {}", *next, value);
        *next = value;
    }

    /// Current counter without consuming it
    pub fn peek(&self) -> u64 {
        *self.next.lock()
    }

    /// Raise the counter to `value` if it is ahead of the local one.
    ///
    /// Returns the previous counter when it moved, `None` otherwise.
    pub fn advance_to(&self, value: u64) -> Option<u64> {
        let mut next = self.next.lock();
        if value > *next {
            let previous = *next;
            *next = value;
            Some(previous)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_allocate_sequential() {
        let allocator = NonceAllocator::new(5);

        assert_eq!(allocator.allocate(), 5);
        assert_eq!(allocator.allocate(), 6);
        assert_eq!(allocator.allocate(), 7);
        assert_eq!(allocator.peek(), 8);
    }

    #[test]
    fn test_allocate_concurrent() {
        let allocator = Arc::new(NonceAllocator::new(0));
        let threads = 100;

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let allocator = Arc::clone(&allocator);
                thread::spawn(move || allocator.allocate())
            })
            .collect();

        let seen: HashSet<u64> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let expected: HashSet<u64> = (0..threads).collect();
        assert_eq!(seen, expected);
        assert_eq!(allocator.peek(), threads);
    }

    #[tokio::test]
    async fn test_allocate_concurrent_tasks() {
        let allocator = Arc::new(NonceAllocator::new(1_000));

        let mut set = tokio::task::JoinSet::new();
        for _ in 0..50 {
            let allocator = Arc::clone(&allocator);
            set.spawn(async move {
                (0..20).map(|_| allocator.allocate()).collect::<Vec<_>>()
            });
        }

        let mut all = Vec::new();
        while let Some(result) = set.join_next().await {
            let batch = result.unwrap();
            // Within one caller the values are strictly increasing
            assert!(batch.windows(2).all(|w| w[0] < w[1]));
            all.extend(batch);
        }

        all.sort_unstable();
        let expected: Vec<u64> = (1_000..2_000).collect();
        assert_eq!(all, expected);
    }

    #[test]
    fn test_reset() {
        let allocator = NonceAllocator::new(10);
        allocator.allocate();
        allocator.allocate();

        // rewinding is allowed
        allocator.reset(5);
        assert_eq!(allocator.allocate(), 5);

        allocator.reset(42);
        assert_eq!(allocator.peek(), 42);
        assert_eq!(allocator.allocate(), 42);
    }

    #[test]
    fn test_advance_to_only_moves_forward() {
        let allocator = NonceAllocator::new(10);

        assert_eq!(allocator.advance_to(8), None);
        assert_eq!(allocator.advance_to(10), None);
        assert_eq!(allocator.peek(), 10);

        assert_eq!(allocator.advance_to(15), Some(10));
        assert_eq!(allocator.allocate(), 15);
    }
}
