//! Ring buffer implementation for bounded history
//!
//! Provides a fixed-capacity FIFO that silently evicts the oldest entry once
//! full. Used for the design history consulted by the similarity guard.

use std::collections::VecDeque;

/// A ring buffer that maintains a fixed maximum number of entries
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    buffer: VecDeque<T>,
    capacity: usize,
    total_pushed: usize,
}

impl<T> RingBuffer<T> {
    /// Create a new ring buffer with the specified capacity
    ///
    /// A capacity of zero is treated as one so the most recent entry is always kept.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            buffer: VecDeque::with_capacity(capacity.min(256)),
            capacity,
            total_pushed: 0,
        }
    }

    /// Append an entry, evicting the oldest one when the buffer is full
    pub fn push(&mut self, item: T) {
        self.total_pushed += 1;
        if self.buffer.len() >= self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(item);
    }

    /// Iterate from oldest to newest
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.buffer.iter()
    }

    /// The `n` most recent entries, newest first
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &T> {
        self.buffer.iter().rev().take(n)
    }

    /// Most recently pushed entry
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.buffer.back()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get the total number of entries pushed (including evicted ones)
    #[must_use]
    pub const fn total_pushed(&self) -> usize {
        self.total_pushed
    }

    /// Check if any entry was evicted
    #[must_use]
    pub const fn was_truncated(&self) -> bool {
        self.total_pushed > self.capacity
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
