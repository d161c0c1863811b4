//! Ring Buffer Implementation

use std::collections::VecDeque;

/// Default buffer capacity (10 samples, ~1s of frames at the usual poll rate)
pub const DEFAULT_CAPACITY: usize = 10;

/// Bounded FIFO ring buffer
///
/// Owned by a single processing stream; wrap in a mutex if shared.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    /// Stored items, oldest at the front
    data: VecDeque<T>,
    /// Maximum number of items retained
    capacity: usize,
    /// Total items pushed (for statistics)
    total_written: usize,
}

impl<T> RingBuffer<T> {
    /// Create a new ring buffer with given capacity (at least 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            data: VecDeque::with_capacity(capacity),
            capacity,
            total_written: 0,
        }
    }

    /// Push an item into the buffer, returning the evicted item if full
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.data.len() >= self.capacity {
            self.data.pop_front()
        } else {
            None
        };
        self.data.push_back(item);
        self.total_written += 1;
        evicted
    }

    /// Get the number of items currently in the buffer
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the buffer capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recently pushed item
    pub fn latest(&self) -> Option<&T> {
        self.data.back()
    }

    /// Iterate over the last N items, most recent first
    pub fn iter_recent(&self, count: usize) -> impl Iterator<Item = &T> {
        self.data.iter().rev().take(count)
    }

    /// Iterate oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    /// Get total items written (for statistics)
    pub fn total_written(&self) -> usize {
        self.total_written
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        self.data.clear();
    }
}
