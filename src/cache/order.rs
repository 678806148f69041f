//! Insertion Order Module
//!
//! Tracks write order for oldest-first eviction.

use std::collections::VecDeque;

// == Insertion Order ==
/// Tracks the order in which keys were written.
///
/// Keys are stored in a VecDeque where:
/// - Front = Oldest write
/// - Back = Newest write
///
/// Reads never reorder keys, so this is insertion-order eviction rather
/// than LRU.
#[derive(Debug, Default)]
pub struct InsertionOrder {
    order: VecDeque<String>,
}

impl InsertionOrder {
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Record ==
    /// Marks a key as the newest write.
    ///
    /// A key written again moves to the back.
    pub fn record(&mut self, key: &str) {
        self.remove(key);
        self.order.push_back(key.to_string());
    }

    // == Remove ==
    pub fn remove(&mut self, key: &str) {
        self.order.retain(|k| k != key);
    }

    /// Removes every key matching the predicate.
    pub fn remove_where(&mut self, mut pred: impl FnMut(&str) -> bool) {
        self.order.retain(|k| !pred(k));
    }

    // == Pop Oldest ==
    /// Returns and removes the oldest written key.
    ///
    /// Returns None if nothing is tracked.
    pub fn pop_oldest(&mut self) -> Option<String> {
        self.order.pop_front()
    }

    pub fn clear(&mut self) {
        self.order.clear();
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Keys from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}
