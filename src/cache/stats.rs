//! Cache Statistics Module
//!
//! Tracks hits, misses, stale hits, evictions and the live entry count.

use serde::Serialize;

// == Cache Stats ==
/// Counters for a single cache instance.
///
/// Counters only grow; they reset when a new cache is constructed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Reads that returned data (fresh or stale)
    pub hits: u64,
    /// Reads that found nothing or an expired entry
    pub misses: u64,
    /// Subset of `hits` that returned stale data
    pub stale_hits: u64,
    /// Entries removed to make room for new keys
    pub evictions: u64,
    /// Current number of live entries
    pub size: usize,
}

impl CacheStats {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    /// Counts a hit that served stale data.
    pub fn record_stale_hit(&mut self) {
        self.hits += 1;
        self.stale_hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn set_size(&mut self, size: usize) {
        self.size = size;
    }
}
