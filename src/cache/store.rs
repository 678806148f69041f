//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with insertion-order
//! eviction, TTL expiration and freshness classification.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::cache::{
    CacheConfig, CacheEntry, CacheStats, CacheStatus, Clock, InsertionOrder, SystemClock,
};

// == TTL Cache ==
/// In-memory TTL cache with stale-while-revalidate classification.
///
/// The cache is passive: it never fetches. Callers ask for [`status`]
/// and decide whether to refresh.
///
/// [`status`]: TtlCache::status
#[derive(Debug)]
pub struct TtlCache<T> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<T>>,
    /// Write order for eviction
    order: InsertionOrder,
    stats: CacheStats,
    config: CacheConfig,
    clock: Arc<dyn Clock>,
}

impl<T: Clone> TtlCache<T> {
    // == Constructor ==
    /// Creates a cache on the system clock.
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a cache on the given clock.
    ///
    /// A `max_size` of 0 is treated as 1.
    pub fn with_clock(mut config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        config.max_size = config.max_size.max(1);
        Self {
            entries: HashMap::new(),
            order: InsertionOrder::new(),
            stats: CacheStats::new(),
            config,
            clock,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    // == Get ==
    /// Returns a copy of the data stored under `key`.
    ///
    /// Expired entries are removed and counted as misses. Stale entries are
    /// still returned and counted as both a hit and a stale hit.
    pub fn get(&mut self, key: &str) -> Option<T> {
        let now = self.clock.now_ms();
        let stale_threshold = self.stale_threshold_ms();

        let status = match self.entries.get(key) {
            Some(entry) => entry.status(now, stale_threshold),
            None => CacheStatus::Missing,
        };

        match status {
            CacheStatus::Fresh => {
                self.stats.record_hit();
                self.entries.get(key).map(|e| e.data.clone())
            }
            CacheStatus::Stale => {
                self.stats.record_stale_hit();
                self.entries.get(key).map(|e| e.data.clone())
            }
            CacheStatus::Expired => {
                debug!(key, "dropping expired entry on read");
                self.remove_entry(key);
                self.stats.record_miss();
                None
            }
            CacheStatus::Missing => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Set ==
    /// Stores `data` under `key` with the given TTL or the default one.
    ///
    /// Writing a new key while the cache is full evicts the oldest written
    /// key first. Overwriting an existing key never evicts.
    pub fn set(&mut self, key: impl Into<String>, data: T, ttl: Option<Duration>) {
        let key = key.into();

        if !self.entries.contains_key(&key) && self.entries.len() >= self.config.max_size {
            if let Some(evicted) = self.order.pop_oldest() {
                debug!(key = %evicted, "evicting oldest entry");
                self.entries.remove(&evicted);
                self.stats.record_eviction();
            }
        }

        let ttl_ms = ttl.unwrap_or(self.config.default_ttl).as_millis() as u64;
        let entry = CacheEntry::new(key.clone(), data, self.clock.now_ms(), ttl_ms);

        self.entries.insert(key.clone(), entry);
        self.order.record(&key);
        self.sync_size();
    }

    // == Status ==
    /// Classifies `key` without touching counters or entries.
    pub fn status(&self, key: &str) -> CacheStatus {
        match self.entries.get(key) {
            Some(entry) => entry.status(self.clock.now_ms(), self.stale_threshold_ms()),
            None => CacheStatus::Missing,
        }
    }

    /// True if `key` holds servable data (fresh or stale).
    pub fn is_valid(&self, key: &str) -> bool {
        self.status(key).is_servable()
    }

    pub fn is_stale(&self, key: &str) -> bool {
        self.status(key) == CacheStatus::Stale
    }

    // == Delete ==
    /// Removes one entry. Returns whether it was present.
    pub fn delete(&mut self, key: &str) -> bool {
        let removed = self.remove_entry(key);
        self.sync_size();
        removed
    }

    // == Clear ==
    /// Removes every entry whose key starts with `prefix`, or everything
    /// when no prefix is given. Returns the number removed.
    pub fn clear(&mut self, prefix: Option<&str>) -> usize {
        let before = self.entries.len();

        match prefix {
            Some(prefix) => {
                self.entries.retain(|k, _| !k.starts_with(prefix));
                self.order.remove_where(|k| k.starts_with(prefix));
            }
            None => {
                self.entries.clear();
                self.order.clear();
            }
        }

        self.sync_size();
        before - self.entries.len()
    }

    // == Cleanup ==
    /// Removes all expired entries and returns how many were removed.
    pub fn cleanup(&mut self) -> usize {
        let now = self.clock.now_ms();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.remove_entry(key);
        }

        self.sync_size();
        expired.len()
    }

    // == Age ==
    /// Time since `key` was written, if present.
    pub fn age(&self, key: &str) -> Option<Duration> {
        let now = self.clock.now_ms();
        self.entries
            .get(key)
            .map(|entry| Duration::from_millis(entry.age_ms(now)))
    }

    // == Stats ==
    /// Returns a snapshot of the counters.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys from oldest to newest write.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter()
    }

    fn stale_threshold_ms(&self) -> u64 {
        self.config.stale_threshold.as_millis() as u64
    }

    fn remove_entry(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_some() {
            self.order.remove(key);
            self.sync_size();
            true
        } else {
            false
        }
    }

    fn sync_size(&mut self) {
        self.stats.set_size(self.entries.len());
    }
}
