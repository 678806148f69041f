//! Cache Entry Module
//!
//! Defines individual cache entries and their freshness classification.

use serde::Serialize;

// == Cache Status ==
/// Freshness of a key at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStatus {
    /// Younger than the stale threshold
    Fresh,
    /// Past the stale threshold but still within its TTL
    Stale,
    /// TTL elapsed; the entry must not be served
    Expired,
    /// No entry under this key
    Missing,
}

impl CacheStatus {
    /// Returns true for statuses whose data may still be served.
    pub fn is_servable(self) -> bool {
        matches!(self, CacheStatus::Fresh | CacheStatus::Stale)
    }
}

// == Cache Entry ==
/// A single stored response with the metadata needed to age it.
///
/// Entries are replaced wholesale on refresh and never mutated in place.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The stored value
    pub data: T,
    /// Write timestamp (Unix milliseconds)
    pub timestamp: u64,
    /// Time to live in milliseconds
    pub ttl: u64,
    /// Key the entry was stored under
    pub key: String,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates a new entry written at `timestamp`.
    pub fn new(key: impl Into<String>, data: T, timestamp: u64, ttl: u64) -> Self {
        Self {
            data,
            timestamp,
            ttl,
            key: key.into(),
        }
    }

    /// Milliseconds since the entry was written. A clock that moved
    /// backwards reads as age 0.
    pub fn age_ms(&self, now: u64) -> u64 {
        now.saturating_sub(self.timestamp)
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: the entry is expired as soon as its age reaches
    /// the TTL, so a zero TTL entry is never served.
    pub fn is_expired(&self, now: u64) -> bool {
        self.age_ms(now) >= self.ttl
    }

    /// Classifies the entry against the given stale threshold.
    pub fn status(&self, now: u64, stale_threshold: u64) -> CacheStatus {
        let age = self.age_ms(now);
        if age >= self.ttl {
            CacheStatus::Expired
        } else if age >= stale_threshold {
            CacheStatus::Stale
        } else {
            CacheStatus::Fresh
        }
    }
}
