//! Cache Module
//!
//! Provides in-memory caching with TTL expiration, stale-while-revalidate
//! classification and oldest-first eviction.

mod clock;
mod config;
mod entry;
mod key;
mod order;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

use std::sync::Arc;

use tokio::sync::RwLock;

// Re-export public types
pub use clock::{current_timestamp_ms, Clock, ManualClock, SystemClock};
pub use config::CacheConfig;
pub use entry::{CacheEntry, CacheStatus};
pub use key::{build_key, normalize_venue, KeyOptions, WISHES_KEY_PREFIX};
pub use order::InsertionOrder;
pub use stats::CacheStats;
pub use store::TtlCache;

/// Handle to a cache shared between request handlers and background tasks.
pub type SharedCache<T> = Arc<RwLock<TtlCache<T>>>;

/// Wraps a cache in a shareable handle.
pub fn shared<T>(cache: TtlCache<T>) -> SharedCache<T> {
    Arc::new(RwLock::new(cache))
}
