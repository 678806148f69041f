//! Cache Configuration
//!
//! Tunables for TTL, staleness, capacity and the cleanup timer.

use std::time::Duration;

/// Cache tunables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// TTL applied when `set` is called without one
    pub default_ttl: Duration,
    /// Maximum number of entries before oldest-first eviction
    pub max_size: usize,
    /// Age past which a still-valid entry is reported as stale
    pub stale_threshold: Duration,
    /// Whether the binary spawns the periodic cleanup task
    pub enable_auto_cleanup: bool,
    /// Interval between cleanup sweeps
    pub cleanup_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: Duration::from_secs(5 * 60),
            max_size: 50,
            stale_threshold: Duration::from_secs(2 * 60),
            enable_auto_cleanup: true,
            cleanup_interval: Duration::from_secs(60),
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn with_stale_threshold(mut self, threshold: Duration) -> Self {
        self.stale_threshold = threshold;
        self
    }

    pub fn with_auto_cleanup(mut self, enabled: bool) -> Self {
        self.enable_auto_cleanup = enabled;
        self
    }

    pub fn with_cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = interval;
        self
    }
}
