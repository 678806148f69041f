//! Configuration Module
//!
//! Handles loading and managing relay configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::retry::RetryConfig;

/// Relay configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Base URL of the wishes backend
    pub upstream_url: String,
    /// Per-request timeout for upstream calls
    pub request_timeout: Duration,
    pub cache: CacheConfig,
    pub retry: RetryConfig,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `UPSTREAM_URL` - Wishes backend base URL (default: http://localhost:5000)
    /// - `REQUEST_TIMEOUT_MS` - Per-request upstream timeout (default: 15000)
    /// - `CACHE_DEFAULT_TTL_MS` - Default entry TTL (default: 300000)
    /// - `CACHE_MAX_SIZE` - Maximum cache entries (default: 50)
    /// - `CACHE_STALE_THRESHOLD_MS` - Age at which entries turn stale (default: 120000)
    /// - `CACHE_AUTO_CLEANUP` - Run the cleanup task (default: true)
    /// - `CACHE_CLEANUP_INTERVAL_MS` - Cleanup frequency (default: 60000)
    /// - `RETRY_MAX_RETRIES` - Attempts per upstream call (default: 3)
    /// - `RETRY_INITIAL_DELAY_MS` - First backoff delay (default: 1000)
    /// - `RETRY_MAX_DELAY_MS` - Backoff cap (default: 10000)
    /// - `RETRY_BACKOFF_MULTIPLIER` - Backoff growth factor (default: 2.0)
    /// - `RETRY_USE_JITTER` - Randomize backoff (default: true)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let cache = defaults.cache;
        let retry = defaults.retry;

        Self {
            server_port: env_or("SERVER_PORT", defaults.server_port),
            upstream_url: env::var("UPSTREAM_URL").unwrap_or(defaults.upstream_url),
            request_timeout: env_ms_or("REQUEST_TIMEOUT_MS", defaults.request_timeout),
            cache: CacheConfig {
                default_ttl: env_ms_or("CACHE_DEFAULT_TTL_MS", cache.default_ttl),
                max_size: env_or("CACHE_MAX_SIZE", cache.max_size),
                stale_threshold: env_ms_or("CACHE_STALE_THRESHOLD_MS", cache.stale_threshold),
                enable_auto_cleanup: env_or("CACHE_AUTO_CLEANUP", cache.enable_auto_cleanup),
                cleanup_interval: env_ms_or("CACHE_CLEANUP_INTERVAL_MS", cache.cleanup_interval),
            },
            retry: RetryConfig {
                max_retries: env_or("RETRY_MAX_RETRIES", retry.max_retries),
                initial_delay: env_ms_or("RETRY_INITIAL_DELAY_MS", retry.initial_delay),
                max_delay: env_ms_or("RETRY_MAX_DELAY_MS", retry.max_delay),
                backoff_multiplier: env_or("RETRY_BACKOFF_MULTIPLIER", retry.backoff_multiplier),
                use_jitter: env_or("RETRY_USE_JITTER", retry.use_jitter),
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            upstream_url: "http://localhost:5000".to_string(),
            request_timeout: Duration::from_millis(15_000),
            cache: CacheConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

/// Parses `name` from the environment, falling back on absence or parse failure.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn env_ms_or(name: &str, default: Duration) -> Duration {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .map(Duration::from_millis)
        .unwrap_or(default)
}
