//! Wishwall - caching relay for a wedding guest-wish wall
//!
//! Serves wish pages from a TTL cache with stale-while-revalidate
//! semantics and masks backend cold-starts with retries.

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod retry;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_cleanup_task;
