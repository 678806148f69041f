//! API Module
//!
//! HTTP handlers and routing for the wish relay.
//!
//! # Endpoints
//! - `GET /wishes` - Cached wish page
//! - `POST /wishes` - Submit a wish
//! - `DELETE /cache` - Clear cache entries
//! - `POST /cache/cleanup` - Sweep expired entries
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
