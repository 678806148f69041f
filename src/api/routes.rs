//! API Routes
//!
//! Configures the Axum router with all relay endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cleanup_handler, clear_cache_handler, create_wish_handler, health_handler,
    list_wishes_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /wishes` - Cached wish page (stale-while-revalidate)
/// - `POST /wishes` - Submit a wish upstream and invalidate cached pages
/// - `DELETE /cache` - Clear cache entries, optionally by key prefix
/// - `POST /cache/cleanup` - Sweep expired entries now
/// - `GET /stats` - Get cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin, since the wedding site is served elsewhere
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/wishes", get(list_wishes_handler).post(create_wish_handler))
        .route("/cache", delete(clear_cache_handler))
        .route("/cache/cleanup", post(cleanup_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
