//! API Handlers
//!
//! HTTP request handlers for each relay endpoint.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::cache::{self, CacheStatus, SharedCache, TtlCache, WISHES_KEY_PREFIX};
use crate::client::{FetchError, WishClient, IDEMPOTENCY_KEY_HEADER};
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::models::{
    CacheSource, ClearCacheQuery, CreatedWishResponse, HealthResponse, NewWish, RemovedResponse,
    StatsResponse, WishPage, WishQuery, WishesResponse,
};
use crate::retry::{RetryError, RetryExecutor, TracingObserver};

type RefreshSet = Arc<Mutex<HashSet<String>>>;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Cached wish pages keyed by query fingerprint
    pub cache: SharedCache<WishPage>,
    pub client: WishClient,
    /// Retry policy for upstream calls
    pub retry: RetryExecutor,
    /// Keys with a background refresh in flight
    refreshing: RefreshSet,
    /// Bumped whenever the wish list changes upstream. A fetch that spans
    /// a bump must not write its result back.
    epoch: Arc<AtomicU64>,
}

/// Marks a key as refreshing until dropped, including when the refresh
/// task panics.
#[derive(Debug)]
struct RefreshGuard {
    refreshing: RefreshSet,
    key: String,
}

impl Drop for RefreshGuard {
    fn drop(&mut self) {
        lock_refreshing(&self.refreshing).remove(&self.key);
    }
}

// The set is only touched in short synchronous sections, so a poisoned
// lock still holds a consistent set.
fn lock_refreshing(set: &Mutex<HashSet<String>>) -> MutexGuard<'_, HashSet<String>> {
    set.lock().unwrap_or_else(PoisonError::into_inner)
}

impl AppState {
    pub fn new(cache: SharedCache<WishPage>, client: WishClient, retry: RetryExecutor) -> Self {
        Self {
            cache,
            client,
            retry,
            refreshing: Arc::new(Mutex::new(HashSet::new())),
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> std::result::Result<Self, reqwest::Error> {
        let cache = cache::shared(TtlCache::new(config.cache.clone()));
        let client = WishClient::new(config.upstream_url.clone(), config.request_timeout)?;
        let retry =
            RetryExecutor::new(config.retry.clone()).subscribe(TracingObserver::new("upstream"));
        Ok(Self::new(cache, client, retry))
    }

    /// Fetches a page from upstream through the retry executor and caches it.
    ///
    /// The page is returned but not cached when the wish list was
    /// invalidated while the fetch was running.
    pub async fn fetch_and_store(
        &self,
        query: &WishQuery,
    ) -> std::result::Result<WishPage, RetryError<FetchError>> {
        let started_at = self.epoch.load(Ordering::SeqCst);
        let client = &self.client;
        let page = self
            .retry
            .execute(move || client.fetch_wishes(query))
            .await?;

        let key = query.cache_key();
        let mut cache = self.cache.write().await;
        if self.epoch.load(Ordering::SeqCst) == started_at {
            cache.set(key, page.clone(), None);
        } else {
            debug!(key = %key, "wish list changed during fetch, result not cached");
        }
        Ok(page)
    }

    /// Drops every cached wish page and fences off fetches already in
    /// flight. Returns the number of entries removed.
    pub async fn invalidate_wishes(&self) -> usize {
        let mut cache = self.cache.write().await;
        self.epoch.fetch_add(1, Ordering::SeqCst);
        cache.clear(Some(WISHES_KEY_PREFIX))
    }

    /// Claims `key` for a background refresh. `None` if one is running.
    fn claim_refresh(&self, key: &str) -> Option<RefreshGuard> {
        if !lock_refreshing(&self.refreshing).insert(key.to_string()) {
            return None;
        }
        Some(RefreshGuard {
            refreshing: Arc::clone(&self.refreshing),
            key: key.to_string(),
        })
    }

    /// Refreshes `key` in the background unless a refresh is already running.
    fn spawn_refresh(&self, query: WishQuery, key: String) {
        let Some(guard) = self.claim_refresh(&key) else {
            debug!(key = %key, "refresh already in flight");
            return;
        };

        let state = self.clone();
        tokio::spawn(async move {
            let _guard = guard;
            match state.fetch_and_store(&query).await {
                Ok(_) => debug!(key = %key, "background refresh complete"),
                Err(e) => warn!(
                    key = %key,
                    attempts = e.attempts(),
                    error = %e,
                    "background refresh failed"
                ),
            }
        });
    }

    /// Returns true while a background refresh for `key` is running.
    pub fn is_refreshing(&self, key: &str) -> bool {
        lock_refreshing(&self.refreshing).contains(key)
    }
}

/// Handler for GET /wishes
///
/// Serves from cache when possible. Stale entries are served immediately
/// and refreshed in the background; expired or missing ones are fetched.
pub async fn list_wishes_handler(
    State(state): State<AppState>,
    Query(query): Query<WishQuery>,
) -> Result<Json<WishesResponse>> {
    let query = query.normalized();
    if let Some(error_msg) = query.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let key = query.cache_key();

    // Write lock: reads update hit/miss counters
    let cached = {
        let mut cache = state.cache.write().await;
        let status = cache.status(&key);
        let age_ms = cache
            .age(&key)
            .map(|age| age.as_millis() as u64)
            .unwrap_or(0);
        cache.get(&key).map(|page| (status, page, age_ms))
    };

    if let Some((status, page, age_ms)) = cached {
        let source = if status == CacheStatus::Stale {
            state.spawn_refresh(query, key);
            CacheSource::Stale
        } else {
            CacheSource::Fresh
        };
        return Ok(Json(WishesResponse::new(page, source, age_ms)));
    }

    debug!(key = %key, "cache miss");
    let page = state.fetch_and_store(&query).await?;

    Ok(Json(WishesResponse::new(page, CacheSource::Miss, 0)))
}

/// Handler for POST /wishes
///
/// Forwards a new wish upstream with an idempotency key, so the retry
/// executor may safely resend it, then drops every cached wish page.
pub async fn create_wish_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(wish): Json<NewWish>,
) -> Result<(StatusCode, Json<CreatedWishResponse>)> {
    let errors = wish.validate();
    if !errors.is_empty() {
        return Err(ApiError::Validation {
            status: StatusCode::BAD_REQUEST,
            message: "Validation failed".to_string(),
            errors,
        });
    }

    let idempotency_key = headers
        .get(IDEMPOTENCY_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let client = &state.client;
    let wish_ref = &wish;
    let key_ref = idempotency_key.as_str();
    let created = state
        .retry
        .execute(move || client.create_wish(wish_ref, key_ref))
        .await?;

    let invalidated = state.invalidate_wishes().await;
    info!(id = %created.id, invalidated, "wish created");

    Ok((StatusCode::CREATED, Json(CreatedWishResponse::new(created))))
}

/// Handler for DELETE /cache
///
/// Drops entries whose key starts with `prefix`, or all entries.
pub async fn clear_cache_handler(
    State(state): State<AppState>,
    Query(params): Query<ClearCacheQuery>,
) -> Json<RemovedResponse> {
    let prefix = params.prefix.as_deref().filter(|p| !p.is_empty());
    let removed = state.cache.write().await.clear(prefix);
    info!(?prefix, removed, "cache cleared");

    Json(RemovedResponse::new(removed))
}

/// Handler for POST /cache/cleanup
pub async fn cleanup_handler(State(state): State<AppState>) -> Json<RemovedResponse> {
    let removed = state.cache.write().await.cleanup();
    Json(RemovedResponse::new(removed))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.read().await.stats();
    Json(StatsResponse::from(stats))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
