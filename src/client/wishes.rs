//! HTTP client for the wishes backend.

use std::time::Duration;

use reqwest::header::RETRY_AFTER;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::FetchError;
use crate::cache::normalize_venue;
use crate::models::{Envelope, NewWish, Wish, WishPage, WishQuery};

/// Header the backend uses to deduplicate repeated submissions.
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

const WISHES_PATH: &str = "/api/wishes";

// == Wish Client ==
/// Thin client over the backend's wish endpoints.
///
/// Each request is bounded by the client's timeout; retries are the
/// caller's business.
#[derive(Debug, Clone)]
pub struct WishClient {
    http: reqwest::Client,
    base_url: String,
}

impl WishClient {
    /// Creates a client with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // == Fetch Wishes ==
    /// `GET /api/wishes?venue=&limit=&page=`
    pub async fn fetch_wishes(&self, query: &WishQuery) -> Result<WishPage, FetchError> {
        let mut params = vec![
            ("limit", query.limit.to_string()),
            ("page", query.page.to_string()),
        ];
        if let Some(venue) = query.venue.as_deref().and_then(normalize_venue) {
            params.push(("venue", venue));
        }

        debug!(?params, "fetching wishes from upstream");

        let response = self
            .http
            .get(format!("{}{}", self.base_url, WISHES_PATH))
            .query(&params)
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;

        read_envelope(response).await
    }

    // == Create Wish ==
    /// `POST /api/wishes`, tagged with an idempotency key so a retried
    /// submission is not stored twice.
    pub async fn create_wish(
        &self,
        wish: &NewWish,
        idempotency_key: &str,
    ) -> Result<Wish, FetchError> {
        debug!(idempotency_key, "posting wish to upstream");

        let response = self
            .http
            .post(format!("{}{}", self.base_url, WISHES_PATH))
            .header(IDEMPOTENCY_KEY_HEADER, idempotency_key)
            .json(wish)
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;

        read_envelope(response).await
    }
}

/// Unwraps the backend envelope, mapping every failure shape to a
/// [`FetchError`].
async fn read_envelope<T: DeserializeOwned>(response: Response) -> Result<T, FetchError> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok());
        return Err(FetchError::RateLimited { retry_after_secs });
    }

    let body = response.bytes().await.map_err(FetchError::from_reqwest)?;

    if !status.is_success() {
        let envelope = serde_json::from_slice::<Envelope<serde_json::Value>>(&body).ok();
        let fallback = || {
            status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
        };
        let (message, errors) = match envelope {
            Some(env) => (env.error.unwrap_or_else(fallback), env.errors),
            None => (fallback(), Vec::new()),
        };
        return Err(FetchError::Status {
            status: status.as_u16(),
            message,
            errors,
        });
    }

    let envelope: Envelope<T> =
        serde_json::from_slice(&body).map_err(|e| FetchError::Decode(e.to_string()))?;

    if !envelope.success {
        return Err(FetchError::Rejected {
            message: envelope
                .error
                .unwrap_or_else(|| "request was not successful".to_string()),
            errors: envelope.errors,
        });
    }

    envelope
        .data
        .ok_or_else(|| FetchError::Decode("response has no data".to_string()))
}
