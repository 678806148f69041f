//! Backend fetch errors and their retry classification.

use thiserror::Error;

use crate::models::FieldError;
use crate::retry::Retryable;

// == Fetch Error ==
/// A failed call to the wishes backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// No response: connection refused, reset, DNS failure
    #[error("network error: {0}")]
    Network(String),

    /// The per-request timeout elapsed
    #[error("request timed out")]
    Timeout,

    /// HTTP 429
    #[error("rate limited by upstream")]
    RateLimited { retry_after_secs: Option<u64> },

    /// Any other non-2xx status
    #[error("upstream returned {status}: {message}")]
    Status {
        status: u16,
        message: String,
        errors: Vec<FieldError>,
    },

    /// 2xx response whose envelope reports `success: false`
    #[error("{message}")]
    Rejected {
        message: String,
        errors: Vec<FieldError>,
    },

    /// The body could not be understood
    #[error("invalid upstream response: {0}")]
    Decode(String),
}

impl FetchError {
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

impl Retryable for FetchError {
    /// Cold-start symptoms (no response, timeouts, 5xx) are transient.
    /// Every 4xx, including 429, and every malformed or refused payload is not.
    fn is_retryable(&self) -> bool {
        match self {
            FetchError::Network(_) | FetchError::Timeout => true,
            FetchError::Status { status, .. } => *status >= 500,
            FetchError::RateLimited { .. } | FetchError::Rejected { .. } | FetchError::Decode(_) => {
                false
            }
        }
    }
}
