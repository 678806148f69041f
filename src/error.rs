//! Error types for the wish relay
//!
//! Maps backend and retry failures to HTTP responses using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::client::FetchError;
use crate::models::{ErrorResponse, FieldError};
use crate::retry::RetryError;

pub const UNAVAILABLE_MESSAGE: &str = "Service is waking up, please try again in a few minutes";
pub const RATE_LIMITED_MESSAGE: &str = "Too many requests, please slow down";

// == API Error Enum ==
/// Unified error type for the relay's handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed query or body
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Field-level validation failure, local or from upstream
    #[error("Validation failed: {message}")]
    Validation {
        status: StatusCode,
        message: String,
        errors: Vec<FieldError>,
    },

    /// Upstream said 429
    #[error("Rate limited")]
    RateLimited { retry_after_secs: Option<u64> },

    /// Every retry hit a transient failure
    #[error("Upstream unavailable after {attempts} attempts")]
    Unavailable { attempts: u32 },

    /// Any other upstream failure
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// The retry loop was cancelled
    #[error("Request cancelled")]
    Cancelled,
}

impl From<FetchError> for ApiError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::RateLimited { retry_after_secs } => ApiError::RateLimited { retry_after_secs },
            FetchError::Status {
                status,
                message,
                errors,
            } if (400..500).contains(&status) => ApiError::Validation {
                status: StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_REQUEST),
                message,
                errors,
            },
            FetchError::Rejected { message, errors } => ApiError::Validation {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                message,
                errors,
            },
            other => ApiError::Upstream(other.to_string()),
        }
    }
}

impl From<RetryError<FetchError>> for ApiError {
    fn from(err: RetryError<FetchError>) -> Self {
        match err {
            RetryError::Exhausted { attempts, .. } => ApiError::Unavailable { attempts },
            RetryError::Rejected { source, .. } => source.into(),
            RetryError::Cancelled { .. } => ApiError::Cancelled,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, ErrorResponse::new(msg)),
            ApiError::Validation {
                status,
                message,
                errors,
            } => (status, ErrorResponse::new(message).with_errors(errors)),
            ApiError::RateLimited { retry_after_secs } => (
                StatusCode::TOO_MANY_REQUESTS,
                ErrorResponse::new(RATE_LIMITED_MESSAGE).with_retry_after(retry_after_secs),
            ),
            ApiError::Unavailable { .. } => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorResponse::new(UNAVAILABLE_MESSAGE),
            ),
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, ErrorResponse::new(msg)),
            ApiError::Cancelled => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorResponse::new("Request cancelled"),
            ),
        };

        (status, Json(body)).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
