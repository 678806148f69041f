//! Retry error types and the retryability seam.

use thiserror::Error;

// == Retryable ==
/// Classifies a failure as transient (worth retrying) or not.
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

// == Retry Error ==
/// Final outcome of a retry loop that did not succeed.
///
/// `Exhausted` and `Rejected` are kept apart so callers can tell a backend
/// that never came up from a request that was refused outright.
#[derive(Error, Debug)]
pub enum RetryError<E: std::error::Error + 'static> {
    /// Every allowed attempt failed with a retryable error
    #[error("failed after {attempts} attempts: {source}")]
    Exhausted {
        attempts: u32,
        #[source]
        source: E,
    },

    /// A non-retryable error ended the loop
    #[error("{source}")]
    Rejected {
        attempt: u32,
        #[source]
        source: E,
    },

    /// Cancellation was requested before the loop finished
    #[error("cancelled after {attempts} attempts")]
    Cancelled { attempts: u32, last_error: Option<E> },
}

impl<E: std::error::Error + 'static> RetryError<E> {
    /// Number of invocations made before the loop ended.
    pub fn attempts(&self) -> u32 {
        match self {
            RetryError::Exhausted { attempts, .. } => *attempts,
            RetryError::Rejected { attempt, .. } => *attempt,
            RetryError::Cancelled { attempts, .. } => *attempts,
        }
    }
}
