//! Retry Module
//!
//! Retries transient failures of async operations with exponential
//! backoff and jitter, and reports progress to subscribed observers.
//!
//! Which failures are transient is decided by the error type through the
//! [`Retryable`] trait.

mod error;
mod executor;
mod observer;
mod policy;

pub use error::{RetryError, Retryable};
pub use executor::{execute_with_retry, RetryExecutor};
pub use observer::{ChannelObserver, RetryAttempt, RetryObserver, TracingObserver};
pub use policy::RetryConfig;
