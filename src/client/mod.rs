//! Backend Client Module
//!
//! Talks to the wishes backend and classifies its failures for the retry
//! executor.

mod error;
mod wishes;

pub use error::FetchError;
pub use wishes::{WishClient, IDEMPOTENCY_KEY_HEADER};
