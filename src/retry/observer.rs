//! Retry progress events and their subscribers.

use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;
use tracing::warn;

// == Retry Attempt ==
/// Emitted after a retryable failure, before the backoff sleep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetryAttempt {
    /// The attempt that just failed (1-based)
    pub attempt_number: u32,
    /// Attempt ceiling for this loop
    pub max_attempts: u32,
    /// Backoff before the next attempt
    #[serde(rename = "delay_ms", serialize_with = "serialize_millis")]
    pub delay: Duration,
    /// Rendered message of the failure that triggered the retry
    pub error: String,
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

// == Observer Trait ==
/// Receives retry progress events.
pub trait RetryObserver: Send + Sync {
    fn on_retry(&self, attempt: &RetryAttempt);
}

/// Ignores every event.
impl RetryObserver for () {
    fn on_retry(&self, _attempt: &RetryAttempt) {}
}

// == Tracing Observer ==
/// Logs each retry at warn level.
#[derive(Debug, Clone, Default)]
pub struct TracingObserver {
    /// Name of the operation being retried, included in the log line
    pub operation: String,
}

impl TracingObserver {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
        }
    }
}

impl RetryObserver for TracingObserver {
    fn on_retry(&self, attempt: &RetryAttempt) {
        warn!(
            operation = %self.operation,
            "Attempt {}/{} failed: {}. Retrying in {:?}",
            attempt.attempt_number,
            attempt.max_attempts,
            attempt.error,
            attempt.delay
        );
    }
}

// == Channel Observer ==
/// Forwards each event over an unbounded channel.
///
/// A closed receiver is ignored; the retry loop never blocks on observers.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: UnboundedSender<RetryAttempt>,
}

impl ChannelObserver {
    pub fn new(tx: UnboundedSender<RetryAttempt>) -> Self {
        Self { tx }
    }
}

impl RetryObserver for ChannelObserver {
    fn on_retry(&self, attempt: &RetryAttempt) {
        let _ = self.tx.send(attempt.clone());
    }
}
