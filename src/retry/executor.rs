//! Retry executor: runs an async operation until it succeeds, fails with a
//! non-retryable error, runs out of attempts, or is cancelled.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::{RetryAttempt, RetryConfig, RetryError, RetryObserver, Retryable};

// == Retry Executor ==
/// A retry policy plus the observers that hear about each retry.
///
/// Operations handed to an executor may run more than once. Only pass
/// idempotent operations, or ones tagged with an idempotency key.
#[derive(Clone, Default)]
pub struct RetryExecutor {
    config: RetryConfig,
    observers: Vec<Arc<dyn RetryObserver>>,
}

impl fmt::Debug for RetryExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryExecutor")
            .field("config", &self.config)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl RetryExecutor {
    pub fn new(config: RetryConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Adds an observer. Every observer hears every retry.
    pub fn subscribe(mut self, observer: impl RetryObserver + 'static) -> Self {
        self.observers.push(Arc::new(observer));
        self
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Runs `operation` under this executor's policy.
    pub async fn execute<F, Fut, T, E>(&self, operation: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Retryable + std::error::Error + 'static,
    {
        run(&self.config, &self.observers, operation, None).await
    }

    /// Like [`execute`](Self::execute), but stops as soon as `cancel` fires:
    /// the token is checked before each attempt and raced against each
    /// backoff sleep. An attempt already in flight is not interrupted.
    pub async fn execute_cancellable<F, Fut, T, E>(
        &self,
        operation: F,
        cancel: &CancellationToken,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Retryable + std::error::Error + 'static,
    {
        run(&self.config, &self.observers, operation, Some(cancel)).await
    }
}

/// Runs `operation` with retries, reporting progress to `observers`.
pub async fn execute_with_retry<F, Fut, T, E>(
    operation: F,
    config: &RetryConfig,
    observers: &[Arc<dyn RetryObserver>],
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + std::error::Error + 'static,
{
    run(config, observers, operation, None).await
}

async fn run<F, Fut, T, E>(
    config: &RetryConfig,
    observers: &[Arc<dyn RetryObserver>],
    mut operation: F,
    cancel: Option<&CancellationToken>,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + std::error::Error + 'static,
{
    let max_attempts = config.attempt_limit();
    let mut last_error: Option<E> = None;
    let mut attempt: u32 = 0;

    loop {
        if cancel.is_some_and(CancellationToken::is_cancelled) {
            debug!("Retry loop cancelled after {} attempts", attempt);
            return Err(RetryError::Cancelled {
                attempts: attempt,
                last_error,
            });
        }

        attempt += 1;

        let error = match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!("Operation succeeded after {} attempts", attempt);
                }
                return Ok(value);
            }
            Err(e) => e,
        };

        if !error.is_retryable() {
            debug!("Error is not retryable: {}", error);
            return Err(RetryError::Rejected {
                attempt,
                source: error,
            });
        }

        if attempt >= max_attempts {
            warn!(
                "All {} attempts exhausted. Last error: {}",
                max_attempts, error
            );
            return Err(RetryError::Exhausted {
                attempts: attempt,
                source: error,
            });
        }

        let delay = config.delay_for(attempt);
        let event = RetryAttempt {
            attempt_number: attempt,
            max_attempts,
            delay,
            error: error.to_string(),
        };
        for observer in observers {
            observer.on_retry(&event);
        }
        last_error = Some(error);

        match cancel {
            Some(token) => {
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = token.cancelled() => {
                        debug!("Retry loop cancelled during backoff");
                        return Err(RetryError::Cancelled {
                            attempts: attempt,
                            last_error,
                        });
                    }
                }
            }
            None => tokio::time::sleep(delay).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::ChannelObserver;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;
    use thiserror::Error;
    use tokio::sync::mpsc;

    #[derive(Error, Debug, Clone, PartialEq)]
    enum TestError {
        #[error("service unavailable")]
        Transient,
        #[error("bad request")]
        Client,
    }

    impl Retryable for TestError {
        fn is_retryable(&self) -> bool {
            matches!(self, TestError::Transient)
        }
    }

    fn executor(max_retries: u32) -> RetryExecutor {
        RetryExecutor::new(
            RetryConfig::new()
                .with_max_retries(max_retries)
                .with_jitter(false),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_first_try() {
        let calls = &AtomicU32::new(0);

        let result = executor(3)
            .execute(move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, TestError>(42)
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exactly_max_retries_invocations() {
        let calls = &AtomicU32::new(0);

        let result = executor(3)
            .execute(move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(TestError::Transient)
            })
            .await;

        let err = result.unwrap_err();
        assert!(matches!(
            err,
            RetryError::Exhausted {
                attempts: 3,
                source: TestError::Transient
            }
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_client_error_not_retried() {
        let calls = &AtomicU32::new(0);

        let result = executor(3)
            .execute(move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(TestError::Client)
            })
            .await;

        let err = result.unwrap_err();
        assert!(matches!(err, RetryError::Rejected { attempt: 1, .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_after_one_failure() {
        let calls = &AtomicU32::new(0);

        let result = executor(3)
            .execute(move || async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                if n == 1 {
                    Err(TestError::Transient)
                } else {
                    Ok(format!("call {}", n))
                }
            })
            .await;

        assert_eq!(result.unwrap(), "call 2");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_client_error_after_transient_is_rejected() {
        let calls = &AtomicU32::new(0);

        let result = executor(5)
            .execute(move || async move {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err::<(), _>(TestError::Transient)
                } else {
                    Err(TestError::Client)
                }
            })
            .await;

        let err = result.unwrap_err();
        assert!(matches!(err, RetryError::Rejected { attempt: 2, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_sleeps_between_attempts() {
        let start = tokio::time::Instant::now();

        let _ = executor(3)
            .execute(move || async move { Err::<(), _>(TestError::Transient) })
            .await;

        // 1s after attempt 1, 2s after attempt 2, nothing after the last.
        assert!(start.elapsed() >= Duration::from_secs(3));
        assert!(start.elapsed() < Duration::from_secs(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_observers_receive_each_retry() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let executor = executor(3)
            .subscribe(ChannelObserver::new(tx))
            .subscribe(ChannelObserver::new(tx2));

        let _ = executor
            .execute(move || async move { Err::<(), _>(TestError::Transient) })
            .await;

        let first = rx.try_recv().unwrap();
        let second = rx.try_recv().unwrap();
        assert!(rx.try_recv().is_err(), "No event after the final attempt");

        assert_eq!(first.attempt_number, 1);
        assert_eq!(first.max_attempts, 3);
        assert_eq!(first.delay, Duration::from_secs(1));
        assert_eq!(first.error, "service unavailable");
        assert_eq!(second.attempt_number, 2);
        assert_eq!(second.delay, Duration::from_secs(2));

        assert_eq!(rx2.try_recv().unwrap(), first);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_max_retries_runs_once() {
        let calls = &AtomicU32::new(0);

        let err = executor(0)
            .execute(move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(TestError::Transient)
            })
            .await
            .unwrap_err();

        assert_eq!(err.attempts(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_before_first_attempt() {
        let calls = &AtomicU32::new(0);
        let token = CancellationToken::new();
        token.cancel();

        let err = executor(3)
            .execute_cancellable(
                move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, TestError>(())
                },
                &token,
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RetryError::Cancelled {
                attempts: 0,
                last_error: None
            }
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_during_backoff() {
        let calls = &AtomicU32::new(0);
        let token = CancellationToken::new();
        let canceller = token.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            canceller.cancel();
        });

        let err = executor(3)
            .execute_cancellable(
                move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err::<(), _>(TestError::Transient)
                },
                &token,
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RetryError::Cancelled {
                attempts: 1,
                last_error: Some(TestError::Transient)
            }
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_free_function_uses_given_config() {
        let calls = &AtomicU32::new(0);
        let config = RetryConfig::new().with_max_retries(2).with_jitter(false);

        let err = execute_with_retry(
            move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(TestError::Transient)
            },
            &config,
            &[],
        )
        .await
        .unwrap_err();

        assert!(matches!(err, RetryError::Exhausted { attempts: 2, .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
