//! Retry loop around posting platform calls.

use crate::BackoffPolicy;
use herald_error::RateLimitedError;
use std::fmt::Display;
use std::future::Future;
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, error, warn};

/// Runs platform calls, retrying the throttled ones.
#[derive(Debug, Clone, Default)]
pub struct BackoffController {
    policy: BackoffPolicy,
}

impl BackoffController {
    /// Create a controller with the given policy.
    pub fn new(policy: BackoffPolicy) -> Self {
        Self { policy }
    }

    /// The retry policy in use.
    pub fn policy(&self) -> &BackoffPolicy {
        &self.policy
    }

    /// Run `action`, retrying while it fails with a rate-limit error.
    ///
    /// Non-rate-limit errors return immediately. When the schedule is
    /// exhausted the last rate-limit error is returned.
    pub async fn run<T, E, F, Fut>(&self, operation: &str, mut action: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: RateLimitedError + Display,
    {
        let max_retries = self.policy.max_retries();
        let mut attempt = 0usize;

        Retry::spawn(self.policy.delays(), || {
            attempt += 1;
            let current = attempt;
            let call = action();
            async move {
                match call.await {
                    Ok(value) => {
                        if current > 1 {
                            debug!(operation, attempt = current, "Call succeeded after backoff");
                        }
                        Ok(value)
                    }
                    Err(err) if err.is_rate_limited() => {
                        if current <= max_retries {
                            warn!(
                                operation,
                                attempt = current,
                                max_retries,
                                error = %err,
                                "Rate limited, backing off"
                            );
                        } else {
                            error!(
                                operation,
                                attempt = current,
                                error = %err,
                                "Rate limited, backoff schedule exhausted"
                            );
                        }
                        Err(RetryError::Transient {
                            err,
                            retry_after: None,
                        })
                    }
                    Err(err) => {
                        debug!(operation, attempt = current, error = %err, "Permanent error, not retrying");
                        Err(RetryError::Permanent(err))
                    }
                }
            }
        })
        .await
    }
}
