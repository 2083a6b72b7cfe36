//! Retry logic.
//!
//! # Responsibilities
//! - Re-run an operation up to `max_retries + 1` times
//! - Grow the per-attempt timeout (10s, 15s, 20s by default)
//! - Wait `base * 2^n` between attempts (1s, 2s, 4s by default)
//! - Give up on non-transport errors immediately

use std::future::Future;
use std::time::Duration;

use crate::config::RetryConfig;
use crate::error::{ClientError, Result};
use crate::resilience::backoff::calculate_backoff;

/// Retry schedule derived from [`RetryConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub base_timeout: Duration,
    pub timeout_step: Duration,
    pub jitter_ratio: f64,
}

impl RetryPolicy {
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay_ms: config.base_delay_ms,
            max_delay_ms: config.max_delay_ms,
            base_timeout: Duration::from_millis(config.base_timeout_ms),
            timeout_step: Duration::from_millis(config.timeout_step_ms),
            jitter_ratio: config.jitter_ratio,
        }
    }

    /// The same schedule limited to one attempt.
    pub fn single_attempt(&self) -> Self {
        Self {
            max_retries: 0,
            ..self.clone()
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Deadline for attempt `index` (0-based).
    pub fn timeout_for(&self, index: u32) -> Duration {
        self.base_timeout + self.timeout_step * index
    }

    /// Wait after failed attempt `index` (0-based).
    pub fn delay_after(&self, index: u32) -> Duration {
        calculate_backoff(index + 1, self.base_delay_ms, self.max_delay_ms, self.jitter_ratio)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

/// The attempt handed to a retried operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempt {
    /// 0-based attempt number.
    pub index: u32,
    /// Deadline the operation should apply.
    pub timeout: Duration,
}

/// Run `op` until it succeeds, fails with a non-retryable error, or the
/// policy runs out of attempts. The last error is returned on exhaustion.
pub async fn retry_with_backoff<T, F, Fut>(policy: &RetryPolicy, label: &str, mut op: F) -> Result<T>
where
    F: FnMut(Attempt) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = policy.max_attempts();
    let mut last_error = None;

    for index in 0..attempts {
        let attempt = Attempt {
            index,
            timeout: policy.timeout_for(index),
        };

        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if !e.is_retryable() => return Err(e),
            Err(e) => {
                tracing::warn!(
                    request = %label,
                    attempt = index + 1,
                    max_attempts = attempts,
                    error = %e,
                    "Request attempt failed"
                );
                last_error = Some(e);

                if index + 1 < attempts {
                    let delay = policy.delay_after(index);
                    tokio::time::sleep(delay).await;
                    tracing::info!(
                        request = %label,
                        retry = index + 1,
                        delay_ms = delay.as_millis() as u64,
                        "Retrying request"
                    );
                }
            }
        }
    }

    Err(last_error.unwrap_or_else(|| ClientError::Request(format!("{label}: no attempts made"))))
}
