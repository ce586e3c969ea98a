//! Capped exponential backoff for calls into external sources.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tickai_core::{Result, TickaiError};
use tokio::time::sleep;
use tracing::{debug, warn};

/// Default attempt ceiling before giving up.
const DEFAULT_MAX_ATTEMPTS: u32 = 100;

/// Default delay before the first retry.
const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(5);

/// Default upper bound on any single delay.
const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(60);

/// Retry policy for flaky source calls.
///
/// Only errors for which [`TickaiError::is_retryable`] is true are retried.
/// The delay before retry `n` is `initial_delay * multiplier^(n - 1)`, capped
/// at `max_delay`. A rate-limit error carrying a `retry_after` hint waits for
/// the hint instead, still capped at `max_delay`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
    /// Growth factor between consecutive delays.
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay: DEFAULT_INITIAL_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    #[must_use]
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Default::default()
        }
    }

    /// Sets the attempt ceiling.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Sets the first delay and the delay cap.
    #[must_use]
    pub const fn with_delays(mut self, initial_delay: Duration, max_delay: Duration) -> Self {
        self.initial_delay = initial_delay;
        self.max_delay = max_delay;
        self
    }

    /// Sets the growth factor between delays.
    #[must_use]
    pub const fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Checks that the policy can be executed.
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(TickaiError::Config("max_attempts must be at least 1".to_string()));
        }
        if !self.multiplier.is_finite() || self.multiplier < 1.0 {
            return Err(TickaiError::Config(format!(
                "multiplier must be a finite number >= 1, got {}",
                self.multiplier
            )));
        }
        if self.initial_delay > self.max_delay {
            return Err(TickaiError::Config(
                "initial_delay must not exceed max_delay".to_string(),
            ));
        }
        Ok(())
    }

    /// Delay to wait after failed attempt number `attempt` (1-based).
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
        let secs = self.initial_delay.as_secs_f64() * self.multiplier.powi(exponent);
        let capped = secs.min(self.max_delay.as_secs_f64());
        Duration::try_from_secs_f64(capped).unwrap_or(self.max_delay)
    }
}

/// Runs `op` until it succeeds, fails with a non-retryable error, or the
/// policy's attempt ceiling is reached.
///
/// Exhaustion is reported as [`TickaiError::RetriesExhausted`] carrying the
/// last error.
pub async fn retry<T, F, Fut>(policy: &RetryPolicy, operation: &str, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(operation, attempt, "Succeeded after retrying");
                }
                return Ok(value);
            }
            Err(e) if e.is_retryable() => {
                if attempt >= max_attempts {
                    warn!(operation, attempts = attempt, error = %e, "Giving up");
                    return Err(TickaiError::RetriesExhausted {
                        operation: operation.to_string(),
                        attempts: attempt,
                        last_error: Box::new(e),
                    });
                }
                let delay = match &e {
                    TickaiError::RateLimited {
                        retry_after: Some(hint),
                        ..
                    } => (*hint).min(policy.max_delay),
                    _ => policy.delay_for(attempt),
                };
                warn!(
                    operation,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Attempt failed, retrying"
                );
                sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
