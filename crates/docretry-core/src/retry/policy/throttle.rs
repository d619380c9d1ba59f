//! 429 throttling: bounded retries with server hint or exponential backoff.

use std::time::Duration;

use crate::client::ServiceRequest;
use crate::config::RetryOptions;
use crate::retry::error::DocumentClientError;

use super::RetryPolicy;

/// Exponent cap so the no-hint backoff cannot overflow.
const MAX_BACKOFF_EXPONENT: u32 = 16;

/// Retries 429 responses within an attempt budget and a cumulative wait budget.
///
/// The delay is the server's retry-after hint when present, otherwise
/// `backoff_base * 2^attempt`. Either way it is clipped to what remains of the
/// wait budget; once nothing remains the policy is exhausted.
#[derive(Debug, Clone)]
pub struct ResourceThrottleRetryPolicy {
    /// Maximum number of retries (the first attempt is not counted).
    max_attempts: u32,
    max_wait: Duration,
    backoff_base: Duration,
    attempts: u32,
    cumulative_wait: Duration,
    retry_after: Duration,
}

impl ResourceThrottleRetryPolicy {
    pub fn new(max_attempts: u32, max_wait: Duration, backoff_base: Duration) -> Self {
        Self {
            max_attempts,
            max_wait,
            backoff_base,
            attempts: 0,
            cumulative_wait: Duration::ZERO,
            retry_after: Duration::ZERO,
        }
    }

    pub fn from_options(options: &RetryOptions) -> Self {
        Self::new(
            options.max_retry_attempts_on_throttled_requests,
            options.max_retry_wait_time(),
            options.throttle_backoff_base(),
        )
    }

    /// Retries granted so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Total delay handed out so far.
    pub fn cumulative_wait(&self) -> Duration {
        self.cumulative_wait
    }

    fn backoff(&self) -> Duration {
        let exp = self.attempts.min(MAX_BACKOFF_EXPONENT);
        self.backoff_base.saturating_mul(1u32 << exp)
    }
}

impl RetryPolicy for ResourceThrottleRetryPolicy {
    type Request = ServiceRequest;

    fn should_retry(&mut self, error: &DocumentClientError, _request: &mut ServiceRequest) -> bool {
        if self.attempts >= self.max_attempts {
            return false;
        }
        let remaining = self.max_wait.saturating_sub(self.cumulative_wait);
        if remaining.is_zero() {
            return false;
        }

        let suggested = error.retry_after().unwrap_or_else(|| self.backoff());
        let delay = suggested.min(remaining);

        self.attempts += 1;
        self.cumulative_wait += delay;
        self.retry_after = delay;
        true
    }

    fn retry_after(&self) -> Duration {
        self.retry_after
    }
}
