//! Retry policy for stage calls.
//!
//! Only transient failures are retried: 429, 500, 502, 503, 504, transport
//! errors and timeouts. Auth, bad-request, parse and empty-response
//! failures fail on the first attempt. The default is zero retries.

use std::time::Duration;

use crate::error::ClientError;

const TRANSIENT_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// The backoff doubles per attempt up to this multiple of the base.
const MAX_BACKOFF_SHIFT: u32 = 4;

/// How many times, and how patiently, a backend retries one call.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Extra attempts after the first. 0 disables retrying.
    pub max_retries: u32,
    /// Wait before the first retry; doubled for each later one.
    pub backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            backoff: Duration::from_millis(500),
        }
    }
}

impl RetryConfig {
    pub fn with_retries(retries: u32) -> Self {
        Self {
            max_retries: retries,
            ..Default::default()
        }
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Wait before retry number `attempt + 1`.
    pub fn delay(&self, attempt: u32) -> Duration {
        self.backoff
            .saturating_mul(1 << attempt.min(MAX_BACKOFF_SHIFT))
    }

    /// Whether `error` from attempt `attempt` (0-indexed) earns another try.
    pub fn should_retry(&self, error: &ClientError, attempt: u32) -> bool {
        attempt < self.max_retries && error.is_transient()
    }
}

impl ClientError {
    /// Whether this failure may succeed if the call is repeated.
    pub fn is_transient(&self) -> bool {
        match self {
            ClientError::Transport(_) | ClientError::Timeout(_) => true,
            ClientError::Http { status, .. } => TRANSIENT_STATUSES.contains(status),
            ClientError::Api(_) | ClientError::Parse(_) | ClientError::EmptyResponse => false,
        }
    }
}
