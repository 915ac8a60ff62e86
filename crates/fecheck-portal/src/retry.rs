//! Retry with exponential back-off and jitter for portal requests.
//!
//! Only transport failures and 5xx responses are retried. The retry budget
//! and the delay cap come from config; the budget defaults to zero, so a
//! normal run sends each request once.

use std::future::Future;
use std::time::Duration;

use crate::error::PortalError;
use crate::session::SessionSettings;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:** timeouts, connection failures, HTTP 5xx.
///
/// **Not retriable:** 4xx statuses, undecodable bodies, bad URLs, exhausted
/// candidate lists.
pub(crate) fn is_retriable(err: &PortalError) -> bool {
    match err {
        PortalError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        PortalError::UnexpectedStatus { status, .. } => *status >= 500,
        PortalError::Deserialize { .. }
        | PortalError::InvalidUrl { .. }
        | PortalError::NoCandidateSucceeded { .. } => false,
    }
}

/// How a session retries transient failures.
///
/// The sleep before retry `n` doubles from `base_delay` and is clamped to
/// `max_delay`, both before and after jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RetryPolicy {
    pub(crate) max_retries: u32,
    pub(crate) base_delay: Duration,
    pub(crate) max_delay: Duration,
}

impl RetryPolicy {
    pub(crate) fn from_settings(settings: &SessionSettings) -> Self {
        Self {
            max_retries: settings.max_retries,
            base_delay: Duration::from_millis(settings.backoff_base_ms),
            max_delay: Duration::from_millis(settings.max_backoff_ms),
        }
    }

    /// Un-jittered sleep before retry `retry` (1-based).
    pub(crate) fn nominal_delay(&self, retry: u32) -> Duration {
        let factor = 2u32.checked_pow(retry.saturating_sub(1)).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }

    fn jittered_delay(&self, retry: u32, jitter: f64) -> Duration {
        self.nominal_delay(retry)
            .mul_f64(jitter)
            .min(self.max_delay)
    }

    /// Runs `operation`, retrying retriable errors up to `max_retries` times.
    pub(crate) async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T, PortalError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, PortalError>>,
    {
        let mut retry = 0u32;
        loop {
            let err = match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };
            if retry >= self.max_retries || !is_retriable(&err) {
                return Err(err);
            }
            retry += 1;
            let delay = self.jittered_delay(retry, rand::random_range(0.8..1.2));
            tracing::warn!(
                retry,
                max_retries = self.max_retries,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %err,
                "transient portal error, backing off"
            );
            tokio::time::sleep(delay).await;
        }
    }
}
