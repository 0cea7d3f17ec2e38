//! Startup-phase connection retry.
//!
//! Transport errors while the pipeline is already running are handled at
//! the call site (logged, loop continues). Connecting at startup is the
//! one place that retries with exponential backoff, and exhausting the
//! attempt ceiling is fatal.

use crate::transport::BrokerError;
use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

/// Backoff policy for startup connection attempts.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Attempt ceiling, including the first try
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles on every further attempt
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Delay applied after a failed attempt (0-based).
    fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

/// Run a fallible connect operation under `policy`.
///
/// `op` receives the 1-based attempt number. The first success wins; once
/// the ceiling is hit the last error is wrapped in
/// [`BrokerError::RetriesExhausted`].
pub async fn connect_with_retry<T, F, Fut>(
    mut op: F,
    policy: RetryPolicy,
) -> Result<T, BrokerError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, BrokerError>>,
{
    let mut last_error = String::new();

    for attempt in 0..policy.max_attempts {
        match op(attempt + 1).await {
            Ok(value) => {
                info!(attempt = attempt + 1, "broker connection established");
                return Ok(value);
            }
            Err(e) => {
                warn!(
                    attempt = attempt + 1,
                    max_attempts = policy.max_attempts,
                    error = %e,
                    "broker connection attempt failed"
                );
                last_error = e.to_string();

                if attempt + 1 < policy.max_attempts {
                    tokio::time::sleep(policy.delay_after(attempt)).await;
                }
            }
        }
    }

    Err(BrokerError::RetriesExhausted {
        attempts: policy.max_attempts,
        last_error,
    })
}
