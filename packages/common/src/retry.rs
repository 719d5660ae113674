use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tracing::warn;

/// Bounds for retrying an operation that failed for a transient reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt. Zero disables retrying.
    pub max_retries: u8,
    pub base_ms: u64,
    pub max_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_ms: 25,
            max_ms: 250,
        }
    }
}

/// Calculate exponential backoff delay with jitter.
///
/// Formula: `min(base_ms * 2^(attempt-1) + jitter, max_ms)` (0-25% jitter)
pub fn calculate_backoff(attempt: u8, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::ZERO;
    }

    let delay_ms = base_ms.saturating_mul(2u64.saturating_pow(u32::from(attempt - 1)));
    let jitter = match delay_ms / 4 {
        0 => 0,
        quarter => rand::rng().random_range(0..=quarter),
    };

    Duration::from_millis(delay_ms.saturating_add(jitter).min(max_ms))
}

/// Run `op` until it succeeds, fails permanently, or the retry budget is spent.
///
/// Only errors for which `is_transient` returns true are retried; every other error is
/// returned immediately.
pub async fn retry_transient<T, E, F, Fut, P>(
    policy: RetryPolicy,
    label: &str,
    is_transient: P,
    mut op: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: std::fmt::Display,
{
    let mut attempt = 0u8;
    loop {
        match op().await {
            Err(err) if attempt < policy.max_retries && is_transient(&err) => {
                attempt += 1;
                let delay = calculate_backoff(attempt, policy.base_ms, policy.max_ms);
                warn!(
                    op = label,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Transient failure, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            other => return other,
        }
    }
}
