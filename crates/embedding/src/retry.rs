//! Exponential backoff for remote embedding calls.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Retry policy for the HTTP backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetryConfig {
    /// Extra attempts after the first one. Zero disables retries.
    pub max_retries: u32,
    #[serde(with = "crate::serde_millis")]
    pub base_delay: Duration,
    #[serde(with = "crate::serde_millis")]
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
    /// Spread each delay by up to ±25%.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// Delay before retry number `attempt` (1-based). Attempt 0 is the first
    /// try and never waits.
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let exponential = self.base_delay.as_millis() as f64
            * self
                .backoff_multiplier
                .powi(i32::try_from(attempt - 1).unwrap_or(i32::MAX));
        let delay_ms = exponential.min(self.max_delay.as_millis() as f64).max(0.0) as u64;

        if self.jitter {
            let spread = delay_ms / 4;
            if spread > 0 {
                let offset = fastrand::u64(0..spread * 2);
                return Duration::from_millis(delay_ms - spread + offset);
            }
        }
        Duration::from_millis(delay_ms)
    }
}

#[cfg(feature = "api")]
pub(crate) async fn retry_async<T, F, Fut>(
    cfg: &RetryConfig,
    mut operation: F,
) -> Result<T, crate::EmbeddingError>
where
    F: FnMut(u32) -> Fut,
    Fut: std::future::Future<Output = Result<T, crate::EmbeddingError>>,
{
    let mut attempt = 0;
    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < cfg.max_retries && err.is_retryable() => {
                attempt += 1;
                let delay = cfg.calculate_delay(attempt);
                tracing::warn!(
                    attempt,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "retrying embedding request"
                );
                tokio::time::sleep(delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}
