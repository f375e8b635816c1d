use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Backoff policy for startup connection attempts.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_multiplier: f64,
    /// Scale each delay by a random factor in [0.5, 1.0)
    pub use_jitter: bool,
}

impl RetryConfig {
    /// Defaults: 3 retries, 100ms initial delay, 5s cap, x2 backoff, jitter on.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_delay(mut self, delay_ms: u64) -> Self {
        self.initial_delay_ms = delay_ms;
        self
    }

    pub fn with_max_delay(mut self, delay_ms: u64) -> Self {
        self.max_delay_ms = delay_ms;
        self
    }

    pub fn without_jitter(mut self) -> Self {
        self.use_jitter = false;
        self
    }

    /// Un-jittered delay before retry number `retry` (1-based).
    pub fn base_delay_ms(&self, retry: u32) -> u64 {
        let factor = self.backoff_multiplier.powi(retry.saturating_sub(1) as i32);
        ((self.initial_delay_ms as f64 * factor) as u64).min(self.max_delay_ms)
    }

    fn delay_for(&self, retry: u32) -> Duration {
        let base = self.base_delay_ms(retry);
        let ms = if self.use_jitter { apply_jitter(base) } else { base };
        Duration::from_millis(ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 100,
            max_delay_ms: 5000,
            backoff_multiplier: 2.0,
            use_jitter: true,
        }
    }
}

/// Run `operation` until it succeeds or `config.max_retries` retries are used up.
///
/// Returns the last error when every attempt fails.
pub async fn retry_with_backoff<F, Fut, T, E>(mut operation: F, config: RetryConfig) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut retries = 0;

    loop {
        match operation().await {
            Ok(value) => {
                if retries > 0 {
                    debug!(retries, "Operation succeeded after retrying");
                }
                return Ok(value);
            }
            Err(e) if retries >= config.max_retries => {
                warn!(attempts = retries + 1, error = %e, "Operation failed, giving up");
                return Err(e);
            }
            Err(e) => {
                retries += 1;
                let delay = config.delay_for(retries);
                warn!(
                    retry = retries,
                    max_retries = config.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Operation failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

fn apply_jitter(delay: u64) -> u64 {
    use std::collections::hash_map::RandomState;
    use std::hash::BuildHasher;

    // RandomState is seeded per instance
    let random_factor =
        (RandomState::new().hash_one(std::time::SystemTime::now()) % 50) as f64 / 100.0 + 0.5;

    (delay as f64 * random_factor) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast() -> RetryConfig {
        RetryConfig::new().with_initial_delay(1).without_jitter()
    }

    #[tokio::test]
    async fn test_retry_success_first_attempt() {
        let calls = Arc::new(AtomicU32::new(0));

        let result = retry_with_backoff(
            || {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, String>("connected")
                }
            },
            fast(),
        )
        .await;

        assert_eq!(result.unwrap(), "connected");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retry_success_after_failures() {
        let calls = Arc::new(AtomicU32::new(0));

        let result = retry_with_backoff(
            || {
                let calls = calls.clone();
                async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst);
                    if n < 2 { Err(format!("attempt {}", n + 1)) } else { Ok(n) }
                }
            },
            fast(),
        )
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_returns_last_error() {
        let calls = Arc::new(AtomicU32::new(0));

        let result = retry_with_backoff(
            || {
                let calls = calls.clone();
                async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst);
                    Err::<(), _>(format!("failure {}", n))
                }
            },
            fast().with_max_retries(2),
        )
        .await;

        assert_eq!(result.unwrap_err(), "failure 2");
        assert_eq!(calls.load(Ordering::SeqCst), 3); // 1 initial + 2 retries
    }

    #[test]
    fn test_base_delay_grows_and_caps() {
        let config = RetryConfig::new().with_initial_delay(100).with_max_delay(350);
        assert_eq!(config.base_delay_ms(1), 100);
        assert_eq!(config.base_delay_ms(2), 200);
        assert_eq!(config.base_delay_ms(3), 350);
        assert_eq!(config.base_delay_ms(10), 350);
    }

    #[test]
    fn test_jitter_stays_within_bounds() {
        for _ in 0..100 {
            let jittered = apply_jitter(1000);
            assert!((500..1000).contains(&jittered));
        }
    }
}
