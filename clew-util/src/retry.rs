//! Pure backoff calculation plus a small retry driver, used by callers of
//! the semantic collaborator.
//!
//! `calculate_backoff` itself never sleeps; `with_retry` is the only place
//! in this crate that suspends, and only via `tokio::time::sleep`.

use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Tunables for exponential backoff with optional jitter.
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_backoff_ms: u32,
    pub max_backoff_ms: u32,
    pub multiplier: f64,
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 100,
            max_backoff_ms: 10_000,
            multiplier: 2.0,
            jitter: true,
        }
    }
}

/// Computes the exponential backoff for `attempt` (1-based), capped at
/// `max_backoff_ms`. With `jitter` enabled, the result is drawn uniformly
/// from `[capped / 2, capped]`; an `attempt` of 0 is treated as 1.
pub fn calculate_backoff(config: &RetryConfig, attempt: u32) -> u32 {
    calculate_backoff_with_rng(config, attempt, &mut rand::thread_rng())
}

/// Same as [`calculate_backoff`] but with an injectable RNG, for
/// deterministic property tests.
pub fn calculate_backoff_with_rng<R: Rng>(config: &RetryConfig, attempt: u32, rng: &mut R) -> u32 {
    let attempt = attempt.max(1);
    let raw = config.initial_backoff_ms as f64 * config.multiplier.powi((attempt - 1) as i32);
    let capped = raw.min(config.max_backoff_ms as f64).max(0.0) as u32;

    if !config.jitter {
        return capped;
    }
    let floor = capped / 2;
    if capped <= floor {
        return capped;
    }
    rng.gen_range(floor..=capped)
}

/// Transient-failure classification contract implemented by a caller's own
/// error type (e.g. the semantic collaborator's HTTP error).
pub trait RetryableError {
    /// True for connection resets, DNS failures, timeouts, and the like.
    fn is_network_error(&self) -> bool {
        false
    }
    /// The HTTP status code this error carries, if any.
    fn status_code(&self) -> Option<u16> {
        None
    }
}

/// Classifies a status code as transient: `408`, `429`, or any `5xx`.
pub fn is_retryable_status(code: u16) -> bool {
    code == 408 || code == 429 || (500..=599).contains(&code)
}

/// Classifies an error as transient via [`RetryableError`]: network-level
/// failures are always retryable, HTTP failures follow
/// [`is_retryable_status`].
pub fn is_retryable_error<E: RetryableError>(err: &E) -> bool {
    if err.is_network_error() {
        return true;
    }
    err.status_code().is_some_and(is_retryable_status)
}

/// Reruns `f` until it succeeds or `config.max_retries` attempts are
/// exhausted, sleeping `calculate_backoff`-derived durations between
/// attempts for errors classified as retryable by `E`.
pub async fn with_retry<F, Fut, T, E>(config: &RetryConfig, mut f: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: RetryableError,
{
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match f().await {
            Ok(v) => return Ok(v),
            Err(e) => {
                let retryable = is_retryable_error(&e);
                if !retryable || attempt > config.max_retries {
                    warn!(attempt, retryable, "giving up after retry exhaustion");
                    return Err(e);
                }
                let backoff_ms = calculate_backoff(config, attempt);
                debug!(attempt, backoff_ms, "retrying after backoff");
                tokio::time::sleep(Duration::from_millis(backoff_ms as u64)).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::RngCore;

    /// Deterministic linear-congruential RNG, used only so backoff-jitter
    /// tests don't depend on `rand`'s mock-RNG feature flags.
    struct StepRng(u64);
    impl RngCore for StepRng {
        fn next_u32(&mut self) -> u32 {
            self.next_u64() as u32
        }
        fn next_u64(&mut self) -> u64 {
            self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
            self.0
        }
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for chunk in dest.chunks_mut(8) {
                let bytes = self.next_u64().to_le_bytes();
                chunk.copy_from_slice(&bytes[..chunk.len()]);
            }
        }
        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    struct FlakyError {
        status: Option<u16>,
    }
    impl RetryableError for FlakyError {
        fn status_code(&self) -> Option<u16> {
            self.status
        }
    }

    #[test]
    fn backoff_is_monotone_then_constant_without_jitter() {
        let cfg = RetryConfig {
            max_retries: 10,
            initial_backoff_ms: 1,
            max_backoff_ms: 8,
            multiplier: 2.0,
            jitter: false,
        };
        let mut rng = StepRng(1);
        let values: Vec<u32> = (1..=6)
            .map(|a| calculate_backoff_with_rng(&cfg, a, &mut rng))
            .collect();
        assert_eq!(values, vec![1, 2, 4, 8, 8, 8]);
    }

    #[test]
    fn backoff_with_jitter_stays_in_half_to_full_range() {
        let cfg = RetryConfig {
            max_retries: 10,
            initial_backoff_ms: 100,
            max_backoff_ms: 100,
            multiplier: 2.0,
            jitter: true,
        };
        let mut rng = StepRng(1);
        for attempt in 1..=5 {
            let v = calculate_backoff_with_rng(&cfg, attempt, &mut rng);
            assert!(v >= 50 && v <= 100, "v={v}");
        }
    }

    #[test]
    fn status_classification_matches_spec() {
        assert!(is_retryable_status(429));
        assert!(is_retryable_status(500));
        assert!(is_retryable_status(503));
        assert!(is_retryable_status(408));
        assert!(!is_retryable_status(404));
        assert!(!is_retryable_status(400));
    }

    #[tokio::test]
    async fn with_retry_succeeds_on_third_attempt() {
        let cfg = RetryConfig {
            max_retries: 3,
            initial_backoff_ms: 1,
            max_backoff_ms: 2,
            multiplier: 2.0,
            jitter: false,
        };
        let mut calls = 0u32;
        let result: Result<u32, FlakyError> = with_retry(&cfg, || {
            calls += 1;
            let this_call = calls;
            async move {
                if this_call < 3 {
                    Err(FlakyError { status: Some(500) })
                } else {
                    Ok(42)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn with_retry_stops_on_non_retryable_error() {
        let cfg = RetryConfig::default();
        let mut calls = 0u32;
        let result: Result<u32, FlakyError> = with_retry(&cfg, || {
            calls += 1;
            async move { Err(FlakyError { status: Some(404) }) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    proptest! {
        #[test]
        fn backoff_without_jitter_is_nondecreasing_and_capped(
            initial in 1u32..1000,
            max in 1u32..10_000,
            attempt in 1u32..20,
        ) {
            let cfg = RetryConfig {
                max_retries: 10,
                initial_backoff_ms: initial,
                max_backoff_ms: max,
                multiplier: 2.0,
                jitter: false,
            };
            let mut rng = StepRng(1);
            let prev = calculate_backoff_with_rng(&cfg, attempt.saturating_sub(1).max(1), &mut rng);
            let this = calculate_backoff_with_rng(&cfg, attempt, &mut rng);
            prop_assert!(this <= max);
            prop_assert!(this >= prev || attempt <= 1);
        }

        #[test]
        fn backoff_with_jitter_stays_in_half_to_full_capped_range(
            initial in 1u32..1000,
            max in 1u32..10_000,
            attempt in 1u32..20,
            seed in any::<u64>(),
        ) {
            let cfg = RetryConfig {
                max_retries: 10,
                initial_backoff_ms: initial,
                max_backoff_ms: max,
                multiplier: 2.0,
                jitter: true,
            };
            let mut rng = StepRng(seed | 1);
            let raw = initial as f64 * 2f64.powi((attempt.max(1) - 1) as i32);
            let capped = raw.min(max as f64).max(0.0) as u32;
            let v = calculate_backoff_with_rng(&cfg, attempt, &mut rng);
            prop_assert!(v <= capped);
            prop_assert!(v >= capped / 2);
        }
    }
}
