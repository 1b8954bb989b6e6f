//! Bounded retry with exponential backoff.
//!
//! One generic utility shared by every call site that retries: the initial
//! page fetch uses it with a doubling schedule, while the per-date submission
//! loop in the orchestrator applies its own attempt budget on top of
//! classified outcomes rather than errors.

use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// A bounded exponential backoff schedule.
///
/// Attempt `n` (1-based) that fails sleeps `base * 2^(n-1)` before the next
/// try, so a base of 2 seconds yields delays of 2, 4, 8, 16, ... seconds.
#[derive(Debug, Clone, Copy)]
pub struct BackoffSchedule {
    /// Delay after the first failed attempt.
    pub base_delay: Duration,
    /// Total attempts allowed, including the first.
    pub max_attempts: u32,
}

impl BackoffSchedule {
    /// Doubling schedule starting at `base_secs` with `max_attempts` tries.
    pub fn exponential(base_secs: u64, max_attempts: u32) -> Self {
        Self {
            base_delay: Duration::from_secs(base_secs),
            max_attempts,
        }
    }

    /// Delay to sleep after the given 1-based attempt fails.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32 << (attempt.saturating_sub(1)).min(16);
        self.base_delay.saturating_mul(factor)
    }
}

/// Run `op` until it succeeds, the schedule is exhausted, or an error the
/// predicate deems non-retryable occurs. The last error is returned as-is;
/// callers map exhaustion to their own terminal error.
pub async fn with_backoff<T, E, F, Fut, P>(
    schedule: BackoffSchedule,
    is_retryable: P,
    mut op: F,
) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < schedule.max_attempts && is_retryable(&e) => {
                let delay = schedule.delay_for(attempt);
                warn!(
                    attempt = attempt,
                    max_attempts = schedule.max_attempts,
                    delay_secs = delay.as_secs(),
                    error = %e,
                    "Attempt failed, backing off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
