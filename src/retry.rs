//! Retry with randomized exponential backoff.
//!
//! All three remote services (embedding, completion, search) are called
//! synchronously; transient failures are retried here with jittered
//! delays so concurrent callers do not hammer a recovering provider in
//! lockstep.

use std::time::Duration;

use rand::Rng;

/// Configuration for retry behavior with exponential backoff.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial attempt).
    pub max_attempts: u32,
    /// Initial delay between retries.
    pub initial_delay: Duration,
    /// Maximum delay cap.
    pub max_delay: Duration,
    /// Multiplier for exponential backoff (2.0 doubles delay each retry).
    pub backoff_multiplier: f64,
    /// Jitter factor (0.0-1.0) applied symmetrically around the delay.
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
            jitter_factor: 0.2,
        }
    }
}

impl RetryConfig {
    /// Config for pure embedding calls, which tolerate a longer budget
    /// before the deterministic fallback takes over.
    pub fn embedding() -> Self {
        Self {
            max_attempts: 6,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
            jitter_factor: 0.2,
        }
    }

    /// Config for completion calls embedded in the authoring pipeline;
    /// fewer attempts because the caller is interactive.
    pub fn completion() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(5),
            backoff_multiplier: 2.0,
            jitter_factor: 0.2,
        }
    }

    /// Calculate the delay for a given attempt number (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base_delay =
            self.initial_delay.as_secs_f64() * self.backoff_multiplier.powi(attempt as i32);
        let capped_delay = base_delay.min(self.max_delay.as_secs_f64());

        let jitter = if self.jitter_factor > 0.0 {
            let jitter_range = capped_delay * self.jitter_factor;
            let offset: f64 = rand::rng().random_range(-1.0..=1.0);
            jitter_range * offset
        } else {
            0.0
        };

        Duration::from_secs_f64((capped_delay + jitter).max(0.0))
    }
}

/// Execute a fallible operation with retry logic, with a condition for
/// retrying. Non-retryable errors (validation, config) return
/// immediately regardless of remaining attempts.
pub fn with_retry_if<T, E, F, C>(
    config: &RetryConfig,
    mut operation: F,
    should_retry: C,
) -> std::result::Result<T, E>
where
    F: FnMut() -> std::result::Result<T, E>,
    C: Fn(&E) -> bool,
{
    let attempts = config.max_attempts.max(1);
    let mut last_error = None;

    for attempt in 0..attempts {
        match operation() {
            Ok(value) => return Ok(value),
            Err(e) => {
                if !should_retry(&e) || attempt + 1 >= attempts {
                    return Err(e);
                }
                last_error = Some(e);
                let delay = config.delay_for_attempt(attempt);
                std::thread::sleep(delay);
            }
        }
    }

    Err(last_error.expect("at least one attempt should have been made"))
}
