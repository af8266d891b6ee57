//! Bounded retry with backoff for the model transport.
//!
//! Transport failures are retried a fixed number of times before being
//! classified fatal and propagated to the caller. Quota responses carrying a
//! provider-suggested wait are honored over the computed backoff.

use crate::cancel::CancelToken;
use reagent_core::{Completion, CompletionRequest, ModelClient, ModelError};
use std::time::Duration;

/// Retry policy for [`ModelClient::complete`] calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Minimum 1.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles each subsequent retry.
    pub base_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// No retries: a single attempt only.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Backoff delay before retry number `retry` (zero-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry);
        self.base_delay
            .saturating_mul(factor)
            .min(self.max_delay)
    }
}

/// Call the model, retrying retryable transport errors with backoff.
///
/// Returns the last error once attempts are exhausted, a non-retryable
/// error occurs, or cancellation is requested while waiting.
pub fn complete_with_retry(
    client: &dyn ModelClient,
    request: &CompletionRequest,
    policy: &RetryPolicy,
    cancel: &CancelToken,
) -> Result<Completion, ModelError> {
    let attempts = policy.max_attempts.max(1);
    let mut retry = 0;
    loop {
        match client.complete(request) {
            Ok(completion) => return Ok(completion),
            Err(err) if err.is_retryable() && retry + 1 < attempts && !cancel.is_cancelled() => {
                let delay = match &err {
                    ModelError::QuotaExceeded {
                        retry_after: Some(wait),
                    } => (*wait).min(policy.max_delay),
                    _ => policy.delay_for(retry),
                };
                tracing::warn!(
                    attempt = retry + 1,
                    max_attempts = attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "model call failed, retrying"
                );
                std::thread::sleep(delay);
                retry += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Fails `failures` times, then succeeds.
    struct FlakyClient {
        failures: Mutex<u32>,
    }

    impl ModelClient for FlakyClient {
        fn complete(&self, _request: &CompletionRequest) -> Result<Completion, ModelError> {
            let mut remaining = self.failures.lock().unwrap();
            if *remaining > 0 {
                *remaining -= 1;
                Err(ModelError::Unavailable {
                    reason: "503".to_string(),
                })
            } else {
                Ok(Completion::new("Final Answer: ok"))
            }
        }
    }

    /// Rate-limits the first call with a wait hint, then succeeds.
    struct ThrottlingClient {
        throttled: Mutex<bool>,
        retry_after: Duration,
    }

    impl ModelClient for ThrottlingClient {
        fn complete(&self, _request: &CompletionRequest) -> Result<Completion, ModelError> {
            let mut throttled = self.throttled.lock().unwrap();
            if *throttled {
                *throttled = false;
                Err(ModelError::QuotaExceeded {
                    retry_after: Some(self.retry_after),
                })
            } else {
                Ok(Completion::new("Final Answer: ok"))
            }
        }
    }

    struct RejectingClient;

    impl ModelClient for RejectingClient {
        fn complete(&self, _request: &CompletionRequest) -> Result<Completion, ModelError> {
            Err(ModelError::InvalidCredentials)
        }
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            system_instructions: String::new(),
            tool_catalog: String::new(),
            transcript_text: String::new(),
        }
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
        }
    }

    #[test]
    fn recovers_within_attempt_budget() {
        let client = FlakyClient {
            failures: Mutex::new(2),
        };
        let result =
            complete_with_retry(&client, &request(), &fast_policy(), &CancelToken::new());
        assert_eq!(result.unwrap().text, "Final Answer: ok");
    }

    #[test]
    fn exhausts_attempts_and_returns_last_error() {
        let client = FlakyClient {
            failures: Mutex::new(10),
        };
        let result =
            complete_with_retry(&client, &request(), &fast_policy(), &CancelToken::new());
        assert!(matches!(result, Err(ModelError::Unavailable { .. })));
    }

    #[test]
    fn quota_hint_overrides_the_computed_backoff() {
        // Backoff would wait seconds; the provider hint says 1ms.
        let policy = RetryPolicy {
            max_attempts: 2,
            base_delay: Duration::from_secs(5),
            max_delay: Duration::from_secs(5),
        };
        let client = ThrottlingClient {
            throttled: Mutex::new(true),
            retry_after: Duration::from_millis(1),
        };

        let started = std::time::Instant::now();
        let result = complete_with_retry(&client, &request(), &policy, &CancelToken::new());

        assert_eq!(result.unwrap().text, "Final Answer: ok");
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn quota_hint_is_capped_at_max_delay() {
        let policy = RetryPolicy {
            max_attempts: 2,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
        };
        let client = ThrottlingClient {
            throttled: Mutex::new(true),
            retry_after: Duration::from_secs(3600),
        };

        let started = std::time::Instant::now();
        let result = complete_with_retry(&client, &request(), &policy, &CancelToken::new());

        assert_eq!(result.unwrap().text, "Final Answer: ok");
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn non_retryable_error_fails_immediately() {
        let result = complete_with_retry(
            &RejectingClient,
            &request(),
            &fast_policy(),
            &CancelToken::new(),
        );
        assert!(matches!(result, Err(ModelError::InvalidCredentials)));
    }

    #[test]
    fn cancellation_stops_retrying() {
        let client = FlakyClient {
            failures: Mutex::new(10),
        };
        let cancel = CancelToken::new();
        cancel.cancel();
        let result = complete_with_retry(&client, &request(), &fast_policy(), &cancel);
        assert!(result.is_err());
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 5,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(350),
        };
        assert_eq!(policy.delay_for(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for(2), Duration::from_millis(350));
        assert_eq!(policy.delay_for(10), Duration::from_millis(350));
    }
}
