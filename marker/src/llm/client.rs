//! # LLM Client
//!
//! [`LlmClient`] wraps a [`LanguageModel`] with the call policy of the marker:
//!
//! - every call is bounded by a timeout (default 30 s) and fails with
//!   [`MarkerError::LlmTimeout`] when exceeded;
//! - failed calls are retried only as the injected [`RetryPolicy`] allows (default: never).
//!
//! It also exposes the task helpers used by the grader and the API.

use crate::error::MarkerError;
use crate::llm::model::{GenerateOptions, LanguageModel};
use crate::llm::ollama::OllamaModel;
use crate::llm::prompts;
use crate::llm::retry::RetryPolicy;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use util::config::LlmSettings;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct LlmClient {
    model: Arc<dyn LanguageModel>,
    timeout: Duration,
    retry: RetryPolicy,
    options: GenerateOptions,
}

impl LlmClient {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self {
            model,
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::none(),
            options: GenerateOptions::default(),
        }
    }

    /// Builds a client for the HTTP generate endpoint described by `settings`.
    pub fn from_settings(settings: &LlmSettings) -> Self {
        let model = OllamaModel::new(&settings.base_url, settings.model.clone());
        Self::new(Arc::new(model))
            .with_timeout(settings.timeout)
            .with_retry_policy(RetryPolicy::linear(
                settings.max_attempts,
                settings.retry_backoff,
            ))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Options sent with every helper call.
    pub fn with_options(mut self, options: GenerateOptions) -> Self {
        self.options = options;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Issues one generate request (plus any retries the policy allows).
    pub async fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<String, MarkerError> {
        let max_attempts = self.retry.max_attempts();
        let mut attempt = 1;
        loop {
            let outcome = tokio::time::timeout(self.timeout, self.model.generate(prompt, options))
                .await
                .unwrap_or(Err(MarkerError::LlmTimeout(self.timeout)));

            let err = match outcome {
                Ok(text) => {
                    debug!(attempt, chars = text.len(), "model call succeeded");
                    return Ok(text);
                }
                Err(err) => err,
            };

            if !err.is_retryable() || attempt >= max_attempts {
                return Err(err);
            }

            let delay = self.retry.delay(attempt);
            warn!(attempt, max_attempts, ?delay, error = %err, "model call failed, retrying");
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// Free-text critique of an SQL query.
    pub async fn analyze_sql(&self, query: &str) -> Result<String, MarkerError> {
        self.generate(&prompts::sql_analysis(query), &self.options)
            .await
    }

    /// Free-text comparison of a student solution with one model solution.
    ///
    /// By convention the answer contains a grade out of 20, see
    /// [`crate::parsers::grade_parser`].
    pub async fn compare_solutions(
        &self,
        student: &str,
        model: &str,
    ) -> Result<String, MarkerError> {
        self.generate(&prompts::solution_comparison(student, model), &self.options)
            .await
    }

    /// Structured feedback text for the student.
    pub async fn generate_feedback(
        &self,
        solution: &str,
        model: &str,
    ) -> Result<String, MarkerError> {
        self.generate(&prompts::feedback(solution, model), &self.options)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fails with `error` for the first `failures` calls, then answers "ok".
    struct Flaky {
        failures: usize,
        error: MarkerError,
        calls: AtomicUsize,
    }

    impl Flaky {
        fn new(failures: usize, error: MarkerError) -> Arc<Self> {
            Arc::new(Self {
                failures,
                error,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl LanguageModel for Flaky {
        async fn generate(&self, _: &str, _: &GenerateOptions) -> Result<String, MarkerError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(self.error.clone())
            } else {
                Ok("ok".into())
            }
        }
    }

    struct Slow;

    #[async_trait]
    impl LanguageModel for Slow {
        async fn generate(&self, _: &str, _: &GenerateOptions) -> Result<String, MarkerError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("too late".into())
        }
    }

    fn unavailable() -> MarkerError {
        MarkerError::LlmUnavailable("connection refused".into())
    }

    #[tokio::test]
    async fn no_retry_by_default() {
        let model = Flaky::new(1, unavailable());
        let client = LlmClient::new(model.clone());
        let err = client.generate("p", &GenerateOptions::new()).await.unwrap_err();
        assert_eq!(err, unavailable());
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_until_success() {
        let model = Flaky::new(2, unavailable());
        let client = LlmClient::new(model.clone())
            .with_retry_policy(RetryPolicy::linear(3, Duration::from_millis(1)));
        let text = client.generate("p", &GenerateOptions::new()).await.unwrap();
        assert_eq!(text, "ok");
        assert_eq!(model.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let model = Flaky::new(10, unavailable());
        let client = LlmClient::new(model.clone())
            .with_retry_policy(RetryPolicy::linear(2, Duration::from_millis(1)));
        assert!(client.generate("p", &GenerateOptions::new()).await.is_err());
        assert_eq!(model.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn non_retryable_errors_are_not_retried() {
        let model = Flaky::new(1, MarkerError::NoModelSolution);
        let client = LlmClient::new(model.clone())
            .with_retry_policy(RetryPolicy::linear(5, Duration::from_millis(1)));
        assert!(client.generate("p", &GenerateOptions::new()).await.is_err());
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn slow_calls_time_out() {
        let client = LlmClient::new(Arc::new(Slow)).with_timeout(Duration::from_millis(50));
        let err = client.analyze_sql("SELECT 1").await.unwrap_err();
        assert_eq!(err, MarkerError::LlmTimeout(Duration::from_millis(50)));
    }

    #[test]
    fn settings_configure_timeout() {
        let settings = LlmSettings {
            timeout: Duration::from_secs(7),
            ..LlmSettings::default()
        };
        assert_eq!(LlmClient::from_settings(&settings).timeout(), Duration::from_secs(7));
    }
}
