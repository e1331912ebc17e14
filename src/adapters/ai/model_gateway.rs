//! Model Gateway - ordered model fallback chain over a single AIProvider.
//!
//! Each model identifier is tried once, most capable first. Any failure moves
//! on to the next identifier; the first success wins. Every attempt is bounded
//! by the per-attempt timeout and by what is left of the request budget, so a
//! slow chain gives up early instead of keeping a child waiting.
//!
//! # Example
//!
//! ```ignore
//! let gateway = ModelGateway::new(Arc::new(provider), GatewayConfig::default());
//! let raw = gateway.invoke(&spec).await?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::domain::explanation::PromptSpec;
use crate::ports::{AIError, AIProvider, CompletionRequest, MessageRole};

/// Timing bounds for one gateway invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Upper bound for a single model attempt.
    pub attempt_timeout: Duration,
    /// Upper bound for the whole chain.
    pub request_budget: Duration,
    /// Attempts are not started with less budget than this left.
    pub min_attempt_window: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            attempt_timeout: Duration::from_millis(6_000),
            request_budget: Duration::from_millis(15_000),
            min_attempt_window: Duration::from_millis(500),
        }
    }
}

impl GatewayConfig {
    pub fn new(attempt_timeout: Duration, request_budget: Duration) -> Self {
        Self {
            attempt_timeout,
            request_budget,
            ..Self::default()
        }
    }

    pub fn with_min_attempt_window(mut self, window: Duration) -> Self {
        self.min_attempt_window = window;
        self
    }
}

/// Everything needed to call the backend for one explanation.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInvocationSpec {
    /// Model identifiers, most capable first.
    pub models: Vec<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub system: Option<String>,
    pub user: String,
}

impl ModelInvocationSpec {
    pub fn new(
        models: Vec<String>,
        max_tokens: u32,
        temperature: f32,
        prompt: &PromptSpec,
    ) -> Self {
        Self {
            models,
            max_tokens,
            temperature,
            system: prompt.system.clone(),
            user: prompt.user.clone(),
        }
    }

    fn request_for(&self, model: &str) -> CompletionRequest {
        let request = CompletionRequest::new(model)
            .with_message(MessageRole::User, self.user.clone())
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature);
        match &self.system {
            Some(system) => request.with_system_prompt(system.clone()),
            None => request,
        }
    }
}

/// Why the gateway produced no text.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    /// Backend credential missing or rejected; no model was worth trying.
    #[error("model backend not configured: {0}")]
    NotConfigured(String),

    #[error("all {attempted} models unavailable, last error: {last_error}")]
    AllModelsUnavailable { attempted: usize, last_error: String },

    #[error("request budget exhausted after {attempted} attempts")]
    BudgetExhausted { attempted: usize },

    #[error("no models configured")]
    EmptyChain,
}

/// Runs a `ModelInvocationSpec` against the provider's fallback chain.
pub struct ModelGateway {
    provider: Arc<dyn AIProvider>,
    config: GatewayConfig,
}

impl ModelGateway {
    pub fn new(provider: Arc<dyn AIProvider>, config: GatewayConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Returns the raw text of the first model that answers.
    pub async fn invoke(&self, spec: &ModelInvocationSpec) -> Result<String, ModelError> {
        if spec.models.is_empty() {
            return Err(ModelError::EmptyChain);
        }

        let started = Instant::now();
        let mut attempted = 0;
        let mut last_error = String::new();

        for (index, model) in spec.models.iter().enumerate() {
            let remaining = self.config.request_budget.saturating_sub(started.elapsed());
            if remaining < self.config.min_attempt_window {
                warn!(
                    attempted,
                    skipped = spec.models.len() - index,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "request budget exhausted, skipping remaining models"
                );
                return Err(ModelError::BudgetExhausted { attempted });
            }

            let timeout = self.config.attempt_timeout.min(remaining);
            attempted += 1;
            debug!(model = %model, attempt = index + 1, timeout_ms = timeout.as_millis() as u64, "invoking model");

            let attempt_started = Instant::now();
            let request = spec.request_for(model);
            let outcome = tokio::time::timeout(timeout, self.provider.complete(request)).await;
            let elapsed_ms = attempt_started.elapsed().as_millis() as u64;

            let error = match outcome {
                Ok(Ok(response)) => {
                    info!(
                        model = %model,
                        attempt = index + 1,
                        elapsed_ms,
                        completion_tokens = response.usage.completion_tokens,
                        "model answered"
                    );
                    return Ok(response.content);
                }
                Ok(Err(err)) => err,
                Err(_) => AIError::timeout(timeout.as_millis() as u64),
            };

            if error.aborts_chain() {
                warn!(model = %model, error = %error, "model backend not configured, aborting chain");
                return Err(ModelError::NotConfigured(error.to_string()));
            }

            warn!(model = %model, attempt = index + 1, elapsed_ms, error = %error, "model attempt failed");
            last_error = error.to_string();
        }

        Err(ModelError::AllModelsUnavailable {
            attempted,
            last_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};

    fn spec(models: &[&str]) -> ModelInvocationSpec {
        ModelInvocationSpec {
            models: models.iter().map(|m| m.to_string()).collect(),
            max_tokens: 350,
            temperature: 0.7,
            system: Some("persona".into()),
            user: "task".into(),
        }
    }

    fn gateway(provider: &MockAIProvider, config: GatewayConfig) -> ModelGateway {
        ModelGateway::new(Arc::new(provider.clone()), config)
    }

    #[tokio::test]
    async fn first_success_wins() {
        let provider = MockAIProvider::new().with_response("{\"ok\":1}");
        let raw = gateway(&provider, GatewayConfig::default())
            .invoke(&spec(&["a", "b"]))
            .await
            .unwrap();

        assert_eq!(raw, "{\"ok\":1}");
        assert_eq!(provider.called_models(), vec!["a"]);
    }

    #[tokio::test]
    async fn failures_advance_without_retrying_same_model() {
        let provider = MockAIProvider::new()
            .with_error(MockError::Unavailable { message: "overloaded".into() })
            .with_error(MockError::ModelNotFound)
            .with_response("third");
        let raw = gateway(&provider, GatewayConfig::default())
            .invoke(&spec(&["a", "b", "c"]))
            .await
            .unwrap();

        assert_eq!(raw, "third");
        assert_eq!(provider.called_models(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn exhausted_chain_reports_all_unavailable() {
        let provider = MockAIProvider::new()
            .with_error(MockError::Network { message: "reset".into() })
            .with_error(MockError::RateLimited { retry_after_secs: 5 });
        let err = gateway(&provider, GatewayConfig::default())
            .invoke(&spec(&["a", "b"]))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ModelError::AllModelsUnavailable {
                attempted: 2,
                last_error: "rate limited: retry after 5s".into()
            }
        );
    }

    #[tokio::test]
    async fn missing_credential_aborts_immediately() {
        let provider = MockAIProvider::new().with_error(MockError::NotConfigured);
        let err = gateway(&provider, GatewayConfig::default())
            .invoke(&spec(&["a", "b"]))
            .await
            .unwrap_err();

        assert!(matches!(err, ModelError::NotConfigured(_)));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn empty_chain_is_rejected() {
        let provider = MockAIProvider::new();
        let err = gateway(&provider, GatewayConfig::default())
            .invoke(&spec(&[]))
            .await
            .unwrap_err();
        assert_eq!(err, ModelError::EmptyChain);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_model_times_out_and_next_is_tried() {
        let provider = MockAIProvider::new()
            .with_delayed_response("too late", Duration::from_secs(10))
            .with_response("fast");
        let config = GatewayConfig::new(Duration::from_secs(2), Duration::from_secs(15));
        let raw = gateway(&provider, config).invoke(&spec(&["slow", "fast"])).await.unwrap();

        assert_eq!(raw, "fast");
        assert_eq!(provider.called_models(), vec!["slow", "fast"]);
    }

    #[tokio::test(start_paused = true)]
    async fn budget_exhaustion_stops_the_chain() {
        let provider = MockAIProvider::new()
            .with_delayed_response("late", Duration::from_secs(10))
            .with_delayed_response("late", Duration::from_secs(10))
            .with_response("never reached");
        let config = GatewayConfig::new(Duration::from_secs(3), Duration::from_secs(5));
        let started = Instant::now();
        let err = gateway(&provider, config)
            .invoke(&spec(&["a", "b", "c"]))
            .await
            .unwrap_err();

        // 3s for "a", then the remaining 2s for "b", then nothing is left for "c".
        assert_eq!(err, ModelError::BudgetExhausted { attempted: 2 });
        assert_eq!(provider.called_models(), vec!["a", "b"]);
        assert!(started.elapsed() <= Duration::from_secs(5) + Duration::from_millis(50));
    }

    #[test]
    fn request_carries_prompt_and_sampling() {
        let request = spec(&["a"]).request_for("a");
        assert_eq!(request.model, "a");
        assert_eq!(request.system_prompt.as_deref(), Some("persona"));
        assert_eq!(request.messages[0].content, "task");
        assert_eq!(request.max_tokens, Some(350));
        assert_eq!(request.temperature, Some(0.7));
    }

    #[test]
    fn single_turn_prompt_has_no_system() {
        let prompt = PromptSpec {
            method: crate::domain::curriculum::TeachingMethod::StoryBased,
            verification: None,
            system: None,
            user: "all".into(),
        };
        let spec = ModelInvocationSpec::new(vec!["m".into()], 100, 0.5, &prompt);
        assert!(spec.request_for("m").system_prompt.is_none());
    }
}
