//! AI provider configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// AI provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Backend used for every model in the chain
    #[serde(default)]
    pub provider: AiProvider,

    /// Anthropic API key; falls back to `ANTHROPIC_API_KEY`
    pub anthropic_api_key: Option<String>,

    /// OpenAI API key; falls back to `OPENAI_API_KEY`
    pub openai_api_key: Option<String>,

    #[serde(default = "default_anthropic_base_url")]
    pub anthropic_base_url: String,

    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,

    /// Model identifiers, comma-separated, most capable first
    #[serde(default = "default_models")]
    pub models: String,

    /// Upper bound for one model attempt
    #[serde(default = "default_attempt_timeout")]
    pub attempt_timeout_ms: u64,

    /// Upper bound for the whole chain
    #[serde(default = "default_request_budget")]
    pub request_budget_ms: u64,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

/// AI provider type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    #[default]
    Anthropic,
    OpenAI,
}

impl AiConfig {
    /// Ordered model chain, blanks removed
    pub fn model_chain(&self) -> Vec<String> {
        self.models
            .split(',')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_millis(self.attempt_timeout_ms)
    }

    pub fn request_budget(&self) -> Duration {
        Duration::from_millis(self.request_budget_ms)
    }

    /// Anthropic key from config or the conventional environment variable
    pub fn anthropic_key(&self) -> Option<String> {
        non_blank(self.anthropic_api_key.clone())
            .or_else(|| non_blank(std::env::var("ANTHROPIC_API_KEY").ok()))
    }

    /// OpenAI key from config or the conventional environment variable
    pub fn openai_key(&self) -> Option<String> {
        non_blank(self.openai_api_key.clone())
            .or_else(|| non_blank(std::env::var("OPENAI_API_KEY").ok()))
    }

    /// Key for the selected provider, if any
    pub fn active_key(&self) -> Option<String> {
        match self.provider {
            AiProvider::Anthropic => self.anthropic_key(),
            AiProvider::OpenAI => self.openai_key(),
        }
    }

    /// Validate AI configuration
    ///
    /// A missing key is not an error: requests are served from fallback content.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.model_chain().is_empty() {
            return Err(ValidationError::EmptyModelChain);
        }
        if self.attempt_timeout_ms == 0 {
            return Err(ValidationError::ZeroTimeout("attempt_timeout_ms"));
        }
        if self.request_budget_ms == 0 {
            return Err(ValidationError::ZeroTimeout("request_budget_ms"));
        }
        if self.request_budget_ms < self.attempt_timeout_ms {
            return Err(ValidationError::BudgetShorterThanAttempt {
                budget_ms: self.request_budget_ms,
                attempt_ms: self.attempt_timeout_ms,
            });
        }
        if self.max_tokens == 0 {
            return Err(ValidationError::InvalidMaxTokens);
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidTemperature);
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: AiProvider::default(),
            anthropic_api_key: None,
            openai_api_key: None,
            anthropic_base_url: default_anthropic_base_url(),
            openai_base_url: default_openai_base_url(),
            models: default_models(),
            attempt_timeout_ms: default_attempt_timeout(),
            request_budget_ms: default_request_budget(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn default_anthropic_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_models() -> String {
    "claude-3-5-sonnet-20241022,claude-3-5-haiku-20241022".to_string()
}

fn default_attempt_timeout() -> u64 {
    6_000
}

fn default_request_budget() -> u64 {
    15_000
}

fn default_max_tokens() -> u32 {
    350
}

fn default_temperature() -> f32 {
    0.7
}
