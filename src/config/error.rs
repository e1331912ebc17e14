//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Model chain is empty")]
    EmptyModelChain,

    #[error("Timeout must be positive: {0}")]
    ZeroTimeout(&'static str),

    #[error("Request budget ({budget_ms}ms) is shorter than one attempt ({attempt_ms}ms)")]
    BudgetShorterThanAttempt { budget_ms: u64, attempt_ms: u64 },

    #[error("Temperature must be within 0..=1")]
    InvalidTemperature,

    #[error("max_tokens must be positive")]
    InvalidMaxTokens,

    #[error("Probability must be within 0..=1: {0}")]
    InvalidProbability(&'static str),
}
