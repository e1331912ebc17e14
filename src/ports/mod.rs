//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - one completion from a hosted language model
//! - `RateLimiter` - per-client daily request quota

mod ai_provider;
mod rate_limiter;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, TokenUsage,
};
pub use rate_limiter::{
    RateLimitError, RateLimitKey, RateLimitResult, RateLimitStatus, RateLimiter,
    ANONYMOUS_CLIENT,
};
