//! AI Provider Adapters.
//!
//! - `AnthropicProvider` - Anthropic Messages API
//! - `OpenAIProvider` - OpenAI-compatible chat completions
//! - `MockAIProvider` - Configurable mock for testing
//! - `ModelGateway` - ordered model fallback chain with a request budget

mod anthropic_provider;
mod mock_provider;
mod model_gateway;
mod openai_provider;

pub use anthropic_provider::{AnthropicConfig, AnthropicProvider};
pub use mock_provider::{MockAIProvider, MockError, MockResponse};
pub use model_gateway::{GatewayConfig, ModelError, ModelGateway, ModelInvocationSpec};
pub use openai_provider::{OpenAIConfig, OpenAIProvider};
