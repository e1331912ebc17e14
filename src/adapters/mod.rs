//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - model backends and the model fallback gateway
//! - `rate_limiter` - daily request quota storage
//! - `http` - axum REST surface

pub mod ai;
pub mod http;
pub mod rate_limiter;
