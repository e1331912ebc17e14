//! Application handlers.
//!
//! Command handlers that orchestrate domain operations over ports.

pub mod explanation;

pub use explanation::{
    ContentSource, FallbackReason, GenerateExplanationCommand, GenerateExplanationHandler,
    GeneratedExplanation, GenerationSettings,
};
