//! Explanation handlers.

mod generate_explanation;

pub use generate_explanation::{
    ContentSource, FallbackReason, GenerateExplanationCommand, GenerateExplanationHandler,
    GeneratedExplanation, GenerationSettings,
};
