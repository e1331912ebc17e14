//! Explanation module - the guarded content itself.
//!
//! - `result` - the display-ready explanation or question
//! - `prompt` - turns learner, topic rule and stage into a generation prompt
//! - `parser` - pulls the JSON object out of raw model output
//! - `validator` - gates content against the active topic rule
//! - `fallback` - static, rule-satisfying substitutes
//! - `text_direction` - left-to-right isolation for mixed Hebrew/Latin text

mod fallback;
mod parser;
mod prompt;
mod result;
pub mod text_direction;
mod validator;

pub use fallback::{FallbackProvider, GENERIC_LEARNER_TITLE, GENERIC_TOPIC_PHRASE};
pub use parser::{ParseError, ResponseParser, MAX_RESPONSE_LENGTH};
pub use prompt::{PromptComposer, PromptShape, PromptSpec, PERSONA_NAME};
pub use result::{ExplanationResult, ResultBody};
pub use validator::{ContentValidator, ContentViolation, MATH_DELIMITERS};
