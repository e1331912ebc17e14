//! Curriculum module - what is being taught and in which order.
//!
//! - `topic_rule` - keyword-matched pedagogical constraints per topic
//! - `stage` - the five-step lesson progression
//! - `method` - the rotating teaching framings and question styles

mod method;
mod stage;
mod topic_rule;

pub use method::{TeachingMethod, VerificationType};
pub use stage::{Stage, StageContext, StageProgress};
pub use topic_rule::{Resolution, TopicRule, TopicRuleRegistry, DEFAULT_MAX_NUMBER};
