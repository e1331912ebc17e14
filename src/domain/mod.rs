//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (validation errors, state machine trait)
//! - `learner` - Child profile and its defaults
//! - `curriculum` - Topic rules, pedagogical stages and teaching methods
//! - `explanation` - Prompt composition, response parsing, validation and fallback

pub mod curriculum;
pub mod explanation;
pub mod foundation;
pub mod learner;
