//! Learner module - who the explanation is for.
//!
//! The learner profile is request-scoped: the UI stores it between calls and
//! sends it fresh with every request. Nothing here is persisted.

mod profile;

pub use profile::{Gender, GradeBand, LearnerProfile, DEFAULT_INTERESTS, DEFAULT_LEARNER_NAME};
