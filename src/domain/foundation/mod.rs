//! Foundation module - Shared domain primitives.
//!
//! Contains the validation error type that value objects across the Captain
//! Click domain report.

mod errors;

pub use errors::ValidationError;
