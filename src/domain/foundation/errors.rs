//! Error types for the domain layer.

use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: i64,
        max: i64,
        actual: i64,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: i64, max: i64, actual: i64) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_displays_bounds() {
        let err = ValidationError::out_of_range("stage", 1, 5, 7);
        assert_eq!(err.to_string(), "Field 'stage' must be between 1 and 5, got 7");
    }

    #[test]
    fn invalid_format_displays_reason() {
        let err = ValidationError::invalid_format("grade", "expected 1-2, 3-4 or 5-6");
        assert_eq!(
            err.to_string(),
            "Field 'grade' has invalid format: expected 1-2, 3-4 or 5-6"
        );
    }
}
