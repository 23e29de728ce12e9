//! Error types shared across the domain layer.

use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be at least {min}, got {actual}")]
    BelowMinimum { field: String, min: u32, actual: u32 },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("Field '{field}' has an invalid range: {reason}")]
    InvalidRange { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField {
            field: field.into(),
        }
    }

    /// Creates a below-minimum validation error.
    pub fn below_minimum(field: impl Into<String>, min: u32, actual: u32) -> Self {
        ValidationError::BelowMinimum {
            field: field.into(),
            min,
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

    /// Creates an invalid range validation error.
    pub fn invalid_range(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidRange {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// The field this error refers to, for per-field UI reporting.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::EmptyField { field }
            | ValidationError::BelowMinimum { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::InvalidRange { field, .. } => field,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_field_displays_field_name() {
        let err = ValidationError::empty_field("contact_email");
        assert_eq!(format!("{}", err), "Field 'contact_email' cannot be empty");
    }

    #[test]
    fn below_minimum_displays_bounds() {
        let err = ValidationError::below_minimum("unit_count", 1, 0);
        assert_eq!(
            format!("{}", err),
            "Field 'unit_count' must be at least 1, got 0"
        );
    }

    #[test]
    fn field_accessor_returns_offending_field() {
        assert_eq!(ValidationError::empty_field("travel_date").field(), "travel_date");
        assert_eq!(
            ValidationError::invalid_range("date_range", "end before start").field(),
            "date_range"
        );
    }
}
