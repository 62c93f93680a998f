//! Error types for annotation validation.

use crate::models::AnnotationType;
use thiserror::Error;

/// Result type alias using plotmark's validation error.
pub type Result<T> = std::result::Result<T, ValidationError>;

/// A single field failed validation.
///
/// Every variant names the offending field so callers can render
/// actionable feedback per record.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Required field is absent or blank
    #[error("Missing required field: {field}")]
    Missing { field: &'static str },

    /// Field is present but malformed
    #[error("Invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    /// Numeric field outside its permitted range
    #[error("{field} out of range: {value} is not within [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Geometry has fewer coordinate pairs than its type requires
    #[error(
        "insufficient points: {annotation_type} requires minimum {required} coordinate pairs, got {actual}"
    )]
    InsufficientPoints {
        annotation_type: AnnotationType,
        required: usize,
        actual: usize,
    },
}

impl ValidationError {
    pub fn missing(field: &'static str) -> Self {
        Self::Missing { field }
    }

    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the field that failed.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Missing { field } | Self::Invalid { field, .. } | Self::OutOfRange { field, .. } => {
                field
            }
            Self::InsufficientPoints { .. } => "geometry",
        }
    }
}
