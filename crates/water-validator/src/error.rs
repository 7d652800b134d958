//! Validation Error Types

use thiserror::Error;

/// Errors during observation validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Value out of allowed range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// NaN or infinite input
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    /// Categorical value outside its choice set
    #[error("{field} must be 0 or 1, got {value}")]
    InvalidChoice { field: &'static str, value: String },

    /// Fractional value for an integer field
    #[error("{field} must be a whole number, got {value}")]
    NotInteger { field: &'static str, value: String },

    /// Text that does not parse as a number
    #[error("Invalid number for {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    /// Field name not part of the observation
    #[error("Unknown field: {0}")]
    UnknownField(String),
}
