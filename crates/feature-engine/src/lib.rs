//! Feature Engineering Engine
//!
//! Provides the dense feature matrix, per-column statistics, and the
//! standard scaler that feeds the classifiers.

mod matrix;
mod scaler;
mod statistics;

pub use matrix::FeatureMatrix;
pub use scaler::StandardScaler;
pub use statistics::ColumnStatistics;

use thiserror::Error;

/// Errors during feature processing
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    #[error("Row {row} has {actual} values, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("Invalid feature dimension: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("Cannot fit on an empty feature matrix")]
    Empty,
}
