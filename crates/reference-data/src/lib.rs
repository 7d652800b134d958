//! Reference Dataset Loading
//!
//! Reads the labeled reference table (`processed_data.csv`) from the local
//! filesystem or an operator upload, selecting feature columns by name.

mod dataset;
mod loader;

pub use dataset::{ReferenceDataset, LABEL_COLUMN};
pub use loader::{DatasetLoader, DatasetSource, LoaderConfig, Upload, DEFAULT_DATASET_PATH};

use thiserror::Error;

/// Errors while obtaining or parsing the reference dataset
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Neither the local file nor an upload is available
    #[error("File '{path}' tidak ditemukan. Silakan upload file untuk melanjutkan.")]
    Missing { path: String },

    #[error("Dataset has no '{0}' label column")]
    MissingLabel(&'static str),

    /// Feature columns do not match the observation fields
    #[error("Dataset columns do not match observation fields (missing: [{}], extra: [{}])", .missing.join(", "), .extra.join(", "))]
    SchemaMismatch {
        missing: Vec<String>,
        extra: Vec<String>,
    },

    #[error("Column '{0}' appears more than once")]
    DuplicateColumn(String),

    #[error("Row {row}: invalid value {value:?} in column '{column}'")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Row {row}: Grade must be 0 or 1, got {value:?}")]
    InvalidLabel { row: usize, value: String },

    #[error("Dataset contains no rows")]
    Empty,

    #[error("Upload of {size} bytes exceeds limit of {limit} bytes")]
    TooLarge { size: usize, limit: usize },

    #[error("Feature error: {0}")]
    Feature(#[from] feature_engine::FeatureError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DatasetError {
    /// Whether the error is a schema problem (as opposed to availability or I/O)
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            DatasetError::MissingLabel(_)
                | DatasetError::SchemaMismatch { .. }
                | DatasetError::DuplicateColumn(_)
        )
    }
}
