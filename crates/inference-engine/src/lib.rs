//! Water Quality Inference Engine
//!
//! Trains a logistic regression and a random forest on the reference dataset
//! and grades new observations with both.

mod cache;
mod classifier;
mod forest;
mod logistic;
mod predictor;
mod tree;

pub use cache::{CacheKey, ModelCache};
pub use classifier::Classifier;
pub use forest::{ForestConfig, RandomForest, RfPrediction};
pub use logistic::{LogisticConfig, LogisticRegression};
pub use predictor::{PredictionOutcome, Predictor, PredictorConfig, TrainedModels};
pub use tree::{DecisionTree, TreeConfig};

use thiserror::Error;

/// Errors during training or inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Invalid input shape: expected {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("Training set is empty")]
    EmptyTrainingSet,
    #[error("Got {labels} labels for {rows} rows")]
    LabelCountMismatch { rows: usize, labels: usize },
    #[error("Labels must be 0 or 1, got {0}")]
    InvalidLabel(usize),
    #[error("Model used before fit")]
    NotFitted,
    #[error("Training failed: {0}")]
    TrainingFailed(String),
    #[error("Model cache error: {0}")]
    Cache(String),
    #[error(transparent)]
    Feature(#[from] feature_engine::FeatureError),
}
