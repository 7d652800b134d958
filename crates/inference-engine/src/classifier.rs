//! Binary Classifier Contract

use crate::InferenceError;
use feature_engine::FeatureMatrix;

/// A binary classifier over dense feature rows (labels 0 and 1)
pub trait Classifier: Send + Sync {
    /// Fit from scratch, discarding any previous state
    fn fit(&mut self, features: &FeatureMatrix, labels: &[usize]) -> Result<(), InferenceError>;

    /// Probability of class 1
    fn predict_proba(&self, sample: &[f64]) -> Result<f64, InferenceError>;

    /// Predicted label
    fn predict(&self, sample: &[f64]) -> Result<usize, InferenceError> {
        Ok(usize::from(self.predict_proba(sample)? > 0.5))
    }

    /// Human readable model name
    fn name(&self) -> &'static str;
}

/// Shared shape and label checks for `fit`
pub(crate) fn check_training_set(
    features: &FeatureMatrix,
    labels: &[usize],
) -> Result<(), InferenceError> {
    if features.is_empty() {
        return Err(InferenceError::EmptyTrainingSet);
    }
    if features.n_rows() != labels.len() {
        return Err(InferenceError::LabelCountMismatch {
            rows: features.n_rows(),
            labels: labels.len(),
        });
    }
    if let Some(&bad) = labels.iter().find(|&&l| l > 1) {
        return Err(InferenceError::InvalidLabel(bad));
    }
    Ok(())
}

/// Shape check for `predict`
pub(crate) fn check_sample(expected: usize, sample: &[f64]) -> Result<(), InferenceError> {
    if sample.len() != expected {
        return Err(InferenceError::DimensionMismatch {
            expected,
            actual: sample.len(),
        });
    }
    Ok(())
}
