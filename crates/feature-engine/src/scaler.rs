//! Standard Scaler (zero mean, unit variance per feature)

use crate::matrix::FeatureMatrix;
use crate::statistics::ColumnStatistics;
use crate::FeatureError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Per-feature z-score scaler.
///
/// Statistics come only from the matrix passed to [`fit`](Self::fit);
/// transforming new samples never updates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    means: Vec<f64>,
    variances: Vec<f64>,
    /// Divisor per feature; 1.0 for constant features
    scales: Vec<f64>,
    n_samples: usize,
}

impl StandardScaler {
    /// Fit per-column mean and population variance
    pub fn fit(features: &FeatureMatrix) -> Result<Self, FeatureError> {
        if features.is_empty() {
            return Err(FeatureError::Empty);
        }

        let stats: Vec<ColumnStatistics> = (0..features.n_cols())
            .map(|col| ColumnStatistics::compute(features.column(col)))
            .collect();

        let means = stats.iter().map(|s| s.mean).collect();
        let variances: Vec<f64> = stats.iter().map(|s| s.variance).collect();
        let scales = stats
            .iter()
            .map(|s| if s.std_dev < f64::EPSILON { 1.0 } else { s.std_dev })
            .collect();

        debug!(
            "Fitted scaler on {} samples x {} features",
            features.n_rows(),
            features.n_cols()
        );

        Ok(Self {
            means,
            variances,
            scales,
            n_samples: features.n_rows(),
        })
    }

    /// Fit and transform the same matrix
    pub fn fit_transform(features: &FeatureMatrix) -> Result<(Self, FeatureMatrix), FeatureError> {
        let scaler = Self::fit(features)?;
        let scaled = scaler.transform(features)?;
        Ok((scaler, scaled))
    }

    /// Scale every row of a matrix
    pub fn transform(&self, features: &FeatureMatrix) -> Result<FeatureMatrix, FeatureError> {
        let mut scaled = FeatureMatrix::with_columns(self.n_features());
        for row in features.rows() {
            scaled.push_row(&self.transform_row(row)?)?;
        }
        Ok(scaled)
    }

    /// Scale one sample
    pub fn transform_row(&self, values: &[f64]) -> Result<Vec<f64>, FeatureError> {
        if values.len() != self.n_features() {
            return Err(FeatureError::DimensionMismatch {
                expected: self.n_features(),
                actual: values.len(),
            });
        }
        Ok(values
            .iter()
            .zip(self.means.iter().zip(&self.scales))
            .map(|(v, (mean, scale))| (v - mean) / scale)
            .collect())
    }

    /// Per-feature means
    pub fn means(&self) -> &[f64] {
        &self.means
    }

    /// Per-feature population variances
    pub fn variances(&self) -> &[f64] {
        &self.variances
    }

    /// Per-feature divisors
    pub fn scales(&self) -> &[f64] {
        &self.scales
    }

    pub fn n_features(&self) -> usize {
        self.means.len()
    }

    /// Number of samples seen during fit
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_matrix() -> FeatureMatrix {
        FeatureMatrix::from_rows(&[
            vec![6.6, 35.0, 1.0],
            vec![6.6, 36.0, 0.0],
            vec![8.5, 70.0, 1.0],
            vec![9.5, 34.0, 1.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_scaled_columns_are_standardized() {
        let (_, scaled) = StandardScaler::fit_transform(&sample_matrix()).unwrap();
        for col in 0..scaled.n_cols() {
            let stats = ColumnStatistics::compute(scaled.column(col));
            assert!(stats.mean.abs() < 1e-12);
            assert!((stats.variance - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_constant_feature_maps_to_zero() {
        let m = FeatureMatrix::from_rows(&[vec![250.0], vec![250.0]]).unwrap();
        let scaler = StandardScaler::fit(&m).unwrap();
        assert_eq!(scaler.scales(), &[1.0]);
        assert_eq!(scaler.transform_row(&[250.0]).unwrap(), vec![0.0]);
        assert_eq!(scaler.transform_row(&[251.0]).unwrap(), vec![1.0]);
    }

    #[test]
    fn test_transform_does_not_refit() {
        let m = sample_matrix();
        let scaler = StandardScaler::fit(&m).unwrap();
        let before = scaler.clone();
        scaler.transform_row(&[100.0, -50.0, 7.0]).unwrap();
        scaler.transform_row(&[0.0, 0.0, 0.0]).unwrap();
        assert_eq!(scaler, before);
    }

    #[test]
    fn test_dimension_mismatch() {
        let scaler = StandardScaler::fit(&sample_matrix()).unwrap();
        assert_eq!(
            scaler.transform_row(&[1.0]),
            Err(FeatureError::DimensionMismatch {
                expected: 3,
                actual: 1
            })
        );
    }

    #[test]
    fn test_empty_fit_rejected() {
        let m = FeatureMatrix::with_columns(3);
        assert_eq!(StandardScaler::fit(&m), Err(FeatureError::Empty));
    }

    proptest! {
        #[test]
        fn prop_fitted_statistics_match_columns(
            rows in prop::collection::vec(prop::collection::vec(-1000.0f64..1000.0, 4), 1..40)
        ) {
            let m = FeatureMatrix::from_rows(&rows).unwrap();
            let scaler = StandardScaler::fit(&m).unwrap();
            for col in 0..4 {
                let stats = ColumnStatistics::compute(m.column(col));
                prop_assert!((scaler.means()[col] - stats.mean).abs() < 1e-9);
                prop_assert!((scaler.variances()[col] - stats.variance).abs() < 1e-6);
            }
        }
    }
}
