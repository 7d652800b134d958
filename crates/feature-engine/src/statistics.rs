//! Per-Column Statistics

use serde::{Deserialize, Serialize};

/// Summary statistics for one feature column
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnStatistics {
    /// Mean value
    pub mean: f64,
    /// Population variance (divides by n)
    pub variance: f64,
    /// Standard deviation
    pub std_dev: f64,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
    /// Number of values
    pub count: usize,
}

impl ColumnStatistics {
    /// Compute statistics from a sequence of values
    pub fn compute<I: IntoIterator<Item = f64>>(values: I) -> Self {
        let values: Vec<f64> = values.into_iter().collect();
        if values.is_empty() {
            return Self::default();
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let min = values.iter().cloned().fold(f64::MAX, f64::min);
        let max = values.iter().cloned().fold(f64::MIN, f64::max);

        // Two-pass variance
        let m2: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
        let variance = m2 / n;

        Self {
            mean,
            variance,
            std_dev: variance.sqrt(),
            min,
            max,
            count: values.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_computation() {
        let stats = ColumnStatistics::compute([1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!((stats.mean - 3.0).abs() < 0.001);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 5.0);
        assert_eq!(stats.count, 5);
    }

    #[test]
    fn test_std_dev_computation() {
        let stats = ColumnStatistics::compute([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((stats.variance - 4.0).abs() < 1e-12);
        assert!((stats.std_dev - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_values() {
        let stats = ColumnStatistics::compute(Vec::new());
        assert_eq!(stats.mean, 0.0);
        assert_eq!(stats.count, 0);
    }
}
