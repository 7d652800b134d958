//! Dense Row-Major Feature Matrix

use crate::FeatureError;
use serde::{Deserialize, Serialize};

/// Row-major matrix of feature values (one row per sample)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    data: Vec<f64>,
    n_rows: usize,
    n_cols: usize,
}

impl FeatureMatrix {
    /// Build from rows; every row must have the same length
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, FeatureError> {
        let n_cols = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        let mut data = Vec::with_capacity(rows.len() * n_cols);
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != n_cols {
                return Err(FeatureError::RaggedRows {
                    row,
                    expected: n_cols,
                    actual: values.len(),
                });
            }
            data.extend_from_slice(values);
        }
        Ok(Self {
            data,
            n_rows: rows.len(),
            n_cols,
        })
    }

    /// Empty matrix with a fixed column count, filled with [`push_row`](Self::push_row)
    pub fn with_columns(n_cols: usize) -> Self {
        Self {
            data: Vec::new(),
            n_rows: 0,
            n_cols,
        }
    }

    /// Append one sample
    pub fn push_row(&mut self, values: &[f64]) -> Result<(), FeatureError> {
        if values.len() != self.n_cols {
            return Err(FeatureError::RaggedRows {
                row: self.n_rows,
                expected: self.n_cols,
                actual: values.len(),
            });
        }
        self.data.extend_from_slice(values);
        self.n_rows += 1;
        Ok(())
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    /// Borrow row `idx`
    pub fn row(&self, idx: usize) -> &[f64] {
        &self.data[idx * self.n_cols..(idx + 1) * self.n_cols]
    }

    /// Iterate over rows
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        // chunks_exact panics on zero size
        self.data.chunks_exact(self.n_cols.max(1)).take(self.n_rows)
    }

    /// Values of column `col`, top to bottom
    pub fn column(&self, col: usize) -> impl Iterator<Item = f64> + '_ {
        self.rows().map(move |r| r[col])
    }

    /// Single value
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.n_cols + col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows() {
        let m = FeatureMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();
        assert_eq!(m.n_rows(), 3);
        assert_eq!(m.n_cols(), 2);
        assert_eq!(m.row(1), &[3.0, 4.0]);
        assert_eq!(m.column(1).collect::<Vec<_>>(), vec![2.0, 4.0, 6.0]);
        assert_eq!(m.get(2, 0), 5.0);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = FeatureMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert_eq!(
            err,
            FeatureError::RaggedRows {
                row: 1,
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_push_row() {
        let mut m = FeatureMatrix::with_columns(3);
        assert!(m.is_empty());
        m.push_row(&[1.0, 2.0, 3.0]).unwrap();
        assert!(m.push_row(&[1.0]).is_err());
        assert_eq!(m.n_rows(), 1);
        assert_eq!(m.rows().count(), 1);
    }
}
