//! L2-Regularized Logistic Regression
//!
//! Minimizes `0.5 * ||w||² + C * Σ logloss(yᵢ, w·xᵢ + b)` with damped Newton
//! steps. The intercept is not penalized. The objective is strictly convex,
//! so the fit is deterministic and independent of any seed.

use crate::classifier::{check_sample, check_training_set, Classifier};
use crate::InferenceError;
use feature_engine::FeatureMatrix;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Logistic regression hyperparameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticConfig {
    /// Inverse regularization strength
    pub c: f64,
    /// Newton iteration cap
    pub max_iter: usize,
    /// Stop when the largest gradient component falls below this
    pub tol: f64,
}

impl Default for LogisticConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 100,
            tol: 1e-4,
        }
    }
}

/// Binary logistic regression
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    config: LogisticConfig,
    weights: Vec<f64>,
    intercept: f64,
    /// Set when the training labels contain a single class
    constant_class: Option<usize>,
    n_iter: usize,
    fitted: bool,
}

impl LogisticRegression {
    pub fn new(config: LogisticConfig) -> Self {
        Self {
            config,
            weights: Vec::new(),
            intercept: 0.0,
            constant_class: None,
            n_iter: 0,
            fitted: false,
        }
    }

    /// Fitted coefficients, one per feature
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Newton iterations used by the last fit
    pub fn n_iter(&self) -> usize {
        self.n_iter
    }

    /// Signed distance from the decision boundary
    pub fn decision_function(&self, sample: &[f64]) -> Result<f64, InferenceError> {
        if !self.fitted {
            return Err(InferenceError::NotFitted);
        }
        check_sample(self.weights.len(), sample)?;
        Ok(dot(&self.weights, sample) + self.intercept)
    }

    fn objective(&self, features: &FeatureMatrix, labels: &[usize], theta: &[f64]) -> f64 {
        let (w, b) = theta.split_at(theta.len() - 1);
        let penalty = 0.5 * w.iter().map(|v| v * v).sum::<f64>();
        let loss: f64 = features
            .rows()
            .zip(labels)
            .map(|(row, &y)| {
                let z = dot(w, row) + b[0];
                softplus(z) - y as f64 * z
            })
            .sum();
        penalty + self.config.c * loss
    }

    /// Backtrack along `theta - scale * step` until the objective does not
    /// rise. `None` when no scale down to 1e-8 achieves that.
    fn line_search(
        &self,
        features: &FeatureMatrix,
        labels: &[usize],
        theta: &[f64],
        step: &[f64],
        current: f64,
    ) -> Option<(Vec<f64>, f64)> {
        let mut scale = 1.0;
        while scale >= 1e-8 {
            let candidate: Vec<f64> = theta.iter().zip(step).map(|(t, s)| t - scale * s).collect();
            let value = self.objective(features, labels, &candidate);
            if value <= current {
                return Some((candidate, value));
            }
            scale *= 0.5;
        }
        None
    }

    /// Gradient and Hessian of the objective; the last coordinate is the intercept
    fn gradient_hessian(
        &self,
        features: &FeatureMatrix,
        labels: &[usize],
        theta: &[f64],
    ) -> (Vec<f64>, Vec<Vec<f64>>) {
        let dim = theta.len();
        let (w, b) = theta.split_at(dim - 1);
        let c = self.config.c;

        let mut grad = vec![0.0; dim];
        let mut hess = vec![vec![0.0; dim]; dim];
        for (j, wj) in w.iter().enumerate() {
            grad[j] = *wj;
            hess[j][j] = 1.0;
        }
        // Keeps the intercept row invertible when every probability saturates
        hess[dim - 1][dim - 1] = 1e-10;

        let mut extended = vec![1.0; dim];
        for (row, &y) in features.rows().zip(labels) {
            extended[..dim - 1].copy_from_slice(row);
            let p = sigmoid(dot(w, row) + b[0]);
            let residual = c * (p - y as f64);
            let curvature = c * p * (1.0 - p);
            for j in 0..dim {
                grad[j] += residual * extended[j];
                for k in 0..dim {
                    hess[j][k] += curvature * extended[j] * extended[k];
                }
            }
        }
        (grad, hess)
    }
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new(LogisticConfig::default())
    }
}

impl Classifier for LogisticRegression {
    fn fit(&mut self, features: &FeatureMatrix, labels: &[usize]) -> Result<(), InferenceError> {
        check_training_set(features, labels)?;
        let dim = features.n_cols() + 1;

        self.constant_class = None;
        self.n_iter = 0;

        if labels.iter().all(|&l| l == labels[0]) {
            warn!("Logistic regression trained on a single class ({})", labels[0]);
            self.weights = vec![0.0; dim - 1];
            self.intercept = 0.0;
            self.constant_class = Some(labels[0]);
            self.fitted = true;
            return Ok(());
        }

        let mut theta = vec![0.0; dim];
        let mut current = self.objective(features, labels, &theta);

        for iter in 0..self.config.max_iter {
            let (grad, hess) = self.gradient_hessian(features, labels, &theta);
            let grad_max = grad.iter().fold(0.0f64, |acc, g| acc.max(g.abs()));
            if grad_max <= self.config.tol {
                break;
            }

            let step = solve(hess, grad).ok_or_else(|| {
                InferenceError::TrainingFailed("singular Hessian in logistic regression".into())
            })?;

            let Some((candidate, value)) = self.line_search(features, labels, &theta, &step, current)
            else {
                debug!("Logistic regression line search stalled at iteration {}", iter);
                break;
            };
            theta = candidate;
            current = value;
            self.n_iter = iter + 1;
        }

        if self.n_iter == self.config.max_iter {
            warn!(
                "Logistic regression did not converge in {} iterations",
                self.config.max_iter
            );
        }

        self.intercept = theta[dim - 1];
        theta.truncate(dim - 1);
        self.weights = theta;
        self.fitted = true;

        debug!(
            "Logistic regression fitted in {} iterations (objective {:.4})",
            self.n_iter, current
        );
        Ok(())
    }

    fn predict_proba(&self, sample: &[f64]) -> Result<f64, InferenceError> {
        let z = self.decision_function(sample)?;
        Ok(match self.constant_class {
            Some(class) => class as f64,
            None => sigmoid(z),
        })
    }

    fn predict(&self, sample: &[f64]) -> Result<usize, InferenceError> {
        let z = self.decision_function(sample)?;
        Ok(match self.constant_class {
            Some(class) => class,
            None => usize::from(z > 0.0),
        })
    }

    fn name(&self) -> &'static str {
        "Logistic Regression"
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// `ln(1 + e^z)` without overflow
fn softplus(z: f64) -> f64 {
    z.max(0.0) + (-z.abs()).exp().ln_1p()
}

/// Solve `a · x = b` by Gaussian elimination with partial pivoting
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))?;
        if a[pivot][col].abs() < 1e-14 {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Some(x)
}
