//! Random Forest Classifier
//!
//! Ensemble of bootstrap-trained [`DecisionTree`]s. Class probabilities are
//! the mean of the tree leaf probabilities; the label is the class with the
//! higher mean (class 0 on a tie).

use crate::classifier::{check_sample, check_training_set, Classifier};
use crate::tree::{DecisionTree, TreeConfig};
use crate::InferenceError;
use feature_engine::FeatureMatrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Random forest hyperparameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestConfig {
    /// Number of trees
    pub n_trees: usize,
    /// Draw a bootstrap sample per tree
    pub bootstrap: bool,
    /// Seed for bootstrap draws and feature subsets
    pub seed: u64,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            bootstrap: true,
            seed: 42,
            max_depth: None,
            min_samples_split: 2,
        }
    }
}

/// Result of Random Forest prediction with vote details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RfPrediction {
    /// Predicted class
    pub class: usize,
    /// Mean class-1 probability across trees
    pub probability: f64,
    /// Hard vote count per class
    pub votes: [usize; 2],
}

/// Random forest over CART trees
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    config: ForestConfig,
    trees: Vec<DecisionTree>,
    n_features: usize,
}

impl RandomForest {
    pub fn new(config: ForestConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
            n_features: 0,
        }
    }

    /// Features examined per split: `floor(sqrt(n_features))`, at least one
    pub fn max_features(n_features: usize) -> usize {
        ((n_features as f64).sqrt() as usize).max(1)
    }

    /// Predict a single sample with vote details.
    pub fn predict_with_votes(&self, sample: &[f64]) -> Result<RfPrediction, InferenceError> {
        if self.trees.is_empty() {
            return Err(InferenceError::NotFitted);
        }
        check_sample(self.n_features, sample)?;

        let mut votes = [0usize; 2];
        let mut total = 0.0;
        for tree in &self.trees {
            let p = tree.predict_proba(sample)?;
            total += p;
            votes[usize::from(p > 0.5)] += 1;
        }
        let probability = total / self.trees.len() as f64;

        Ok(RfPrediction {
            class: usize::from(probability > 0.5),
            probability,
            votes,
        })
    }

    /// Number of trees in the forest.
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Average tree depth across the forest.
    pub fn avg_depth(&self) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        let total: usize = self.trees.iter().map(DecisionTree::depth).sum();
        total as f64 / self.trees.len() as f64
    }

    /// Access individual tree by index.
    pub fn tree_at(&self, index: usize) -> Option<&DecisionTree> {
        self.trees.get(index)
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }
}

impl Default for RandomForest {
    fn default() -> Self {
        Self::new(ForestConfig::default())
    }
}

impl Classifier for RandomForest {
    fn fit(&mut self, features: &FeatureMatrix, labels: &[usize]) -> Result<(), InferenceError> {
        check_training_set(features, labels)?;
        if self.config.n_trees == 0 {
            return Err(InferenceError::TrainingFailed("forest needs at least one tree".into()));
        }

        let n = features.n_rows();
        let tree_config = TreeConfig {
            max_depth: self.config.max_depth,
            min_samples_split: self.config.min_samples_split,
            max_features: Some(Self::max_features(features.n_cols())),
        };

        // One child seed per tree keeps each tree independent of the others' draws
        let mut master = StdRng::seed_from_u64(self.config.seed);
        let mut trees = Vec::with_capacity(self.config.n_trees);
        for _ in 0..self.config.n_trees {
            let mut rng = StdRng::seed_from_u64(master.gen());
            let indices: Vec<usize> = if self.config.bootstrap {
                (0..n).map(|_| rng.gen_range(0..n)).collect()
            } else {
                (0..n).collect()
            };
            trees.push(DecisionTree::fit(features, labels, &indices, &tree_config, &mut rng)?);
        }

        self.trees = trees;
        self.n_features = features.n_cols();

        debug!(
            "Random forest fitted: {} trees, avg depth {:.1}",
            self.trees.len(),
            self.avg_depth()
        );
        Ok(())
    }

    fn predict_proba(&self, sample: &[f64]) -> Result<f64, InferenceError> {
        Ok(self.predict_with_votes(sample)?.probability)
    }

    fn name(&self) -> &'static str {
        "Random Forest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clusters() -> (FeatureMatrix, Vec<usize>) {
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for i in 0..20 {
            let jitter = (i % 5) as f64 * 0.1;
            rows.push(vec![-2.0 - jitter, 1.0 + jitter, 0.0]);
            labels.push(0);
            rows.push(vec![2.0 + jitter, -1.0 - jitter, 1.0]);
            labels.push(1);
        }
        (FeatureMatrix::from_rows(&rows).unwrap(), labels)
    }

    #[test]
    fn test_max_features_sqrt() {
        assert_eq!(RandomForest::max_features(7), 2);
        assert_eq!(RandomForest::max_features(9), 3);
        assert_eq!(RandomForest::max_features(1), 1);
    }

    #[test]
    fn test_separates_clusters() {
        let (x, y) = clusters();
        let mut forest = RandomForest::new(ForestConfig {
            n_trees: 25,
            ..Default::default()
        });
        forest.fit(&x, &y).unwrap();
        assert_eq!(forest.n_trees(), 25);

        let far_one = forest.predict_with_votes(&[3.0, -2.0, 1.0]).unwrap();
        assert_eq!(far_one.class, 1);
        assert_eq!(far_one.votes[0] + far_one.votes[1], 25);
        assert_eq!(forest.predict(&[-3.0, 2.0, 0.0]).unwrap(), 0);
    }

    #[test]
    fn test_same_seed_same_forest() {
        let (x, y) = clusters();
        let mut a = RandomForest::new(ForestConfig { n_trees: 10, ..Default::default() });
        let mut b = RandomForest::new(ForestConfig { n_trees: 10, ..Default::default() });
        a.fit(&x, &y).unwrap();
        b.fit(&x, &y).unwrap();

        for probe in [[0.1, 0.0, 0.5], [-0.5, 0.2, 0.0], [1.0, -1.0, 1.0]] {
            assert_eq!(
                a.predict_proba(&probe).unwrap(),
                b.predict_proba(&probe).unwrap()
            );
        }
    }

    #[test]
    fn test_without_bootstrap_trees_see_all_rows() {
        let (x, y) = clusters();
        let mut forest = RandomForest::new(ForestConfig {
            n_trees: 3,
            bootstrap: false,
            ..Default::default()
        });
        forest.fit(&x, &y).unwrap();
        for row in x.rows() {
            let p = forest.predict_proba(row).unwrap();
            assert!(p == 0.0 || p == 1.0);
        }
    }

    #[test]
    fn test_unfitted_and_zero_trees() {
        let forest = RandomForest::default();
        assert!(matches!(forest.predict(&[0.0]), Err(InferenceError::NotFitted)));

        let (x, y) = clusters();
        let mut empty = RandomForest::new(ForestConfig { n_trees: 0, ..Default::default() });
        assert!(matches!(empty.fit(&x, &y), Err(InferenceError::TrainingFailed(_))));
    }
}
