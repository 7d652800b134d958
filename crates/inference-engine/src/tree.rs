//! CART Decision Tree (Gini impurity)
//!
//! Array-based node storage: children are indices into `nodes`. Trees are
//! trained on an index list so bootstrap samples need no copy of the data.

use crate::classifier::check_sample;
use crate::InferenceError;
use feature_engine::FeatureMatrix;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Tree growth limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Depth cap, `None` grows until leaves are pure
    pub max_depth: Option<usize>,
    /// Minimum samples a node needs to be split
    pub min_samples_split: usize,
    /// Features examined per split, `None` examines all
    pub max_features: Option<usize>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            max_features: None,
        }
    }
}

/// A node in the decision tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    /// Terminal node with the fraction of class-1 samples that reached it
    Leaf { probability: f64, samples: usize },
    /// Samples with `x[feature] <= threshold` go left
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A trained binary decision tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<TreeNode>,
    n_features: usize,
    depth: usize,
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

impl DecisionTree {
    /// Grow a tree on the rows named by `indices` (duplicates allowed)
    pub fn fit<R: Rng + ?Sized>(
        features: &FeatureMatrix,
        labels: &[usize],
        indices: &[usize],
        config: &TreeConfig,
        rng: &mut R,
    ) -> Result<Self, InferenceError> {
        if indices.is_empty() {
            return Err(InferenceError::EmptyTrainingSet);
        }

        let mut tree = Self {
            nodes: Vec::new(),
            n_features: features.n_cols(),
            depth: 0,
        };

        // (node slot, samples, depth)
        let mut pending = vec![(0usize, indices.to_vec(), 0usize)];
        tree.nodes.push(leaf(labels, indices));

        while let Some((slot, samples, depth)) = pending.pop() {
            tree.depth = tree.depth.max(depth);
            tree.nodes[slot] = leaf(labels, &samples);

            let positives = count_positive(labels, &samples);
            let pure = positives == 0 || positives == samples.len();
            let depth_reached = config.max_depth.is_some_and(|max| depth >= max);
            if pure || depth_reached || samples.len() < config.min_samples_split {
                continue;
            }

            let Some(best) = best_split(features, labels, &samples, config, rng) else {
                continue;
            };

            let (left, right): (Vec<usize>, Vec<usize>) = samples
                .iter()
                .partition(|&&i| features.get(i, best.feature) <= best.threshold);

            let left_slot = tree.nodes.len();
            tree.nodes.push(leaf(labels, &left));
            let right_slot = tree.nodes.len();
            tree.nodes.push(leaf(labels, &right));

            tree.nodes[slot] = TreeNode::Split {
                feature: best.feature,
                threshold: best.threshold,
                left: left_slot,
                right: right_slot,
            };
            pending.push((right_slot, right, depth + 1));
            pending.push((left_slot, left, depth + 1));
        }

        Ok(tree)
    }

    /// Probability of class 1 for one sample
    pub fn predict_proba(&self, sample: &[f64]) -> Result<f64, InferenceError> {
        check_sample(self.n_features, sample)?;
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { probability, .. } => return Ok(*probability),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if sample[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    /// Predicted class for one sample
    pub fn predict(&self, sample: &[f64]) -> Result<usize, InferenceError> {
        Ok(usize::from(self.predict_proba(sample)? > 0.5))
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Longest root-to-leaf path
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }
}

fn count_positive(labels: &[usize], samples: &[usize]) -> usize {
    samples.iter().filter(|&&i| labels[i] == 1).count()
}

fn leaf(labels: &[usize], samples: &[usize]) -> TreeNode {
    let probability = if samples.is_empty() {
        0.0
    } else {
        count_positive(labels, samples) as f64 / samples.len() as f64
    };
    TreeNode::Leaf {
        probability,
        samples: samples.len(),
    }
}

fn gini(positives: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let p = positives as f64 / total as f64;
    1.0 - p * p - (1.0 - p) * (1.0 - p)
}

/// Search a random feature subset for the lowest weighted Gini split.
///
/// Constant features do not count toward `max_features`, so the search keeps
/// drawing until enough usable features were examined or none remain.
fn best_split<R: Rng + ?Sized>(
    features: &FeatureMatrix,
    labels: &[usize],
    samples: &[usize],
    config: &TreeConfig,
    rng: &mut R,
) -> Option<BestSplit> {
    let n_features = features.n_cols();
    let budget = config.max_features.unwrap_or(n_features).clamp(1, n_features.max(1));

    let mut order: Vec<usize> = (0..n_features).collect();
    order.shuffle(rng);

    let total = samples.len();
    let total_positive = count_positive(labels, samples);
    let mut best: Option<BestSplit> = None;
    let mut examined = 0;
    let mut column: Vec<(f64, usize)> = Vec::with_capacity(total);

    for feature in order {
        if examined >= budget {
            break;
        }

        column.clear();
        column.extend(samples.iter().map(|&i| (features.get(i, feature), labels[i])));
        column.sort_by(|a, b| a.0.total_cmp(&b.0));

        if column[0].0 == column[total - 1].0 {
            continue;
        }
        examined += 1;

        let mut left_positive = 0;
        for split in 0..total - 1 {
            left_positive += column[split].1;
            let (value, next) = (column[split].0, column[split + 1].0);
            if value == next {
                continue;
            }

            let left_total = split + 1;
            let right_total = total - left_total;
            let impurity = (left_total as f64 * gini(left_positive, left_total)
                + right_total as f64 * gini(total_positive - left_positive, right_total))
                / total as f64;

            if best.as_ref().map_or(true, |b| impurity < b.impurity) {
                let mut threshold = value + (next - value) / 2.0;
                if threshold >= next {
                    threshold = value;
                }
                best = Some(BestSplit {
                    feature,
                    threshold,
                    impurity,
                });
            }
        }
    }

    best
}
