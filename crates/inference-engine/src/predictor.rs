//! Per-Request Training and Prediction

use crate::cache::{CacheKey, ModelCache};
use crate::classifier::Classifier;
use crate::forest::{ForestConfig, RandomForest};
use crate::logistic::{LogisticConfig, LogisticRegression};
use crate::InferenceError;
use feature_engine::StandardScaler;
use reference_data::ReferenceDataset;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};
use water_validator::{Observation, Quality};

/// Predictor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictorConfig {
    /// Seed shared by both classifiers
    pub seed: u64,
    /// Random forest size
    pub n_trees: usize,
    pub logistic: LogisticConfig,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            n_trees: 100,
            logistic: LogisticConfig::default(),
        }
    }
}

/// Scaler and both classifiers fitted on one reference dataset
#[derive(Debug, Clone)]
pub struct TrainedModels {
    pub scaler: StandardScaler,
    pub logistic: LogisticRegression,
    pub forest: RandomForest,
}

/// Both classifiers' answers for one observation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionOutcome {
    pub logistic_regression: Quality,
    pub random_forest: Quality,
    /// Logistic regression P(Layak)
    pub logistic_probability: f64,
    /// Mean tree P(Layak)
    pub forest_probability: f64,
    /// Hard tree votes for (Tidak Layak, Layak)
    pub forest_votes: [usize; 2],
    /// Scaler statistics, fitted on the reference features only
    pub scaler_means: Vec<f64>,
    pub scaler_variances: Vec<f64>,
    pub training_samples: usize,
    /// Whether the models came from the cache
    pub cache_hit: bool,
    pub latency_ms: u64,
}

impl TrainedModels {
    /// Fit the scaler on the reference features, then both classifiers on the
    /// scaled features
    pub fn fit(dataset: &ReferenceDataset, config: &PredictorConfig) -> Result<Self, InferenceError> {
        let (scaler, scaled) = StandardScaler::fit_transform(dataset.features())?;

        let mut logistic = LogisticRegression::new(config.logistic.clone());
        logistic.fit(&scaled, dataset.labels())?;

        let mut forest = RandomForest::new(ForestConfig {
            n_trees: config.n_trees,
            seed: config.seed,
            ..Default::default()
        });
        forest.fit(&scaled, dataset.labels())?;

        Ok(Self {
            scaler,
            logistic,
            forest,
        })
    }

    /// Scale the observation with the fitted scaler and run both classifiers
    fn grade(&self, observation: &Observation) -> Result<Grading, InferenceError> {
        let scaled = self.scaler.transform_row(&observation.feature_vector())?;
        let logistic_label = self.logistic.predict(&scaled)?;
        let logistic_probability = self.logistic.predict_proba(&scaled)?;
        let forest = self.forest.predict_with_votes(&scaled)?;

        Ok(Grading {
            logistic_label,
            logistic_probability,
            forest_label: forest.class,
            forest_probability: forest.probability,
            forest_votes: forest.votes,
        })
    }
}

struct Grading {
    logistic_label: usize,
    logistic_probability: f64,
    forest_label: usize,
    forest_probability: f64,
    forest_votes: [usize; 2],
}

/// Trains on the reference dataset and grades one observation.
///
/// Without a cache every call fits from scratch. With a cache, models are
/// reused for byte-identical datasets; outputs are the same either way.
pub struct Predictor {
    config: PredictorConfig,
    cache: Option<ModelCache>,
}

impl Predictor {
    /// Create a predictor that refits on every request
    pub fn new(config: PredictorConfig) -> Self {
        info!(
            "Creating predictor: seed={}, n_trees={}",
            config.seed, config.n_trees
        );
        Self {
            config,
            cache: None,
        }
    }

    /// Create a predictor that caches up to `capacity` trained model sets
    pub fn with_cache(config: PredictorConfig, capacity: usize) -> Self {
        let mut predictor = Self::new(config);
        predictor.cache = Some(ModelCache::new(capacity));
        predictor
    }

    /// Fit fresh models, bypassing the cache
    pub fn train(&self, dataset: &ReferenceDataset) -> Result<TrainedModels, InferenceError> {
        let start = Instant::now();
        let models = TrainedModels::fit(dataset, &self.config)?;
        debug!(
            "Trained models on {} samples in {}ms",
            dataset.len(),
            start.elapsed().as_millis()
        );
        Ok(models)
    }

    /// Train (or reuse) models for `dataset` and grade `observation`
    pub fn predict(
        &self,
        dataset: &ReferenceDataset,
        observation: &Observation,
    ) -> Result<PredictionOutcome, InferenceError> {
        let start = Instant::now();
        let (models, cache_hit) = self.models_for(dataset)?;
        let grading = models.grade(observation)?;

        let outcome = PredictionOutcome {
            logistic_regression: Quality::from_label(grading.logistic_label),
            random_forest: Quality::from_label(grading.forest_label),
            logistic_probability: grading.logistic_probability,
            forest_probability: grading.forest_probability,
            forest_votes: grading.forest_votes,
            scaler_means: models.scaler.means().to_vec(),
            scaler_variances: models.scaler.variances().to_vec(),
            training_samples: dataset.len(),
            cache_hit,
            latency_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            "Prediction: logistic={} (p={:.3}), forest={} (p={:.3}), cache_hit={}, latency={}ms",
            outcome.logistic_regression,
            outcome.logistic_probability,
            outcome.random_forest,
            outcome.forest_probability,
            outcome.cache_hit,
            outcome.latency_ms
        );
        Ok(outcome)
    }

    fn models_for(
        &self,
        dataset: &ReferenceDataset,
    ) -> Result<(Arc<TrainedModels>, bool), InferenceError> {
        let Some(cache) = &self.cache else {
            return Ok((Arc::new(self.train(dataset)?), false));
        };

        let key = CacheKey {
            digest: *dataset.digest(),
            seed: self.config.seed,
            n_trees: self.config.n_trees,
        };
        if let Some(models) = cache.get(&key)? {
            debug!("Model cache hit for dataset {}", dataset.digest_hex());
            return Ok((models, true));
        }

        let models = Arc::new(self.train(dataset)?);
        cache.insert(key, Arc::clone(&models))?;
        Ok((models, false))
    }

    pub fn config(&self) -> &PredictorConfig {
        &self.config
    }

    pub fn cache(&self) -> Option<&ModelCache> {
        self.cache.as_ref()
    }
}

impl Default for Predictor {
    fn default() -> Self {
        Self::new(PredictorConfig::default())
    }
}
