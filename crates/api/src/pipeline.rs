//! Request Pipeline
//!
//! validate → shortcut rule → load dataset → train and predict. Each call
//! gets its own [`PredictionRequest`]; nothing carries over between requests
//! except the optional content-addressed model cache.

use fallback::{ShortcutRule, Verdict, VerdictSource};
use inference_engine::{InferenceError, PredictionOutcome, Predictor};
use reference_data::{DatasetError, DatasetLoader, Upload};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use water_validator::{Observation, ObservationValidator, ValidationError};

use crate::config::AppConfig;

/// One operator submission
#[derive(Debug, Clone)]
pub struct PredictionRequest {
    pub observation: Observation,
    /// Replacement dataset, consulted only when the local file is absent
    pub upload: Option<Upload>,
}

impl PredictionRequest {
    pub fn new(observation: Observation) -> Self {
        Self {
            observation,
            upload: None,
        }
    }

    pub fn with_upload(mut self, upload: Upload) -> Self {
        self.upload = Some(upload);
        self
    }
}

/// Pipeline result
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PipelineOutcome {
    /// The shortcut rule decided; no dataset was read
    Shortcut { verdict: Verdict },
    /// Both classifiers were trained and consulted
    Modelled {
        verdict: Verdict,
        details: PredictionOutcome,
    },
}

impl PipelineOutcome {
    pub fn verdict(&self) -> &Verdict {
        match self {
            PipelineOutcome::Shortcut { verdict } => verdict,
            PipelineOutcome::Modelled { verdict, .. } => verdict,
        }
    }

    pub fn details(&self) -> Option<&PredictionOutcome> {
        match self {
            PipelineOutcome::Shortcut { .. } => None,
            PipelineOutcome::Modelled { details, .. } => Some(details),
        }
    }
}

/// Terminal failures for a request
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error("Prediction failed: {0}")]
    Inference(#[from] InferenceError),
}

/// The four pipeline stages
pub struct Pipeline {
    validator: ObservationValidator,
    rule: ShortcutRule,
    loader: DatasetLoader,
    predictor: Predictor,
}

impl Pipeline {
    pub fn new(validator: ObservationValidator, loader: DatasetLoader, predictor: Predictor) -> Self {
        Self {
            validator,
            rule: ShortcutRule::new(),
            loader,
            predictor,
        }
    }

    /// Build every stage from application configuration
    pub fn from_config(config: &AppConfig) -> Self {
        let predictor = if config.cache_models {
            Predictor::with_cache(config.predictor(), config.cache_capacity)
        } else {
            Predictor::new(config.predictor())
        };
        Self::new(
            ObservationValidator::default(),
            DatasetLoader::new(config.loader()),
            predictor,
        )
    }

    /// Run one request start to finish
    pub fn run(&self, request: PredictionRequest) -> Result<PipelineOutcome, PipelineError> {
        let PredictionRequest {
            observation,
            upload,
        } = request;
        debug!("Running pipeline for {:?}", observation);

        self.validator.validate(&observation)?;

        if let Some(verdict) = self.rule.evaluate(&observation) {
            metrics::counter!("water_quality_predictions_total", "source" => "shortcut").increment(1);
            return Ok(PipelineOutcome::Shortcut { verdict });
        }

        let dataset = self.loader.load(upload).map_err(|e| {
            warn!("Dataset unavailable: {}", e);
            metrics::counter!("water_quality_dataset_errors_total").increment(1);
            e
        })?;

        let details = self.predictor.predict(&dataset, &observation)?;
        metrics::counter!("water_quality_predictions_total", "source" => "model").increment(1);

        let verdict = Verdict {
            logistic_regression: details.logistic_regression,
            random_forest: details.random_forest,
            source: VerdictSource::Model,
        };
        info!(
            "Verdict: Logistic Regression={}, Random Forest={}",
            verdict.logistic_regression, verdict.random_forest
        );
        Ok(PipelineOutcome::Modelled { verdict, details })
    }

    /// Whether the fixed local dataset is present
    pub fn local_dataset_available(&self) -> bool {
        self.loader.local_available()
    }

    /// Number of cached model sets, if caching is enabled
    pub fn cached_models(&self) -> Option<usize> {
        self.predictor.cache().map(|cache| cache.len())
    }
}
