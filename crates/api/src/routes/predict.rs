//! JSON Prediction Routes

use axum::{extract::State, Json};
use fallback::VerdictSource;
use inference_engine::PredictionOutcome;
use reference_data::Upload;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use water_validator::{Observation, Quality};

use crate::error::ApiError;
use crate::pipeline::PredictionRequest;
use crate::routes::run_pipeline;
use crate::AppState;

/// Request body for the prediction endpoint
#[derive(Debug, Deserialize)]
pub struct PredictBody {
    /// Missing fields take the form defaults
    #[serde(default)]
    pub observation: Observation,
    /// CSV text used when the local dataset is absent
    pub dataset_csv: Option<String>,
}

/// Response for the prediction endpoint
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub logistic_regression: Quality,
    pub random_forest: Quality,
    pub source: VerdictSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<PredictionOutcome>,
}

/// Grade one observation
pub async fn post_predict(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PredictBody>,
) -> Result<Json<PredictResponse>, ApiError> {
    let mut request = PredictionRequest::new(body.observation);
    if let Some(csv) = body.dataset_csv {
        request = request.with_upload(Upload::new(None, csv.into_bytes()));
    }

    let outcome = run_pipeline(Arc::clone(&state.pipeline), request).await?;
    let verdict = *outcome.verdict();

    Ok(Json(PredictResponse {
        logistic_regression: verdict.logistic_regression,
        random_forest: verdict.random_forest,
        source: verdict.source,
        details: outcome.details().cloned(),
    }))
}
