//! HTTP Routes

pub mod fields;
pub mod form;
pub mod predict;

use std::sync::Arc;

use crate::error::ApiError;
use crate::pipeline::{Pipeline, PipelineOutcome, PredictionRequest};

/// Run the pipeline on a blocking worker; training is CPU-bound
pub(crate) async fn run_pipeline(
    pipeline: Arc<Pipeline>,
    request: PredictionRequest,
) -> Result<PipelineOutcome, ApiError> {
    tokio::task::spawn_blocking(move || pipeline.run(request))
        .await
        .map_err(|e| ApiError::Internal(format!("prediction task failed: {}", e)))?
        .map_err(ApiError::from)
}
