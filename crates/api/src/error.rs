//! HTTP Error Mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use reference_data::DatasetError;
use serde::Serialize;
use thiserror::Error;

use crate::pipeline::PipelineError;

/// Errors surfaced by HTTP handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("Malformed request: {0}")]
    BadRequest(String),
    #[error("Request body exceeds the upload limit: {0}")]
    PayloadTooLarge(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: &'static str,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Pipeline(PipelineError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Pipeline(PipelineError::Dataset(DatasetError::Missing { .. })) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Pipeline(PipelineError::Dataset(DatasetError::TooLarge { .. })) => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            ApiError::Pipeline(PipelineError::Dataset(DatasetError::Io(_))) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Pipeline(PipelineError::Dataset(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Pipeline(PipelineError::Inference(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable error kind
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Pipeline(PipelineError::Validation(_)) => "invalid_input",
            ApiError::Pipeline(PipelineError::Dataset(DatasetError::Missing { .. })) => {
                "missing_dataset"
            }
            ApiError::Pipeline(PipelineError::Dataset(e)) if e.is_schema_error() => {
                "schema_mismatch"
            }
            ApiError::Pipeline(PipelineError::Dataset(_)) => "invalid_dataset",
            ApiError::Pipeline(PipelineError::Inference(_)) => "inference_failed",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::PayloadTooLarge(_) => "payload_too_large",
            ApiError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
            kind: self.kind(),
        };
        (self.status(), Json(body)).into_response()
    }
}
