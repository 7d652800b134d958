//! Operator Page Routes

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    response::Html,
};
use reference_data::Upload;
use std::sync::Arc;
use tracing::debug;
use water_validator::Observation;

use crate::error::ApiError;
use crate::pipeline::PredictionRequest;
use crate::render::{self, Output};
use crate::routes::run_pipeline;
use crate::AppState;

/// Multipart field carrying the dataset file
const DATASET_FIELD: &str = "dataset";

/// Blank form with defaults
pub async fn get_index(State(state): State<Arc<AppState>>) -> Html<String> {
    let show_upload = !state.pipeline.local_dataset_available();
    Html(render::page(&Observation::default(), show_upload, Output::Empty))
}

/// Submitted form: shows the verdict or an error banner
pub async fn post_form(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> (StatusCode, Html<String>) {
    let show_upload = !state.pipeline.local_dataset_available();

    let (pairs, upload) = match read_form(multipart).await {
        Ok(parts) => parts,
        Err(e) => return error_page(&Observation::default(), show_upload, &e),
    };

    let fields = pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()));
    let observation = match Observation::collect(fields) {
        Ok(obs) => obs,
        Err(e) => {
            let error = ApiError::Pipeline(e.into());
            return error_page(&Observation::default(), show_upload, &error);
        }
    };

    let mut request = PredictionRequest::new(observation);
    if let Some(upload) = upload {
        request = request.with_upload(upload);
    }

    match run_pipeline(Arc::clone(&state.pipeline), request).await {
        Ok(outcome) => (
            StatusCode::OK,
            Html(render::page(&observation, show_upload, Output::Result(&outcome))),
        ),
        Err(e) => error_page(&observation, show_upload, &e),
    }
}

fn error_page(
    observation: &Observation,
    show_upload: bool,
    error: &ApiError,
) -> (StatusCode, Html<String>) {
    let message = error.to_string();
    (
        error.status(),
        Html(render::page(observation, show_upload, Output::Error(&message))),
    )
}

/// Keep the status the multipart extractor assigned (413 past the body limit)
fn multipart_error(error: MultipartError) -> ApiError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(error.body_text())
    } else {
        ApiError::BadRequest(error.body_text())
    }
}

type FormParts = (Vec<(String, String)>, Option<Upload>);

async fn read_form(mut multipart: Multipart) -> Result<FormParts, ApiError> {
    let mut pairs = Vec::new();
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == DATASET_FIELD {
            let file_name = field.file_name().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(multipart_error)?;
            debug!("Received dataset upload: {:?} ({} bytes)", file_name, bytes.len());
            upload = Some(Upload::new(file_name, bytes.to_vec()));
        } else {
            let value = field
                .text()
                .await
                .map_err(multipart_error)?;
            pairs.push((name, value));
        }
    }

    Ok((pairs, upload))
}
