//! Water Quality API Server
//!
//! Operator HTML page plus a JSON API over the prediction pipeline.

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

pub mod config;
pub mod error;
pub mod pipeline;
pub mod render;
mod routes;

pub use config::AppConfig;
pub use error::ApiError;
pub use pipeline::{Pipeline, PipelineError, PipelineOutcome, PredictionRequest};

/// Allowance for the form fields sent alongside an upload
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Application state shared across handlers
pub struct AppState {
    /// Prediction pipeline
    pub pipeline: Arc<Pipeline>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
    /// Prometheus exporter, absent when no recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new application state
    pub fn new(pipeline: Pipeline, metrics: Option<PrometheusHandle>) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
            metrics,
        }
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub dataset_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached_models: Option<usize>,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(routes::form::get_index))
        .route("/predict", post(routes::form::post_form))
        .route("/api/v1/fields", get(routes::fields::get_fields))
        .route("/api/v1/predict", post(routes::predict::post_predict))
        .route("/api/v1/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .layer(DefaultBodyLimit::max(max_upload_bytes + FORM_OVERHEAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        dataset_available: state.pipeline.local_dataset_available(),
        cached_models: state.pipeline.cached_models(),
    })
}

/// Prometheus text exposition
async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed".to_string()),
    }
}

/// Initialize logging
pub fn init_logging(config: &AppConfig) -> anyhow::Result<()> {
    let level: Level = config
        .log_level
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid log level '{}'", config.log_level))?;

    if config.log_json {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(true)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }
    Ok(())
}

/// Run the server
pub async fn run_server(config: AppConfig, metrics: Option<PrometheusHandle>) -> anyhow::Result<()> {
    let pipeline = Pipeline::from_config(&config);
    if !pipeline.local_dataset_available() {
        info!(
            "Local dataset {} not found; predictions require an upload",
            config.dataset_path.display()
        );
    }

    let state = Arc::new(AppState::new(pipeline, metrics));
    let app = create_router(state, config.max_upload_bytes);

    info!("Starting API server on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
