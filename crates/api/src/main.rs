//! Water Quality Prediction - Main Entry Point

use anyhow::Context;
use api::{init_logging, run_server, AppConfig};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    init_logging(&config)?;

    info!("=== Water Quality Prediction v{} ===", env!("CARGO_PKG_VERSION"));
    info!(
        "Dataset: {}, cache: {}",
        config.dataset_path.display(),
        if config.cache_models { "enabled" } else { "disabled" }
    );

    let metrics = PrometheusBuilder::new()
        .install_recorder()
        .context("failed to install metrics recorder")?;

    run_server(config, Some(metrics)).await
}
