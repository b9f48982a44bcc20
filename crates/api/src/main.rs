//! Crop Yield Prediction Service - Main Entry Point

use api::telemetry::{init_logging, install_metrics};
use api::{run_server, AppConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    init_logging(&config.logging)?;

    info!("=== Crop Yield Predictor v{} ===", env!("CARGO_PKG_VERSION"));
    info!(
        "Schema: {}, model: {}{}",
        config.model.schema_path,
        config.model.path,
        if config.model.mock { " (mock)" } else { "" }
    );

    let metrics = install_metrics()?;
    run_server(&config, Some(metrics)).await?;

    Ok(())
}
