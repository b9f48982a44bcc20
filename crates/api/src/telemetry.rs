//! Logging and metrics setup

use crate::config::LoggingConfig;
use anyhow::Context;
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

pub const PREDICTIONS_TOTAL: &str = "crop_yield_predictions_total";
pub const PREDICTION_ERRORS_TOTAL: &str = "crop_yield_prediction_errors_total";
pub const INFERENCE_LATENCY_SECONDS: &str = "crop_yield_inference_latency_seconds";

/// Initialize logging
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let level: Level = config
        .level
        .parse()
        .with_context(|| format!("invalid log level '{}'", config.level))?;

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    let installed = if config.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    installed.context("failed to set tracing subscriber")
}

/// Install the global Prometheus recorder
pub fn install_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .context("failed to install Prometheus recorder")?;

    describe_counter!(PREDICTIONS_TOTAL, "Successful yield predictions, by crop");
    describe_counter!(PREDICTION_ERRORS_TOTAL, "Failed yield predictions, by error kind");
    describe_histogram!(INFERENCE_LATENCY_SECONDS, "Model inference latency");

    Ok(handle)
}
