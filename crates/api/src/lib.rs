//! Crop Yield Prediction Server
//!
//! HTML form and REST API in front of the yield model.

use anyhow::Context;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub mod config;
mod error;
mod routes;
pub mod telemetry;
mod views;

pub use config::AppConfig;
pub use error::ApiError;

use data_validator::{ValidationConfig, Validator};
use feature_engine::{FeatureAssembler, FeatureSchema, SchemaWarning, YieldInput};
use inference_engine::{InferenceEngine, InferenceResult};
use metrics_exporter_prometheus::PrometheusHandle;

/// Application state shared across handlers; read-only after startup
pub struct AppState {
    /// Schema-bound row builder
    pub assembler: FeatureAssembler,
    /// Loaded model
    pub engine: InferenceEngine,
    /// Input limits
    pub validator: Validator,
    /// Schema drift detected at load
    pub schema_warnings: Vec<SchemaWarning>,
    /// Prometheus handle, absent when no recorder is installed
    pub metrics: Option<PrometheusHandle>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
    /// Successful predictions served
    prediction_count: AtomicU64,
}

/// A served prediction plus anything the caller should know about it
#[derive(Debug)]
pub struct PredictionOutcome {
    pub input: YieldInput,
    pub result: InferenceResult,
    pub warnings: Vec<String>,
}

impl PredictionOutcome {
    /// Form message, e.g. `Predicted Yield for Rice in Bangladesh, 2025: 41234.57 hg/ha`
    pub fn message(&self) -> String {
        format!(
            "Predicted Yield for {} in {}, {}: {}",
            self.input.crop,
            self.input.area,
            self.input.year,
            self.result.prediction.display()
        )
    }
}

impl AppState {
    /// Create application state from loaded components
    pub fn new(
        schema: Arc<FeatureSchema>,
        engine: InferenceEngine,
        validator: Validator,
        metrics: Option<PrometheusHandle>,
    ) -> Self {
        let schema_warnings = schema.lint();
        Self {
            assembler: FeatureAssembler::new(schema),
            engine,
            validator,
            schema_warnings,
            metrics,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
            prediction_count: AtomicU64::new(0),
        }
    }

    /// Load the schema and model named by the configuration
    pub fn from_config(config: &AppConfig, metrics: Option<PrometheusHandle>) -> anyhow::Result<Self> {
        let schema = FeatureSchema::load(&config.model.schema_path).with_context(|| {
            format!("failed to load feature schema {}", config.model.schema_path)
        })?;

        let engine = if config.model.mock {
            warn!("Model mock mode enabled; predictions are not from a trained model");
            InferenceEngine::mock()
        } else {
            InferenceEngine::load(&config.model.path, &schema)
                .with_context(|| format!("failed to load model {}", config.model.path))?
        };

        let validator = Validator::new(ValidationConfig::from(&config.validation));
        Ok(Self::new(Arc::new(schema), engine, validator, metrics))
    }

    /// Crop offered when the user has not chosen one
    pub fn default_crop(&self) -> Option<&str> {
        self.assembler.crops().first().map(String::as_str)
    }

    /// Year bounds for the form widget
    pub fn year_range(&self) -> (i32, i32) {
        let (min, max) = self.validator.config().year_range;
        (min as i32, max as i32)
    }

    /// Successful predictions served so far
    pub fn prediction_count(&self) -> u64 {
        self.prediction_count.load(Ordering::Relaxed)
    }

    /// Schema warnings as display strings
    pub fn schema_notices(&self) -> Vec<String> {
        self.schema_warnings.iter().map(ToString::to_string).collect()
    }

    /// Validate, assemble and predict
    pub fn predict(&self, input: YieldInput) -> Result<PredictionOutcome, ApiError> {
        let outcome = self.try_predict(input);
        match &outcome {
            Ok(outcome) => {
                self.prediction_count.fetch_add(1, Ordering::Relaxed);
                metrics::counter!(telemetry::PREDICTIONS_TOTAL, "crop" => outcome.input.crop.clone())
                    .increment(1);
                metrics::histogram!(telemetry::INFERENCE_LATENCY_SECONDS)
                    .record(outcome.result.latency.as_secs_f64());
                info!(
                    "Prediction served: crop={}, area={}, year={}, yield={}",
                    outcome.input.crop,
                    outcome.input.area,
                    outcome.input.year,
                    outcome.result.prediction.display()
                );
            }
            Err(e) => {
                metrics::counter!(telemetry::PREDICTION_ERRORS_TOTAL, "kind" => e.kind()).increment(1);
                warn!("Prediction failed: {}", e);
            }
        }
        outcome
    }

    fn try_predict(&self, input: YieldInput) -> Result<PredictionOutcome, ApiError> {
        let input_warnings = self.validator.validate(&input).into_result()?;
        self.validator
            .validate_crop(&input.crop, self.assembler.crops())?;

        let row = self.assembler.assemble(&input)?;
        let result = self.engine.predict(&row)?;

        let mut warnings: Vec<String> = input_warnings.iter().map(ToString::to_string).collect();
        warnings.extend(self.schema_notices());

        Ok(PredictionOutcome {
            input,
            result,
            warnings,
        })
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub model: ModelHealth,
    pub prediction_count: u64,
}

/// Loaded model summary
#[derive(Debug, Serialize)]
pub struct ModelHealth {
    pub backend: String,
    pub path: String,
    pub columns: usize,
    pub crops: usize,
    pub schema_warnings: usize,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::form::show_form))
        .route("/predict", post(routes::form::submit_form))
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/crops", get(routes::schema::get_crops))
        .route("/api/v1/schema", get(routes::schema::get_schema))
        .route("/api/v1/predictions", post(routes::predictions::create_prediction))
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let status = if state.schema_warnings.is_empty() {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        model: ModelHealth {
            backend: state.engine.backend().to_string(),
            path: state.engine.model_path().to_string(),
            columns: state.assembler.schema().len(),
            crops: state.assembler.crops().len(),
            schema_warnings: state.schema_warnings.len(),
        },
        prediction_count: state.prediction_count(),
    })
}

/// Prometheus exposition
async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            "metrics recorder not installed".to_string(),
        ),
    }
}

/// Run the server
pub async fn run_server(config: &AppConfig, metrics: Option<PrometheusHandle>) -> anyhow::Result<()> {
    let state = Arc::new(AppState::from_config(config, metrics)?);
    let app = create_router(state);

    info!("Starting API server on {}", config.server.addr);

    let listener = tokio::net::TcpListener::bind(&config.server.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server.addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
