//! Prediction Routes

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use feature_engine::YieldInput;
use serde::Serialize;
use std::sync::Arc;

use crate::{ApiError, AppState};

/// Response for predictions endpoint
#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub crop: String,
    pub area: String,
    pub year: i32,
    pub yield_hg_per_ha: f64,
    pub display: String,
    pub latency_ms: u64,
    pub latency_seconds: f64,
    pub timestamp_ms: u64,
    pub warnings: Vec<String>,
}

/// Predict yield for a JSON input; omitted fields take the form defaults
pub async fn create_prediction(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<YieldInput>, JsonRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let Json(mut input) = payload?;
    if input.crop.is_empty() {
        if let Some(crop) = state.default_crop() {
            input.crop = crop.to_string();
        }
    }

    let outcome = state.predict(input)?;
    let prediction = &outcome.result.prediction;

    Ok(Json(PredictionResponse {
        display: prediction.display(),
        yield_hg_per_ha: prediction.yield_hg_per_ha,
        timestamp_ms: prediction.timestamp_ms,
        latency_ms: outcome.result.latency_ms(),
        latency_seconds: outcome.result.latency.as_secs_f64(),
        crop: outcome.input.crop,
        area: outcome.input.area,
        year: outcome.input.year,
        warnings: outcome.warnings,
    }))
}
