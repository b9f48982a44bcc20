//! Inference Engine Implementation

use crate::mock::MockPredictor;
use crate::onnx::OnnxPredictor;
use crate::{InferenceError, Predictor};
use feature_engine::{FeatureRow, FeatureSchema};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Unit the model predicts in
pub const YIELD_UNIT: &str = "hg/ha";

/// Predicted yield
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldPrediction {
    /// Predicted yield (hectograms per hectare)
    pub yield_hg_per_ha: f64,
    /// Timestamp when prediction was made
    pub timestamp_ms: u64,
}

impl YieldPrediction {
    /// Value to two decimals with its unit, e.g. `"41234.57 hg/ha"`
    pub fn display(&self) -> String {
        format!("{:.2} {}", self.yield_hg_per_ha, YIELD_UNIT)
    }
}

/// Result of inference operation
#[derive(Debug, Clone)]
pub struct InferenceResult {
    /// The prediction
    pub prediction: YieldPrediction,
    /// Time spent in the model
    pub latency: Duration,
}

impl InferenceResult {
    /// Latency rounded down to whole milliseconds
    pub fn latency_ms(&self) -> u64 {
        self.latency.as_millis() as u64
    }
}

/// Inference engine owning the loaded model
pub struct InferenceEngine {
    /// Model path
    model_path: String,
    /// Loaded model
    predictor: Box<dyn Predictor>,
}

impl InferenceEngine {
    /// Load an ONNX model sized for the given schema
    pub fn load(model_path: impl AsRef<Path>, schema: &FeatureSchema) -> Result<Self, InferenceError> {
        let model_path = model_path.as_ref();
        let predictor = OnnxPredictor::load(model_path, schema.len())?;
        Ok(Self::with_predictor(
            model_path.display().to_string(),
            Box::new(predictor),
        ))
    }

    /// Create a mock inference engine for development and testing
    pub fn mock() -> Self {
        info!("Creating mock inference engine");
        Self::with_predictor("mock", Box::new(MockPredictor))
    }

    /// Wrap an already loaded predictor
    pub fn with_predictor(model_path: impl Into<String>, predictor: Box<dyn Predictor>) -> Self {
        let model_path = model_path.into();
        info!(
            "Inference engine ready: backend={}, model={}",
            predictor.backend(),
            model_path
        );
        Self {
            model_path,
            predictor,
        }
    }

    /// Run inference on an assembled row
    pub fn predict(&self, row: &FeatureRow) -> Result<InferenceResult, InferenceError> {
        let start = Instant::now();

        if let Some(expected) = self.predictor.input_width() {
            if expected != row.len() {
                return Err(InferenceError::InvalidInputShape {
                    expected: format!("[1, {expected}]"),
                    actual: format!("[1, {}]", row.len()),
                });
            }
        }

        let value = self.predictor.predict(row)?;
        if !value.is_finite() {
            warn!("Model returned non-finite yield: {}", value);
            return Err(InferenceError::InferenceFailed(format!(
                "model returned non-finite value {value}"
            )));
        }

        let timestamp_ms = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        let latency = start.elapsed();
        debug!("Inference completed in {:?}: {:.2} {}", latency, value, YIELD_UNIT);

        Ok(InferenceResult {
            prediction: YieldPrediction {
                yield_hg_per_ha: value,
                timestamp_ms,
            },
            latency,
        })
    }

    /// Backend name of the loaded model
    pub fn backend(&self) -> &'static str {
        self.predictor.backend()
    }

    /// Get model path
    pub fn model_path(&self) -> &str {
        &self.model_path
    }
}
