//! Yield Inference Engine
//!
//! Runs the pre-trained yield regressor over assembled feature rows.

mod engine;
mod mock;
mod onnx;

pub use engine::{InferenceEngine, InferenceResult, YieldPrediction};
pub use mock::MockPredictor;
pub use onnx::OnnxPredictor;

use feature_engine::FeatureRow;
use thiserror::Error;

/// Errors during inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Model load failed: {0}")]
    ModelLoadError(String),
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    #[error("Invalid input shape: expected {expected}, got {actual}")]
    InvalidInputShape { expected: String, actual: String },
}

/// A loaded regression model
pub trait Predictor: Send + Sync {
    /// Predict a single scalar for one row
    fn predict(&self, row: &FeatureRow) -> Result<f64, InferenceError>;

    /// Number of input columns the model was built for, when fixed
    fn input_width(&self) -> Option<usize> {
        None
    }

    /// Short backend name for logs and health reports
    fn backend(&self) -> &'static str;
}
