//! ONNX model backend

use crate::{InferenceError, Predictor};
use feature_engine::FeatureRow;
use std::path::Path;
use tracing::info;
use tract_onnx::prelude::*;

type Plan = TypedRunnableModel<TypedModel>;

/// Regression model exported to ONNX, taking one `f32 [1, width]` row
pub struct OnnxPredictor {
    plan: Plan,
    input_width: usize,
}

impl OnnxPredictor {
    /// Load and optimize a model whose input is `input_width` columns wide
    pub fn load(path: impl AsRef<Path>, input_width: usize) -> Result<Self, InferenceError> {
        let path = path.as_ref();
        info!(
            "Loading ONNX model from {} (input width {})",
            path.display(),
            input_width
        );

        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|model| model.with_input_fact(0, f32::fact([1, input_width]).into()))
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| InferenceError::ModelLoadError(format!("{}: {e}", path.display())))?;

        info!("Model loaded successfully");
        Ok(Self { plan, input_width })
    }
}

impl Predictor for OnnxPredictor {
    fn predict(&self, row: &FeatureRow) -> Result<f64, InferenceError> {
        let values = row.encode_f32();
        let input: Tensor = tract_ndarray::Array2::from_shape_vec((1, values.len()), values)
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?
            .into();

        let outputs = self
            .plan
            .run(tvec!(input.into()))
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;

        let output = outputs
            .first()
            .ok_or_else(|| InferenceError::InferenceFailed("model produced no outputs".into()))?
            .cast_to::<f32>()
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;
        let value = output
            .as_slice::<f32>()
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?
            .first()
            .copied()
            .ok_or_else(|| InferenceError::InferenceFailed("model output is empty".into()))?;

        Ok(f64::from(value))
    }

    fn input_width(&self) -> Option<usize> {
        Some(self.input_width)
    }

    fn backend(&self) -> &'static str {
        "onnx"
    }
}
