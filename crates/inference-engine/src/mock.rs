//! Rule-based stand-in model for development

use crate::{InferenceError, Predictor};
use feature_engine::{
    FeatureRow, CROP_PREFIX, PESTICIDES_COLUMN, RAINFALL_COLUMN, TEMPERATURE_COLUMN, YEAR_COLUMN,
};

/// Deterministic yield heuristic; used when no real model is configured
#[derive(Debug, Clone, Default)]
pub struct MockPredictor;

impl MockPredictor {
    const BASE_YIELD: f64 = 30_000.0;
    const CROP_STEP: f64 = 5_000.0;
    const OPTIMAL_TEMP: f64 = 22.0;

    fn number(row: &FeatureRow, column: &str) -> f64 {
        row.column(column).and_then(|v| v.as_f64()).unwrap_or(0.0)
    }
}

impl Predictor for MockPredictor {
    fn predict(&self, row: &FeatureRow) -> Result<f64, InferenceError> {
        let year = Self::number(row, YEAR_COLUMN);
        let rainfall = Self::number(row, RAINFALL_COLUMN);
        let pesticides = Self::number(row, PESTICIDES_COLUMN);
        let temperature = Self::number(row, TEMPERATURE_COLUMN);

        // Each crop gets its own baseline, by position among the indicators
        let crop_rank = row
            .columns()
            .filter(|(column, _)| column.starts_with(CROP_PREFIX))
            .position(|(_, value)| value.as_f64() == Some(1.0))
            .unwrap_or(0) as f64;

        let estimate = Self::BASE_YIELD
            + crop_rank * Self::CROP_STEP
            + rainfall * 3.0
            + pesticides * 0.5
            + (year - 1990.0) * 150.0
            - (temperature - Self::OPTIMAL_TEMP).abs() * 800.0;

        Ok(estimate.max(0.0))
    }

    fn backend(&self) -> &'static str {
        "mock"
    }
}
