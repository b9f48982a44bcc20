//! User-facing prediction inputs

use serde::{Deserialize, Serialize};

/// The six values a user supplies for one prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YieldInput {
    /// Harvest year
    pub year: i32,
    /// Average rainfall (mm/year)
    pub rainfall: f64,
    /// Average temperature (°C)
    pub temperature: f64,
    /// Pesticide usage (tonnes)
    pub pesticides: f64,
    /// Country, passed through as raw text
    pub area: String,
    /// Crop name, without the `Item_` prefix
    pub crop: String,
}

impl Default for YieldInput {
    fn default() -> Self {
        Self {
            year: 2025,
            rainfall: 2000.0,
            temperature: 25.0,
            pesticides: 450.0,
            area: "Bangladesh".to_string(),
            crop: String::new(),
        }
    }
}

impl YieldInput {
    /// Default inputs for the given crop
    pub fn for_crop(crop: impl Into<String>) -> Self {
        Self {
            crop: crop.into(),
            ..Default::default()
        }
    }
}
