//! Input Validator for Range Checking

use crate::error::ValidationError;
use feature_engine::YieldInput;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Year valid range (matches the form widget)
    pub year_range: (f64, f64),
    /// Rainfall valid range (mm/year)
    pub rainfall_range: (f64, f64),
    /// Temperature valid range (°C)
    pub temperature_range: (f64, f64),
    /// Pesticide usage valid range (tonnes)
    pub pesticides_range: (f64, f64),
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            year_range: (1960.0, 2035.0),
            rainfall_range: (f64::MIN, f64::MAX),
            temperature_range: (f64::MIN, f64::MAX),
            pesticides_range: (f64::MIN, f64::MAX),
        }
    }
}

/// Non-fatal input observation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    /// Country left blank; the model receives an empty label
    BlankArea,
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::BlankArea => write!(f, "country is blank"),
        }
    }
}

/// Result of validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether all values are valid
    pub valid: bool,
    /// List of validation errors
    pub errors: Vec<ValidationError>,
    /// Observations that do not block a prediction
    pub warnings: Vec<ValidationWarning>,
    /// Number of fields validated
    pub fields_checked: usize,
}

impl ValidationResult {
    /// First error, if any
    pub fn first_error(&self) -> Option<&ValidationError> {
        self.errors.first()
    }

    /// Convert into a `Result`, keeping the first error
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ValidationError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(self.warnings),
        }
    }
}

/// Validator for prediction inputs
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate a single value against a range
    pub fn validate_range(
        &self,
        field: &'static str,
        value: f64,
        range: (f64, f64),
    ) -> Result<(), ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::NotFinite { field, value });
        }
        if value < range.0 || value > range.1 {
            Err(ValidationError::OutOfRange {
                field,
                value,
                min: range.0,
                max: range.1,
            })
        } else {
            Ok(())
        }
    }

    /// Validate year
    pub fn validate_year(&self, year: i32) -> Result<(), ValidationError> {
        self.validate_range("year", f64::from(year), self.config.year_range)
    }

    /// Validate rainfall
    pub fn validate_rainfall(&self, rainfall: f64) -> Result<(), ValidationError> {
        self.validate_range("rainfall", rainfall, self.config.rainfall_range)
    }

    /// Validate temperature
    pub fn validate_temperature(&self, temperature: f64) -> Result<(), ValidationError> {
        self.validate_range("temperature", temperature, self.config.temperature_range)
    }

    /// Validate pesticide usage
    pub fn validate_pesticides(&self, pesticides: f64) -> Result<(), ValidationError> {
        self.validate_range("pesticides", pesticides, self.config.pesticides_range)
    }

    /// Validate that a crop is one the model offers
    pub fn validate_crop(&self, crop: &str, crops: &[String]) -> Result<(), ValidationError> {
        if crop.is_empty() {
            return Err(ValidationError::MissingField("crop"));
        }
        if crops.iter().any(|c| c == crop) {
            Ok(())
        } else {
            Err(ValidationError::UnknownCrop(crop.to_string()))
        }
    }

    /// Validate every numeric field of an input, collecting all errors
    pub fn validate(&self, input: &YieldInput) -> ValidationResult {
        let checks = [
            self.validate_year(input.year),
            self.validate_rainfall(input.rainfall),
            self.validate_temperature(input.temperature),
            self.validate_pesticides(input.pesticides),
        ];
        let fields_checked = checks.len();
        let errors: Vec<ValidationError> = checks.into_iter().filter_map(Result::err).collect();

        let mut warnings = Vec::new();
        if input.area.trim().is_empty() {
            warnings.push(ValidationWarning::BlankArea);
        }

        if !errors.is_empty() {
            debug!("Input rejected with {} error(s): {:?}", errors.len(), errors);
        }

        ValidationResult {
            valid: errors.is_empty(),
            errors,
            warnings,
            fields_checked,
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_year_bounds() {
        let validator = Validator::default();
        assert!(validator.validate_year(1960).is_ok());
        assert!(validator.validate_year(2035).is_ok());
        assert!(validator.validate_year(1959).is_err());
        assert!(validator.validate_year(2036).is_err());
    }

    #[test]
    fn test_default_input_is_valid() {
        let result = Validator::default().validate(&YieldInput::for_crop("Rice"));
        assert!(result.valid);
        assert!(result.warnings.is_empty());
        assert_eq!(result.fields_checked, 4);
    }

    #[test]
    fn test_collects_all_errors() {
        let input = YieldInput {
            year: 1900,
            rainfall: f64::NAN,
            temperature: f64::INFINITY,
            ..Default::default()
        };
        let result = Validator::default().validate(&input);
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 3);
        assert!(matches!(
            result.first_error(),
            Some(ValidationError::OutOfRange { field: "year", .. })
        ));
        assert!(matches!(
            result.errors[1],
            ValidationError::NotFinite { field: "rainfall", .. }
        ));
    }

    #[test]
    fn test_configured_ranges() {
        let validator = Validator::new(ValidationConfig {
            pesticides_range: (0.0, 1000.0),
            ..Default::default()
        });
        assert!(validator.validate_pesticides(450.0).is_ok());
        assert!(validator.validate_pesticides(-1.0).is_err());
        // Unbounded by default
        assert!(validator.validate_rainfall(-5.0).is_ok());
    }

    #[test]
    fn test_blank_area_is_a_warning() {
        let input = YieldInput {
            area: "  ".to_string(),
            ..YieldInput::for_crop("Rice")
        };
        let warnings = Validator::default().validate(&input).into_result().unwrap();
        assert_eq!(warnings, vec![ValidationWarning::BlankArea]);
    }

    #[test]
    fn test_crop_membership() {
        let validator = Validator::default();
        let crops = vec!["Maize".to_string(), "Rice".to_string()];
        assert!(validator.validate_crop("Rice", &crops).is_ok());
        assert_eq!(
            validator.validate_crop("Yams", &crops),
            Err(ValidationError::UnknownCrop("Yams".to_string()))
        );
        assert_eq!(
            validator.validate_crop("", &crops),
            Err(ValidationError::MissingField("crop"))
        );
    }

    proptest! {
        #[test]
        fn prop_years_in_form_range_accepted(year in 1960i32..=2035) {
            prop_assert!(Validator::default().validate_year(year).is_ok());
        }

        #[test]
        fn prop_years_outside_form_range_rejected(year in prop_oneof![i32::MIN..1960, 2036..=i32::MAX]) {
            prop_assert!(Validator::default().validate_year(year).is_err());
        }
    }
}
