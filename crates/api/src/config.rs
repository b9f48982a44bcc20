//! Service configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional TOML
//! file, then `CROP_YIELD__SECTION__KEY` environment variables.

use config::{Config, ConfigError, Environment, File};
use data_validator::ValidationConfig;
use serde::{Deserialize, Serialize};

/// Environment variable naming the config file
pub const CONFIG_PATH_ENV: &str = "CROP_YIELD_CONFIG";
/// Config file used when `CROP_YIELD_CONFIG` is unset
pub const DEFAULT_CONFIG_FILE: &str = "crop-yield.toml";

const ENV_PREFIX: &str = "CROP_YIELD";

/// Top-level service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub validation: ValidationSettings,
    pub logging: LoggingConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Model and schema artifacts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// ONNX model file
    pub path: String,
    /// JSON feature schema file
    pub schema_path: String,
    /// Use the rule-based mock model instead of loading `path`
    pub mock: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: "models/crop_yield.onnx".to_string(),
            schema_path: "models/model_features.json".to_string(),
            mock: false,
        }
    }
}

/// Input limits enforced before prediction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationSettings {
    pub year_min: i32,
    pub year_max: i32,
    /// Reject negative rainfall and pesticide amounts
    pub non_negative: bool,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            year_min: 1960,
            year_max: 2035,
            non_negative: false,
        }
    }
}

impl From<&ValidationSettings> for ValidationConfig {
    fn from(settings: &ValidationSettings) -> Self {
        let amounts = if settings.non_negative {
            (0.0, f64::MAX)
        } else {
            (f64::MIN, f64::MAX)
        };
        ValidationConfig {
            year_range: (f64::from(settings.year_min), f64::from(settings.year_max)),
            rainfall_range: amounts,
            pesticides_range: amounts,
            ..ValidationConfig::default()
        }
    }
}

/// Log output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Maximum level: trace, debug, info, warn or error
    pub level: String,
    /// Emit JSON lines instead of human-readable text
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load from the file named by `CROP_YIELD_CONFIG` (or `crop-yield.toml`)
    /// and the environment
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(&path)
    }

    /// Load from an explicit file path (which may be absent) and the environment
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()
    }
}
