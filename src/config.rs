//! Configuration management for the age predictor

use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;

/// On-disk format of the model artifact
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelFormat {
    /// JSON file with intercept and one coefficient per training column
    #[default]
    Linear,
    /// ONNX graph executed through ONNX Runtime
    Onnx,
}

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub model: ModelConfig,
    #[serde(default)]
    pub prediction: PredictionConfig,
    pub logging: LoggingConfig,
}

/// Model artifact configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Path of the model artifact
    pub path: String,
    /// Artifact format: "linear" or "onnx"
    #[serde(default)]
    pub format: ModelFormat,
    /// Name reported in logs and prediction reports
    #[serde(default = "default_model_name")]
    pub name: String,
    /// Number of intra-op threads for ONNX inference (default: 1)
    #[serde(default = "default_onnx_threads")]
    pub onnx_threads: usize,
    /// ONNX input name; discovered from the graph when unset
    #[serde(default)]
    pub input_name: Option<String>,
    /// ONNX output name; discovered from the graph when unset
    #[serde(default)]
    pub output_name: Option<String>,
}

fn default_model_name() -> String {
    "abalone".to_string()
}

fn default_onnx_threads() -> usize {
    1
}

/// Prediction behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct PredictionConfig {
    /// Log a warning for measurements outside their documented range
    #[serde(default = "default_warn_out_of_range")]
    pub warn_out_of_range: bool,
}

fn default_warn_out_of_range() -> bool {
    true
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            warn_out_of_range: default_warn_out_of_range(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl AppConfig {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig {
                path: "models/abalone_linear.json".to_string(),
                format: ModelFormat::Linear,
                name: default_model_name(),
                onnx_threads: 1,
                input_name: None,
                output_name: None,
            },
            prediction: PredictionConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.model.format, ModelFormat::Linear);
        assert_eq!(config.model.name, "abalone");
        assert_eq!(config.model.onnx_threads, 1);
        assert!(config.prediction.warn_out_of_range);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_shipped_config() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/config.toml");
        let config = AppConfig::load_from_path(&path).unwrap();

        assert_eq!(config.model.format, ModelFormat::Linear);
        assert_eq!(config.model.path, "models/abalone_linear.json");
        assert!(config.model.input_name.is_none());
    }

    #[test]
    fn test_missing_config_file_fails() {
        assert!(AppConfig::load_from_path("does/not/exist.toml").is_err());
    }
}
