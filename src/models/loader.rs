//! Model artifact loader

use crate::config::{ModelConfig, ModelFormat};
use crate::error::{PredictError, Result};
use crate::feature_encoder::FEATURE_COUNT;
use crate::models::linear::LinearRegressor;
use crate::models::onnx::OnnxRegressor;
use crate::models::regressor::Regressor;
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::fmt::Display;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

fn load_error(path: &Path, e: impl Display) -> PredictError {
    PredictError::ModelLoad {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

fn ensure_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(PredictError::ModelUnavailable {
            reason: format!("model file not found: {}", path.display()),
        })
    }
}

/// Loader for model artifacts
pub struct ModelLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Create a new model loader with default settings (1 thread)
    pub fn new() -> Self {
        Self::with_threads(1)
    }

    /// Create a new model loader with specified number of ONNX threads
    pub fn with_threads(onnx_threads: usize) -> Self {
        Self { onnx_threads }
    }

    /// Load the configured model as a shared, read-only handle
    pub fn load(&self, config: &ModelConfig) -> Result<Arc<dyn Regressor>> {
        let path = Path::new(&config.path);

        info!(
            model = %config.name,
            path = %path.display(),
            format = ?config.format,
            "Loading model"
        );

        let model: Arc<dyn Regressor> = match config.format {
            ModelFormat::Linear => Arc::new(self.load_linear(path, &config.name)?),
            ModelFormat::Onnx => Arc::new(self.load_onnx(
                path,
                &config.name,
                config.input_name.as_deref(),
                config.output_name.as_deref(),
            )?),
        };

        info!(
            model = %model.name(),
            features = model.n_features(),
            "Model loaded successfully"
        );

        Ok(model)
    }

    /// Load a linear model from a JSON file, reporting it under `name`
    pub fn load_linear<P: AsRef<Path>>(&self, path: P, name: &str) -> Result<LinearRegressor> {
        let path = path.as_ref();
        ensure_exists(path)?;

        let json = std::fs::read_to_string(path).map_err(|e| load_error(path, e))?;
        let model = LinearRegressor::from_json_str(&json, &path.display().to_string())?;

        info!(model = %name, artifact_name = %model.name(), "Linear model loaded");

        Ok(model.with_name(name))
    }

    /// Load an ONNX model from file
    pub fn load_onnx<P: AsRef<Path>>(
        &self,
        path: P,
        name: &str,
        input_name: Option<&str>,
        output_name: Option<&str>,
    ) -> Result<OnnxRegressor> {
        let path = path.as_ref();
        ensure_exists(path)?;

        info!(model = %name, path = %path.display(), threads = self.onnx_threads, "Loading ONNX model");

        let session = Session::builder()
            .map_err(|e| load_error(path, e))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| load_error(path, e))?
            .with_intra_threads(self.onnx_threads)
            .map_err(|e| load_error(path, e))?
            .commit_from_file(path)
            .map_err(|e| load_error(path, e))?;

        // Get input/output names
        let input_name = input_name
            .map(str::to_string)
            .or_else(|| session.inputs.first().map(|i| i.name.clone()))
            .unwrap_or_else(|| "float_input".to_string());

        let output_name = output_name
            .map(str::to_string)
            .or_else(|| {
                session
                    .outputs
                    .iter()
                    .find(|o| o.name.contains("variable") || o.name.contains("output"))
                    .or_else(|| session.outputs.first())
                    .map(|o| o.name.clone())
            })
            .unwrap_or_else(|| "variable".to_string());

        info!(
            model = %name,
            input = %input_name,
            output = %output_name,
            "ONNX model loaded successfully"
        );

        Ok(OnnxRegressor::new(
            name.to_string(),
            session,
            input_name,
            output_name,
            FEATURE_COUNT,
        ))
    }
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shipped_model_path() -> String {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("models/abalone_linear.json")
            .display()
            .to_string()
    }

    #[test]
    fn test_load_shipped_linear_model() {
        let config = ModelConfig {
            path: shipped_model_path(),
            format: ModelFormat::Linear,
            name: "abalone_ols".to_string(),
            onnx_threads: 1,
            input_name: None,
            output_name: None,
        };

        let model = ModelLoader::new().load(&config).unwrap();
        assert_eq!(model.name(), "abalone_ols");
        assert_eq!(model.n_features(), FEATURE_COUNT);
    }

    #[test]
    fn test_configured_name_overrides_artifact_name() {
        let config = ModelConfig {
            path: shipped_model_path(),
            format: ModelFormat::Linear,
            name: "abalone_v2".to_string(),
            onnx_threads: 1,
            input_name: None,
            output_name: None,
        };

        let model = ModelLoader::new().load(&config).unwrap();
        assert_eq!(model.name(), "abalone_v2");

        let model = ModelLoader::new()
            .load_linear(shipped_model_path(), "abalone")
            .unwrap();
        assert_eq!(model.name(), "abalone");
        assert_eq!(model.intercept(), 3.8946);
    }

    #[test]
    fn test_missing_linear_model_is_unavailable() {
        let err = ModelLoader::new()
            .load_linear("models/does_not_exist.json", "abalone")
            .unwrap_err();
        assert_eq!(err.kind(), "model_unavailable");
    }

    #[test]
    fn test_missing_onnx_model_is_unavailable() {
        let err = ModelLoader::with_threads(2)
            .load_onnx("models/does_not_exist.onnx", "abalone", None, None)
            .map(|_| ())
            .unwrap_err();
        assert_eq!(err.kind(), "model_unavailable");
    }
}
