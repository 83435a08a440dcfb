//! ONNX Runtime backed regressor

use crate::error::{PredictError, Result};
use crate::models::regressor::Regressor;
use ort::session::Session;
use ort::value::Tensor;
use std::sync::Mutex;
use tracing::debug;

/// Regressor exported to ONNX (e.g. via skl2onnx)
pub struct OnnxRegressor {
    /// Model name
    name: String,
    /// ONNX Runtime session; running it needs exclusive access
    session: Mutex<Session>,
    /// Input name for the model
    input_name: String,
    /// Output name holding the prediction
    output_name: String,
    /// Number of input columns
    n_features: usize,
}

impl OnnxRegressor {
    pub fn new(
        name: String,
        session: Session,
        input_name: String,
        output_name: String,
        n_features: usize,
    ) -> Self {
        Self {
            name,
            session: Mutex::new(session),
            input_name,
            output_name,
            n_features,
        }
    }

    pub fn input_name(&self) -> &str {
        &self.input_name
    }

    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    fn inference_error(&self, message: impl ToString) -> PredictError {
        PredictError::Inference {
            model: self.name.clone(),
            message: message.to_string(),
        }
    }
}

/// Whether an ONNX Runtime error message describes a rejected input shape.
fn is_shape_error(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    ["dimension", "shape", "rank", "invalid_argument"]
        .iter()
        .any(|needle| message.contains(needle))
}

/// Map an error raised by `Session::run`, keeping the runtime's message.
fn run_error(model: &str, message: String) -> PredictError {
    if is_shape_error(&message) {
        PredictError::ShapeRejected {
            model: model.to_string(),
            message,
        }
    } else {
        PredictError::Inference {
            model: model.to_string(),
            message,
        }
    }
}

impl Regressor for OnnxRegressor {
    fn name(&self) -> &str {
        &self.name
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_row(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.n_features {
            return Err(PredictError::FeatureMismatch {
                model: self.name.clone(),
                expected: self.n_features,
                actual: row.len(),
            });
        }

        // Prepare input tensor - shape [1, num_features]
        let shape = vec![1_i64, row.len() as i64];
        let values: Vec<f32> = row.iter().map(|&v| v as f32).collect();
        let input_tensor =
            Tensor::from_array((shape, values)).map_err(|e| self.inference_error(e))?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| self.inference_error(format!("Lock error: {}", e)))?;

        let outputs = session
            .run(ort::inputs![&self.input_name => input_tensor])
            .map_err(|e| run_error(&self.name, e.to_string()))?;

        let output = outputs
            .get(self.output_name.as_str())
            .ok_or_else(|| self.inference_error(format!("missing output '{}'", self.output_name)))?;

        let (_, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| self.inference_error(e))?;

        let rings = data
            .first()
            .copied()
            .ok_or_else(|| self.inference_error("empty output tensor"))?;

        debug!(model = %self.name, rings = rings, "ONNX inference complete");

        Ok(rings as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ModelConfig, ModelFormat};
    use crate::feature_encoder::{FeatureEncoder, FEATURE_COUNT};
    use crate::models::loader::ModelLoader;
    use crate::types::measurement::{Gender, Measurements};

    #[test]
    fn test_shape_error_detection() {
        assert!(is_shape_error(
            "Got invalid dimensions for input: float_input for the following indices"
        ));
        assert!(is_shape_error("[ONNXRuntimeError] : 2 : INVALID_ARGUMENT"));
        assert!(!is_shape_error("out of memory"));
    }

    #[test]
    fn test_run_error_keeps_runtime_message() {
        let message = "Got invalid dimensions for input: float_input for the following \
                       indices index: 1 Got: 8 Expected: 9"
            .to_string();

        let err = run_error("abalone_onnx", message.clone());
        assert_eq!(err.kind(), "feature_mismatch");
        assert_eq!(
            err,
            PredictError::ShapeRejected {
                model: "abalone_onnx".to_string(),
                message: message.clone(),
            }
        );
        assert!(err.to_string().contains(&message));

        let err = run_error("abalone_onnx", "out of memory".to_string());
        assert_eq!(err.kind(), "inference");
        assert!(err.to_string().contains("out of memory"));
    }

    // The tests below need the ONNX Runtime shared library.
    // Run them with `cargo test -- --ignored`.

    fn shipped_onnx_model() -> OnnxRegressor {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("models/abalone_linear.onnx");
        ModelLoader::new()
            .load_onnx(&path, "abalone_onnx", None, None)
            .map_err(|e| e.to_string())
            .unwrap()
    }

    #[test]
    #[ignore = "requires the ONNX Runtime library"]
    fn test_onnx_discovers_io_names() {
        let model = shipped_onnx_model();
        assert_eq!(model.input_name(), "float_input");
        assert_eq!(model.output_name(), "variable");
        assert_eq!(model.n_features(), FEATURE_COUNT);
    }

    #[test]
    #[ignore = "requires the ONNX Runtime library"]
    fn test_onnx_matches_linear_artifact() {
        let onnx = shipped_onnx_model();
        let linear = ModelLoader::new()
            .load_linear(
                std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("models/abalone_linear.json"),
                "abalone_ols",
            )
            .unwrap();

        let features = FeatureEncoder::new()
            .encode(&Measurements::form_defaults(), Gender::Male)
            .unwrap();

        let from_onnx = onnx.predict_row(features.as_slice()).unwrap();
        let from_linear = linear.predict_row(features.as_slice()).unwrap();
        assert!((from_onnx - from_linear).abs() < 1e-3);
    }

    #[test]
    #[ignore = "requires the ONNX Runtime library"]
    fn test_onnx_format_through_loader() {
        let config = ModelConfig {
            path: std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
                .join("models/abalone_linear.onnx")
                .display()
                .to_string(),
            format: ModelFormat::Onnx,
            name: "abalone_onnx".to_string(),
            onnx_threads: 1,
            input_name: None,
            output_name: None,
        };

        let model = ModelLoader::new().load(&config).unwrap();
        assert_eq!(model.name(), "abalone_onnx");

        let row = [0.455, 0.365, 0.095, 0.514, 0.2245, 0.101, 0.15, 0.0, 1.0];
        assert!(model.predict_row(&row).unwrap().is_finite());
    }

    #[test]
    #[ignore = "requires the ONNX Runtime library"]
    fn test_onnx_rejects_short_row() {
        let model = shipped_onnx_model();
        let err = model.predict_row(&[0.5; 8]).unwrap_err();
        assert_eq!(err.kind(), "feature_mismatch");
    }
}
