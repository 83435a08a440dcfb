//! Predictor facade: encode a request, run the model, derive the age

use crate::config::AppConfig;
use crate::error::{PredictError, Result};
use crate::feature_encoder::{FeatureEncoder, FeatureVector};
use crate::models::loader::ModelLoader;
use crate::models::regressor::Regressor;
use crate::types::measurement::{Gender, Measurements, PredictionRequest};
use crate::types::prediction::{PredictionReport, PredictionResult};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Run a model on an encoded feature vector.
///
/// Fails with [`PredictError::ModelUnavailable`] when no model is given and
/// with [`PredictError::FeatureMismatch`] when the model was trained on a
/// different number of columns. Errors raised by the model are returned as is.
pub fn predict(model: Option<&dyn Regressor>, features: &FeatureVector) -> Result<PredictionResult> {
    let model = model.ok_or_else(|| PredictError::ModelUnavailable {
        reason: "no model loaded".to_string(),
    })?;

    if model.n_features() != features.len() {
        return Err(PredictError::FeatureMismatch {
            model: model.name().to_string(),
            expected: model.n_features(),
            actual: features.len(),
        });
    }

    let rings = model.predict_row(features.as_slice())?;
    Ok(PredictionResult::from_rings(rings))
}

/// Holds the process-wide model handle and serves predictions against it
#[derive(Clone)]
pub struct AgePredictor {
    /// Shared read-only model; `None` until one has been loaded
    model: Option<Arc<dyn Regressor>>,
    encoder: FeatureEncoder,
    /// Log measurements outside their documented range
    warn_out_of_range: bool,
}

impl AgePredictor {
    /// Create a predictor around an already loaded model
    pub fn new(model: Arc<dyn Regressor>) -> Self {
        Self {
            model: Some(model),
            encoder: FeatureEncoder::new(),
            warn_out_of_range: false,
        }
    }

    /// Create a predictor with no model; every prediction fails as unavailable
    pub fn unloaded() -> Self {
        Self {
            model: None,
            encoder: FeatureEncoder::new(),
            warn_out_of_range: false,
        }
    }

    /// Load the configured model and build a predictor around it
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let loader = ModelLoader::with_threads(config.model.onnx_threads);
        let model = loader.load(&config.model)?;

        info!(
            model = %model.name(),
            warn_out_of_range = config.prediction.warn_out_of_range,
            "Age predictor initialized"
        );

        Ok(Self::new(model).with_range_warnings(config.prediction.warn_out_of_range))
    }

    pub fn with_range_warnings(mut self, enabled: bool) -> Self {
        self.warn_out_of_range = enabled;
        self
    }

    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }

    /// Name of the loaded model, if any
    pub fn model_name(&self) -> Option<&str> {
        self.model.as_deref().map(|m| m.name())
    }

    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    /// Run inference on an encoded feature vector
    pub fn predict(&self, features: &FeatureVector) -> Result<PredictionResult> {
        predict(self.model.as_deref(), features)
    }

    /// Encode a raw request and run inference on it
    pub fn predict_request(&self, request: &PredictionRequest) -> Result<PredictionResult> {
        let gender = request.gender()?;
        self.predict_measurements(&request.measurements, gender)
    }

    /// Predict and wrap the outcome in a report
    pub fn report(&self, request: &PredictionRequest) -> Result<PredictionReport> {
        let gender = request.gender()?;
        let result = self.predict_measurements(&request.measurements, gender)?;

        Ok(PredictionReport::new(
            self.model_name().unwrap_or("unknown"),
            gender,
            request.measurements,
            result,
        ))
    }

    fn predict_measurements(
        &self,
        measurements: &Measurements,
        gender: Gender,
    ) -> Result<PredictionResult> {
        let features = self.encoder.encode(measurements, gender)?;

        if self.warn_out_of_range {
            for flagged in measurements.out_of_range() {
                warn!(
                    field = flagged.field,
                    value = flagged.value,
                    min = flagged.range.min,
                    max = flagged.range.max,
                    "Measurement outside documented range, model may extrapolate"
                );
            }
        }

        let result = self.predict(&features)?;

        debug!(
            gender = %gender,
            predicted_rings = result.predicted_rings,
            estimated_age_years = result.estimated_age_years,
            "Prediction complete"
        );

        Ok(result)
    }
}
