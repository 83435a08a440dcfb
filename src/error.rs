//! Error types for feature encoding and inference.

use thiserror::Error;

/// Errors raised while encoding a request or running a model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictError {
    /// The gender value is not one of Female, Male or Infant.
    #[error("invalid gender category '{value}' (expected F, M or I)")]
    InvalidCategory {
        /// The rejected raw value.
        value: String,
    },

    /// No model handle is available to serve the request.
    #[error("model unavailable: {reason}")]
    ModelUnavailable {
        /// Why the model could not be used.
        reason: String,
    },

    /// The feature vector does not have the shape the model expects.
    #[error("feature mismatch for model '{model}': expected {expected} features, got {actual}")]
    FeatureMismatch {
        /// Model that rejected the vector.
        model: String,
        /// Feature count the model was trained on.
        expected: usize,
        /// Feature count that was supplied.
        actual: usize,
    },

    /// The model runtime rejected the shape of the feature vector.
    #[error("model '{model}' rejected the feature vector: {message}")]
    ShapeRejected {
        /// Model that rejected the vector.
        model: String,
        /// Message reported by the model runtime.
        message: String,
    },

    /// A model artifact lists its columns in a different order than training.
    #[error("column {position} is '{found}', expected '{expected}'")]
    SchemaMismatch {
        /// Zero-based column position.
        position: usize,
        /// Training column name at that position.
        expected: String,
        /// Column name found in the artifact.
        found: String,
    },

    /// A measurement is NaN or infinite.
    #[error("measurement '{field}' must be a finite number, got {value}")]
    NonFiniteMeasurement {
        /// Field name.
        field: &'static str,
        /// Offending value.
        value: f64,
    },

    /// A model artifact exists but could not be loaded.
    #[error("failed to load model from {path}: {message}")]
    ModelLoad {
        /// Artifact path.
        path: String,
        /// Underlying loader message.
        message: String,
    },

    /// The model failed at inference time for a reason other than shape.
    #[error("inference failed in model '{model}': {message}")]
    Inference {
        /// Model name.
        model: String,
        /// Underlying runtime message.
        message: String,
    },
}

impl PredictError {
    /// Stable short name of the error kind, used as a metrics label.
    pub fn kind(&self) -> &'static str {
        match self {
            PredictError::InvalidCategory { .. } => "invalid_category",
            PredictError::ModelUnavailable { .. } => "model_unavailable",
            PredictError::FeatureMismatch { .. } | PredictError::ShapeRejected { .. } => {
                "feature_mismatch"
            }
            PredictError::SchemaMismatch { .. } => "schema_mismatch",
            PredictError::NonFiniteMeasurement { .. } => "non_finite_measurement",
            PredictError::ModelLoad { .. } => "model_load",
            PredictError::Inference { .. } => "inference",
        }
    }
}

/// A specialized Result type for prediction operations.
pub type Result<T> = std::result::Result<T, PredictError>;
