//! Abalone Age Predictor Library
//!
//! Encodes abalone measurements into the fixed column layout of a
//! pre-trained ring-count regressor, runs the model, and derives the
//! estimated age (rings + 1.5 years).

pub mod cli;
pub mod config;
pub mod error;
pub mod feature_encoder;
pub mod metrics;
pub mod models;
pub mod types;

pub use config::AppConfig;
pub use error::PredictError;
pub use feature_encoder::{FeatureEncoder, FeatureVector};
pub use models::inference::{predict, AgePredictor};
pub use models::regressor::Regressor;
pub use types::{
    measurement::{Gender, Measurements, PredictionRequest},
    prediction::{PredictionReport, PredictionResult},
};
