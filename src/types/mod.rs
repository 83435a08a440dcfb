//! Type definitions for prediction requests and results

pub mod measurement;
pub mod prediction;

pub use measurement::{Gender, Measurements, PredictionRequest};
pub use prediction::{PredictionReport, PredictionResult, RINGS_TO_AGE_OFFSET};
