//! Prediction outputs

use crate::types::measurement::{Gender, Measurements};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Years added to a ring count to obtain the age of the specimen.
pub const RINGS_TO_AGE_OFFSET: f64 = 1.5;

/// Raw model output and the age derived from it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Ring count as returned by the model (not clamped)
    pub predicted_rings: f64,
    /// predicted_rings + 1.5
    pub estimated_age_years: f64,
}

impl PredictionResult {
    pub fn from_rings(predicted_rings: f64) -> Self {
        Self {
            predicted_rings,
            estimated_age_years: predicted_rings + RINGS_TO_AGE_OFFSET,
        }
    }
}

impl fmt::Display for PredictionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Predicted Rings:       {:.2}", self.predicted_rings)?;
        write!(f, "Predicted Age (years): {:.2}", self.estimated_age_years)
    }
}

/// Record of one completed prediction, suitable for JSON output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionReport {
    /// Unique request identifier
    pub request_id: String,

    /// Name of the model that produced the prediction
    pub model: String,

    /// Encoded gender
    pub gender: Gender,

    /// Inputs as submitted
    pub measurements: Measurements,

    /// Ring count predicted by the model
    pub predicted_rings: f64,

    /// Age derived from the ring count
    pub estimated_age_years: f64,

    /// Report generation timestamp
    pub timestamp: DateTime<Utc>,
}

impl PredictionReport {
    /// Create a new report for a finished prediction
    pub fn new(
        model: impl Into<String>,
        gender: Gender,
        measurements: Measurements,
        result: PredictionResult,
    ) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            model: model.into(),
            gender,
            measurements,
            predicted_rings: result.predicted_rings,
            estimated_age_years: result.estimated_age_years,
            timestamp: Utc::now(),
        }
    }

    pub fn result(&self) -> PredictionResult {
        PredictionResult {
            predicted_rings: self.predicted_rings,
            estimated_age_years: self.estimated_age_years,
        }
    }
}
