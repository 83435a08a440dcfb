//! Feature encoding for abalone ring-count model inference.
//!
//! This module turns measurements and a gender into the row layout used when
//! the regressor was trained: the seven measurements followed by the
//! `gender_I` and `gender_M` dummy columns, with Female as the dropped level.

use crate::error::Result;
use crate::types::measurement::{Gender, Measurements, PredictionRequest};
use serde::Serialize;
use std::ops::Index;

/// Number of columns the regressor was trained on.
pub const FEATURE_COUNT: usize = 9;

/// Training column names, in order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Length",
    "Diameter",
    "Height",
    "Whole weight",
    "Shucked weight",
    "Viscera weight",
    "Shell weight",
    "gender_I",
    "gender_M",
];

/// Encoded model input row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        FEATURE_COUNT
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// The `(gender_I, gender_M)` pair.
    pub fn gender_dummies(&self) -> (f64, f64) {
        (self.0[7], self.0[8])
    }

    pub fn into_inner(self) -> [f64; FEATURE_COUNT] {
        self.0
    }
}

impl Index<usize> for FeatureVector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

/// Dummy columns `(gender_I, gender_M)` for a gender. Female is the baseline.
fn gender_dummies(gender: Gender) -> (f64, f64) {
    match gender {
        Gender::Female => (0.0, 0.0),
        Gender::Male => (0.0, 1.0),
        Gender::Infant => (1.0, 0.0),
    }
}

/// Encoder that transforms measurements into model input features.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureEncoder;

impl FeatureEncoder {
    /// Create a new feature encoder.
    pub fn new() -> Self {
        Self
    }

    /// Encode measurements and gender into a feature vector.
    ///
    /// Values outside the documented ranges are passed through unchanged;
    /// only NaN and infinities are rejected.
    pub fn encode(&self, measurements: &Measurements, gender: Gender) -> Result<FeatureVector> {
        measurements.check_finite()?;

        let [length, diameter, height, whole, shucked, viscera, shell] = measurements.values();
        let (is_infant, is_male) = gender_dummies(gender);

        Ok(FeatureVector([
            length, diameter, height, whole, shucked, viscera, shell, is_infant, is_male,
        ]))
    }

    /// Encode a raw request. The gender is resolved before anything else,
    /// so an unknown category never produces a vector.
    pub fn encode_request(&self, request: &PredictionRequest) -> Result<FeatureVector> {
        let gender = request.gender()?;
        self.encode(&request.measurements, gender)
    }

    /// Get the number of features produced.
    pub fn feature_count(&self) -> usize {
        FEATURE_COUNT
    }

    /// Get feature names (training column order).
    pub fn feature_names(&self) -> &'static [&'static str] {
        &FEATURE_NAMES
    }
}
