//! Linear regression model stored as JSON

use crate::error::{PredictError, Result};
use crate::feature_encoder::{FEATURE_COUNT, FEATURE_NAMES};
use crate::models::regressor::Regressor;
use serde::{Deserialize, Serialize};

/// Serialized parameters of a fitted linear model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearParams {
    pub name: String,
    pub intercept: f64,
    /// Training column names, one per coefficient
    pub columns: Vec<String>,
    pub coefficients: Vec<f64>,
}

/// Ordinary least squares model: `intercept + Σ coefficient·feature`
#[derive(Debug, Clone)]
pub struct LinearRegressor {
    params: LinearParams,
}

impl LinearRegressor {
    /// Build a model after checking its columns against the training layout.
    pub fn new(params: LinearParams) -> Result<Self> {
        if params.coefficients.len() != params.columns.len()
            || params.coefficients.len() != FEATURE_COUNT
        {
            return Err(PredictError::FeatureMismatch {
                model: params.name,
                expected: FEATURE_COUNT,
                actual: params.coefficients.len().max(params.columns.len()),
            });
        }

        for (position, (found, expected)) in params.columns.iter().zip(FEATURE_NAMES).enumerate() {
            if found != expected {
                return Err(PredictError::SchemaMismatch {
                    position,
                    expected: expected.to_string(),
                    found: found.clone(),
                });
            }
        }

        Ok(Self { params })
    }

    /// Parse and validate a JSON artifact.
    pub fn from_json_str(json: &str, path: &str) -> Result<Self> {
        let params: LinearParams =
            serde_json::from_str(json).map_err(|e| PredictError::ModelLoad {
                path: path.to_string(),
                message: e.to_string(),
            })?;
        Self::new(params)
    }

    /// Replace the name stored in the artifact.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.params.name = name.into();
        self
    }

    pub fn intercept(&self) -> f64 {
        self.params.intercept
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.params.coefficients
    }
}

impl Regressor for LinearRegressor {
    fn name(&self) -> &str {
        &self.params.name
    }

    fn n_features(&self) -> usize {
        self.params.coefficients.len()
    }

    fn predict_row(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.params.coefficients.len() {
            return Err(PredictError::FeatureMismatch {
                model: self.params.name.clone(),
                expected: self.params.coefficients.len(),
                actual: row.len(),
            });
        }

        let dot: f64 = self
            .params
            .coefficients
            .iter()
            .zip(row)
            .map(|(w, x)| w * x)
            .sum();

        Ok(self.params.intercept + dot)
    }
}
