//! The capability the predictor needs from a trained model

use crate::error::Result;

/// A loaded regression model.
///
/// Implementations are loaded once and then used read-only, possibly from
/// several threads at the same time.
pub trait Regressor: Send + Sync {
    /// Model name for logs and reports
    fn name(&self) -> &str;

    /// Number of input columns the model was trained on
    fn n_features(&self) -> usize;

    /// Predict a single row, returning the first scalar of the model output
    fn predict_row(&self, row: &[f64]) -> Result<f64>;
}
