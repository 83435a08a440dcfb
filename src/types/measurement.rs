//! Measurement and gender inputs for a single prediction request

use crate::error::{PredictError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Physical measurements of one abalone, in the units of the training data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurements {
    /// Longest shell measurement
    #[serde(alias = "Length")]
    pub length: f64,

    /// Shell diameter, perpendicular to length
    #[serde(alias = "Diameter")]
    pub diameter: f64,

    /// Height with meat in shell
    #[serde(alias = "Height")]
    pub height: f64,

    /// Whole abalone weight
    #[serde(alias = "Whole weight")]
    pub whole_weight: f64,

    /// Weight of meat
    #[serde(alias = "Shucked weight")]
    pub shucked_weight: f64,

    /// Gut weight after bleeding
    #[serde(alias = "Viscera weight")]
    pub viscera_weight: f64,

    /// Shell weight after drying
    #[serde(alias = "Shell weight")]
    pub shell_weight: f64,
}

/// Documented plausible range for a measurement. Advisory only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementRange {
    pub min: f64,
    pub max: f64,
}

impl MeasurementRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Field names in training column order, with their documented ranges.
pub const MEASUREMENT_FIELDS: [(&str, MeasurementRange); 7] = [
    ("length", MeasurementRange::new(0.0, 1.0)),
    ("diameter", MeasurementRange::new(0.0, 1.0)),
    ("height", MeasurementRange::new(0.0, 1.0)),
    ("whole_weight", MeasurementRange::new(0.0, 4.0)),
    ("shucked_weight", MeasurementRange::new(0.0, 2.0)),
    ("viscera_weight", MeasurementRange::new(0.0, 2.0)),
    ("shell_weight", MeasurementRange::new(0.0, 2.0)),
];

/// A measurement that lies outside its documented range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutOfRange {
    pub field: &'static str,
    pub value: f64,
    pub range: MeasurementRange,
}

impl Measurements {
    /// Initial values of the original entry form.
    pub fn form_defaults() -> Self {
        Self {
            length: 0.52,
            diameter: 0.41,
            height: 0.14,
            whole_weight: 0.83,
            shucked_weight: 0.22,
            viscera_weight: 0.18,
            shell_weight: 0.18,
        }
    }

    /// Values in training column order.
    pub fn values(&self) -> [f64; 7] {
        [
            self.length,
            self.diameter,
            self.height,
            self.whole_weight,
            self.shucked_weight,
            self.viscera_weight,
            self.shell_weight,
        ]
    }

    /// Reject NaN and infinite values. Nothing else is validated.
    pub fn check_finite(&self) -> Result<()> {
        for (&(field, _), value) in MEASUREMENT_FIELDS.iter().zip(self.values()) {
            if !value.is_finite() {
                return Err(PredictError::NonFiniteMeasurement { field, value });
            }
        }
        Ok(())
    }

    /// Fields whose values fall outside the documented ranges.
    pub fn out_of_range(&self) -> Vec<OutOfRange> {
        MEASUREMENT_FIELDS
            .iter()
            .zip(self.values())
            .filter(|((_, range), value)| !range.contains(*value))
            .map(|(&(field, range), value)| OutOfRange {
                field,
                value,
                range,
            })
            .collect()
    }
}

/// Categorical gender of the specimen.
///
/// Female is the baseline level of the dummy encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Gender {
    Female,
    Male,
    Infant,
}

impl Gender {
    /// The explicit initial selection of the entry form.
    pub fn initial() -> Self {
        Gender::Female
    }

    /// Single-letter code used in the training data.
    pub fn code(&self) -> &'static str {
        match self {
            Gender::Female => "F",
            Gender::Male => "M",
            Gender::Infant => "I",
        }
    }
}

impl FromStr for Gender {
    type Err = PredictError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "f" | "female" => Ok(Gender::Female),
            "m" | "male" => Ok(Gender::Male),
            "i" | "infant" => Ok(Gender::Infant),
            _ => Err(PredictError::InvalidCategory {
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Gender {
    type Error = PredictError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Gender> for String {
    fn from(gender: Gender) -> Self {
        gender.code().to_string()
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One submission as received from a caller.
///
/// Gender stays a raw string here so an unknown category is reported as
/// [`PredictError::InvalidCategory`] instead of a deserialization failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    #[serde(flatten)]
    pub measurements: Measurements,

    #[serde(alias = "Gender", alias = "sex", alias = "Sex")]
    pub gender: String,
}

impl PredictionRequest {
    pub fn new(measurements: Measurements, gender: impl Into<String>) -> Self {
        Self {
            measurements,
            gender: gender.into(),
        }
    }

    /// Parse the gender field.
    pub fn gender(&self) -> Result<Gender> {
        self.gender.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_parsing() {
        assert_eq!("F".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!("male".parse::<Gender>().unwrap(), Gender::Male);
        assert_eq!(" I ".parse::<Gender>().unwrap(), Gender::Infant);
        assert_eq!("Infant".parse::<Gender>().unwrap(), Gender::Infant);

        let err = "Unknown".parse::<Gender>().unwrap_err();
        assert_eq!(
            err,
            PredictError::InvalidCategory {
                value: "Unknown".to_string()
            }
        );
    }

    #[test]
    fn test_gender_serialization() {
        let json = serde_json::to_string(&Gender::Infant).unwrap();
        assert_eq!(json, "\"I\"");

        let parsed: Gender = serde_json::from_str("\"M\"").unwrap();
        assert_eq!(parsed, Gender::Male);

        assert!(serde_json::from_str::<Gender>("\"X\"").is_err());
    }

    #[test]
    fn test_check_finite() {
        let mut m = Measurements::form_defaults();
        assert!(m.check_finite().is_ok());

        m.viscera_weight = f64::INFINITY;
        let err = m.check_finite().unwrap_err();
        assert_eq!(err.kind(), "non_finite_measurement");
        assert!(err.to_string().contains("viscera_weight"));
    }

    #[test]
    fn test_out_of_range_is_reported_not_rejected() {
        let mut m = Measurements::form_defaults();
        assert!(m.out_of_range().is_empty());

        m.length = 1.4;
        m.shell_weight = -0.1;
        let flagged = m.out_of_range();
        assert_eq!(flagged.len(), 2);
        assert_eq!(flagged[0].field, "length");
        assert_eq!(flagged[1].field, "shell_weight");
        assert!(m.check_finite().is_ok());
    }

    #[test]
    fn test_request_accepts_training_column_names() {
        let json = r#"{
            "Length": 0.455, "Diameter": 0.365, "Height": 0.095,
            "Whole weight": 0.514, "Shucked weight": 0.2245,
            "Viscera weight": 0.101, "Shell weight": 0.15, "Sex": "M"
        }"#;

        let request: PredictionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.measurements.length, 0.455);
        assert_eq!(request.measurements.shucked_weight, 0.2245);
        assert_eq!(request.gender().unwrap(), Gender::Male);
    }

    #[test]
    fn test_request_keeps_unknown_gender_raw() {
        let json = r#"{
            "length": 0.5, "diameter": 0.4, "height": 0.1,
            "whole_weight": 0.6, "shucked_weight": 0.2,
            "viscera_weight": 0.1, "shell_weight": 0.2, "gender": "Unknown"
        }"#;

        let request: PredictionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.gender().unwrap_err().kind(), "invalid_category");
    }
}
