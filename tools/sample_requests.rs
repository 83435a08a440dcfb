//! Sample Request Generator
//!
//! Writes random but physically plausible prediction requests as JSON lines,
//! for feeding `abalone-age-predictor batch`.
//!
//! Usage: sample-requests [count] [invalid_rate]

use abalone_age_predictor::{Gender, Measurements, PredictionRequest};
use rand::Rng;
use std::io::{self, Write};
use tracing::info;

/// Request generator for testing
struct RequestGenerator {
    rng: rand::rngs::ThreadRng,
}

impl RequestGenerator {
    fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }

    /// Generate a specimen whose proportions follow the training data
    fn generate(&mut self) -> PredictionRequest {
        let gender = match self.rng.gen_range(0..3) {
            0 => Gender::Female,
            1 => Gender::Male,
            _ => Gender::Infant,
        };

        // Infants are noticeably smaller
        let length: f64 = match gender {
            Gender::Infant => self.rng.gen_range(0.10..0.55),
            Gender::Female | Gender::Male => self.rng.gen_range(0.30..0.78),
        };
        let diameter = length * self.rng.gen_range(0.74..0.84);
        let height = length * self.rng.gen_range(0.28..0.38);
        let whole_weight = 2.6 * length.powi(3) * self.rng.gen_range(0.85..1.15) + 0.01;

        let measurements = Measurements {
            length: round4(length),
            diameter: round4(diameter),
            height: round4(height),
            whole_weight: round4(whole_weight),
            shucked_weight: round4(whole_weight * self.rng.gen_range(0.38..0.48)),
            viscera_weight: round4(whole_weight * self.rng.gen_range(0.18..0.25)),
            shell_weight: round4(whole_weight * self.rng.gen_range(0.26..0.33)),
        };

        PredictionRequest::new(measurements, gender.code())
    }

    /// Generate a request with a gender outside the known categories
    fn generate_invalid(&mut self) -> PredictionRequest {
        let mut request = self.generate();
        request.gender = self.random_choice(&["Unknown", "X", "", "juvenile"]).to_string();
        request
    }

    fn random_choice<'a>(&mut self, choices: &[&'a str]) -> &'a str {
        choices[self.rng.gen_range(0..choices.len())]
    }
}

/// Fraction of invalid requests; unparsable or non-finite input means none.
fn parse_invalid_rate(arg: Option<&String>) -> f64 {
    arg.and_then(|s| s.parse::<f64>().ok())
        .filter(|rate| rate.is_finite())
        .unwrap_or(0.0)
        .clamp(0.0, 1.0)
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

fn main() -> anyhow::Result<()> {
    // Initialize logging (stderr, stdout carries the requests)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sample_requests=info".parse()?),
        )
        .with_writer(io::stderr)
        .init();

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let count: u64 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(100);
    let invalid_rate = parse_invalid_rate(args.get(2));

    info!(count = count, invalid_rate = invalid_rate, "Generating sample requests");

    let mut generator = RequestGenerator::new();
    let mut rng = rand::thread_rng();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut invalid_count = 0;
    for _ in 0..count {
        let request = if rng.gen_bool(invalid_rate) {
            invalid_count += 1;
            generator.generate_invalid()
        } else {
            generator.generate()
        };

        serde_json::to_writer(&mut out, &request)?;
        writeln!(out)?;
    }
    out.flush()?;

    info!(
        "Completed! Generated {} requests ({} with an invalid gender)",
        count, invalid_count
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_requests_are_valid() {
        let mut generator = RequestGenerator::new();
        for _ in 0..50 {
            let request = generator.generate();
            assert!(request.gender().is_ok());
            assert!(request.measurements.check_finite().is_ok());
            assert!(request.measurements.out_of_range().is_empty());
        }
    }

    #[test]
    fn test_invalid_requests_have_unknown_gender() {
        let mut generator = RequestGenerator::new();
        let request = generator.generate_invalid();
        assert!(request.gender().is_err());
    }

    #[test]
    fn test_generated_lengths_fit_gender() {
        let mut generator = RequestGenerator::new();
        for _ in 0..50 {
            let request = generator.generate();
            let length = request.measurements.length;
            match request.gender().unwrap() {
                Gender::Infant => assert!((0.10..=0.55).contains(&length)),
                Gender::Female | Gender::Male => assert!((0.30..=0.78).contains(&length)),
            }
            assert!(request.measurements.whole_weight > 0.01);
        }
    }

    #[test]
    fn test_parse_invalid_rate() {
        let arg = |s: &str| Some(s.to_string());

        assert_eq!(parse_invalid_rate(arg("0.25").as_ref()), 0.25);
        assert_eq!(parse_invalid_rate(arg("3").as_ref()), 1.0);
        assert_eq!(parse_invalid_rate(arg("-1").as_ref()), 0.0);
        assert_eq!(parse_invalid_rate(arg("NaN").as_ref()), 0.0);
        assert_eq!(parse_invalid_rate(arg("inf").as_ref()), 0.0);
        assert_eq!(parse_invalid_rate(arg("lots").as_ref()), 0.0);
        assert_eq!(parse_invalid_rate(None), 0.0);

        // Any accepted rate is safe to hand to gen_bool.
        let rate = parse_invalid_rate(arg("nan").as_ref());
        assert!(!rand::thread_rng().gen_bool(rate));
    }

    #[test]
    fn test_round4() {
        assert_eq!(round4(0.123456), 0.1235);
    }
}
