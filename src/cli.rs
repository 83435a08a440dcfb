//! Command-line front end: single predictions, JSON-lines batches and the
//! feature contract.

use crate::feature_encoder::{FEATURE_COUNT, FEATURE_NAMES};
use crate::metrics::PredictionMetrics;
use crate::models::inference::AgePredictor;
use crate::types::measurement::{Gender, Measurements, PredictionRequest, MEASUREMENT_FIELDS};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

/// Predict abalone ring count and age from physical measurements.
#[derive(Parser, Debug)]
#[command(name = "abalone-age-predictor", version, about)]
pub struct Cli {
    /// Configuration file; defaults are used when it does not exist
    #[arg(long, global = true, default_value = "config/config.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Predict a single specimen from command-line values
    Predict(PredictCommand),
    /// Predict every JSON line of a file (or stdin)
    Batch(BatchCommand),
    /// Print the model column contract and documented input ranges
    Features(FeaturesCommand),
}

/// Values default to the initial values of the original entry form.
#[derive(Args, Debug)]
pub struct PredictCommand {
    #[arg(long, default_value_t = 0.52, allow_negative_numbers = true)]
    pub length: f64,

    #[arg(long, default_value_t = 0.41, allow_negative_numbers = true)]
    pub diameter: f64,

    #[arg(long, default_value_t = 0.14, allow_negative_numbers = true)]
    pub height: f64,

    #[arg(long, default_value_t = 0.83, allow_negative_numbers = true)]
    pub whole_weight: f64,

    #[arg(long, default_value_t = 0.22, allow_negative_numbers = true)]
    pub shucked_weight: f64,

    #[arg(long, default_value_t = 0.18, allow_negative_numbers = true)]
    pub viscera_weight: f64,

    #[arg(long, default_value_t = 0.18, allow_negative_numbers = true)]
    pub shell_weight: f64,

    /// F (female), M (male) or I (infant)
    #[arg(long, default_value_t = Gender::initial().code().to_string())]
    pub gender: String,

    /// Print the full report as JSON
    #[arg(long)]
    pub json: bool,
}

impl PredictCommand {
    pub fn request(&self) -> PredictionRequest {
        PredictionRequest::new(
            Measurements {
                length: self.length,
                diameter: self.diameter,
                height: self.height,
                whole_weight: self.whole_weight,
                shucked_weight: self.shucked_weight,
                viscera_weight: self.viscera_weight,
                shell_weight: self.shell_weight,
            },
            self.gender.clone(),
        )
    }

    pub fn run(&self, predictor: &AgePredictor) -> Result<()> {
        let report = predictor
            .report(&self.request())
            .context("Prediction failed")?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("{}", report.result());
        }

        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct BatchCommand {
    /// JSON-lines input; reads stdin when omitted
    #[arg(long, short)]
    pub input: Option<PathBuf>,
}

/// Outcome counts of a batch run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: u64,
    pub failed: u64,
}

impl BatchCommand {
    pub fn run(&self, predictor: &AgePredictor, metrics: &PredictionMetrics) -> Result<BatchSummary> {
        let stdout = io::stdout();
        let mut writer = stdout.lock();

        let summary = match &self.input {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("Failed to open {}", path.display()))?;
                info!(input = %path.display(), "Processing batch file");
                process_lines(predictor, metrics, BufReader::new(file), &mut writer)?
            }
            None => {
                info!("Processing batch from stdin");
                process_lines(predictor, metrics, io::stdin().lock(), &mut writer)?
            }
        };

        metrics.print_summary();
        Ok(summary)
    }
}

/// Predict each non-empty JSON line of `reader`, writing one JSON report per
/// success to `writer`. Failures are logged and counted, never fatal.
pub fn process_lines<R: BufRead, W: Write>(
    predictor: &AgePredictor,
    metrics: &PredictionMetrics,
    reader: R,
    writer: &mut W,
) -> Result<BatchSummary> {
    let mut summary = BatchSummary::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read input line")?;
        let line_no = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        let request: PredictionRequest = match serde_json::from_str(&line) {
            Ok(request) => request,
            Err(e) => {
                warn!(line = line_no, error = %e, "Failed to deserialize request");
                metrics.record_failure("malformed_request");
                summary.failed += 1;
                continue;
            }
        };

        let start = Instant::now();
        match predictor.report(&request) {
            Ok(report) => {
                metrics.record_prediction(start.elapsed(), &report.result());
                serde_json::to_writer(&mut *writer, &report)?;
                writeln!(writer)?;
                summary.succeeded += 1;
            }
            Err(e) => {
                warn!(line = line_no, kind = e.kind(), error = %e, "Prediction failed");
                metrics.record_failure(e.kind());
                summary.failed += 1;
            }
        }
    }

    writer.flush()?;
    Ok(summary)
}

#[derive(Args, Debug)]
pub struct FeaturesCommand {}

impl FeaturesCommand {
    pub fn run(&self) -> Result<()> {
        print!("{}", render_features());
        Ok(())
    }
}

/// Human-readable description of the model input contract
pub fn render_features() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>3}  {:<16} {}", "#", "column", "documented range");

    for (i, name) in FEATURE_NAMES.iter().enumerate() {
        let range = match MEASUREMENT_FIELDS.get(i) {
            Some((_, range)) => format!("[{}, {}]", range.min, range.max),
            None => "dummy, 0 or 1 (Female = baseline)".to_string(),
        };
        let _ = writeln!(out, "{:>3}  {:<16} {}", i, name, range);
    }

    let _ = writeln!(out, "{} columns; estimated age = rings + 1.5", FEATURE_COUNT);
    out
}
