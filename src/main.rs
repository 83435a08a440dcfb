//! Abalone Age Predictor - Main Entry Point
//!
//! Loads the configured model once, then serves a single prediction or a
//! JSON-lines batch from the command line.

use abalone_age_predictor::{
    cli::{Cli, Commands},
    config::{AppConfig, LoggingConfig},
    metrics::PredictionMetrics,
    models::inference::AgePredictor,
};
use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Logs go to stderr; stdout carries prediction output.
fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match config.format.as_str() {
        "json" => builder.json().init(),
        _ => builder.init(),
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_found = cli.config.exists();
    let config = if config_found {
        AppConfig::load_from_path(&cli.config)?
    } else {
        AppConfig::default()
    };

    init_logging(&config.logging)?;

    if config_found {
        info!(path = %cli.config.display(), "Configuration loaded successfully");
    } else {
        warn!(path = %cli.config.display(), "Configuration file not found, using defaults");
    }

    match &cli.command {
        Commands::Features(cmd) => cmd.run()?,
        Commands::Predict(cmd) => {
            let predictor = AgePredictor::from_config(&config)?;
            cmd.run(&predictor)?;
        }
        Commands::Batch(cmd) => {
            let predictor = AgePredictor::from_config(&config)?;
            let metrics = PredictionMetrics::new();
            let summary = cmd.run(&predictor, &metrics)?;
            info!(
                succeeded = summary.succeeded,
                failed = summary.failed,
                "Batch complete"
            );
        }
    }

    Ok(())
}
