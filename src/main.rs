//! `ticket-severity` command line: score tickets against a model directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use ticket_severity::{LoggingConfig, SeverityConfig, SeverityPredictor, SeverityScaler};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ticket-severity")]
#[command(about = "Severity scoring for English and Hindi IT tickets", long_about = None)]
struct Cli {
    /// YAML config file; `TICKET_SEVERITY__*` environment variables override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Overrides `model_dir` from the config
    #[arg(long, global = true)]
    model_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a single ticket
    Predict { text: String },
    /// Score every ticket in a file (one per line, or a JSON array of strings)
    Batch {
        #[arg(long)]
        input: PathBuf,
    },
    /// Fit a severity scaler on raw regressor outputs and save it
    FitScaler {
        /// One number per line, or a JSON array of numbers
        #[arg(long)]
        scores: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },
    /// Show the loaded model bundle
    Info,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = SeverityConfig::load(cli.config.as_deref()).context("failed to load config")?;
    if let Some(dir) = cli.model_dir {
        config.model_dir = dir;
    }
    init_tracing(&config.logging);

    match cli.command {
        Commands::Predict { text } => {
            let predictor = SeverityPredictor::new(config)?;
            print_json(&predictor.predict_single(&text).await)?;
        }
        Commands::Batch { input } => {
            let tickets = read_tickets(&input)?;
            let predictor = SeverityPredictor::new(config)?;
            print_json(&predictor.predict_batch_report(&tickets).await)?;
        }
        Commands::FitScaler { scores, output } => {
            let raw = read_scores(&scores)?;
            let mut scaler = SeverityScaler::new(config.scoring.min_score, config.scoring.max_score)?;
            scaler.fit(&raw)?;
            scaler
                .save(&output)
                .with_context(|| format!("failed to write {}", output.display()))?;
            print_json(&scaler.info())?;
        }
        Commands::Info => {
            let predictor = SeverityPredictor::new(config)?;
            print_json(&predictor.model_info())?;
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout stays machine readable. `RUST_LOG` wins over
/// the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_tickets(path: &Path) -> anyhow::Result<Vec<String>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    if content.trim_start().starts_with('[') {
        return serde_json::from_str(&content)
            .with_context(|| format!("{} is not a JSON array of strings", path.display()));
    }
    Ok(content.lines().map(str::to_string).collect())
}

fn read_scores(path: &Path) -> anyhow::Result<Vec<f64>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    if content.trim_start().starts_with('[') {
        return serde_json::from_str(&content)
            .with_context(|| format!("{} is not a JSON array of numbers", path.display()));
    }
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(i, line)| {
            line.parse::<f64>()
                .with_context(|| format!("line {}: '{line}' is not a number", i + 1))
        })
        .collect()
}
