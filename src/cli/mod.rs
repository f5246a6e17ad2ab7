//! # Command Line Interface
//!
//! Reads captured traffic from disk, runs the analysis engine and prints the
//! inferred model. Everything here sits outside the analysis core.

pub mod output;
pub mod records;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use crate::config::ObservabilityConfig;
use crate::observability::{init_logging, log_config_info};
use crate::services::{normalize_path, TrafficAnalyzer};
use output::{print_analysis, OutputFormat};

#[derive(Parser)]
#[command(name = "apiscope")]
#[command(about = "Infer API models from captured HTTP traffic")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a traffic capture (JSON array or NDJSON of records)
    Analyze {
        /// Path to the record file
        file: PathBuf,

        /// Output format (json, yaml, or table)
        #[arg(short, long, default_value = "json")]
        format: String,
    },

    /// Print the normalized template for each path or URL
    Normalize {
        /// Paths or URLs to normalize
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

/// Run CLI commands
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = ObservabilityConfig::from_env().context("Invalid logging configuration")?;
    if cli.verbose {
        config = config.verbose();
    }
    init_logging(&config)?;
    log_config_info(&config);

    match cli.command {
        Commands::Analyze { file, format } => handle_analyze(&file, &format)?,
        Commands::Normalize { paths } => {
            for line in normalize_lines(&paths) {
                println!("{}", line);
            }
        }
    }

    Ok(())
}

fn handle_analyze(file: &std::path::Path, format: &str) -> anyhow::Result<()> {
    let format: OutputFormat = format.parse()?;
    let records = records::load_records(file)
        .with_context(|| format!("Failed to load traffic from {}", file.display()))?;
    info!(file = %file.display(), records = records.len(), "Loaded traffic records");

    let result = TrafficAnalyzer::new().analyze(&records);
    print_analysis(&result, format)
}

/// `raw<TAB>template` for each input
pub fn normalize_lines(paths: &[String]) -> Vec<String> {
    paths.iter().map(|raw| format!("{}\t{}", raw, normalize_path(raw).template)).collect()
}
