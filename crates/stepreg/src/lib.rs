//! stepreg CLI Library
//!
//! Command-line front end for `stepreg-core`: reads a CSV, screens
//! correlations, fits OLS, eliminates insignificant predictors and prints the
//! resulting forecast model.
//!
//! # Example
//!
//! ```bash
//! # Text report on stdout
//! stepreg data/monthly.csv
//!
//! # Stricter selection, JSON report to a file
//! stepreg data/monthly.csv --significance-level 0.01 --format json --output report.json
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;

use stepreg_core::{
    run_analysis, AnalysisConfig, AnalysisReport, CorrelationConfig, Dataset, EliminationConfig,
};

/// Backward-elimination regression over a CSV table.
///
/// The first column is an identifier (usually a date) and is ignored, the
/// second is the dependent variable, every further column is a predictor
/// candidate.
#[derive(Parser, Debug)]
#[command(name = "stepreg")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input CSV file with a header row
    pub input: PathBuf,

    /// Remove predictors whose p-value is strictly above this level
    #[arg(long, default_value_t = 0.05)]
    pub significance_level: f64,

    /// Report variable pairs whose |r| is strictly above this
    #[arg(long, default_value_t = 0.5)]
    pub correlation_threshold: f64,

    /// Label of the intercept term in the output
    #[arg(long, default_value = "constant")]
    pub constant_name: String,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Report formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    Text,
    /// Pretty-printed JSON
    Json,
}

impl Cli {
    /// Analysis options from the command line.
    pub fn analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            correlation: CorrelationConfig {
                threshold: self.correlation_threshold,
            },
            elimination: EliminationConfig {
                significance_level: self.significance_level,
                ..EliminationConfig::default()
            },
            constant_name: self.constant_name.clone(),
        }
    }

    /// Default log directive for the chosen verbosity.
    pub fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 => "stepreg=info,stepreg_core=info",
            1 => "stepreg=debug,stepreg_core=debug",
            _ => "stepreg=trace,stepreg_core=trace",
        }
    }

    /// Load, analyse and write the report.
    pub fn run(&self) -> Result<AnalysisReport> {
        let config = self.analysis_config();
        config.validate().context("invalid options")?;

        let data = Dataset::from_csv_path(&self.input)
            .with_context(|| format!("failed to load {}", self.input.display()))?;

        let report = run_analysis(&data, &config)
            .with_context(|| format!("analysis of {} failed", self.input.display()))?;

        let rendered = render(&report, self.format)?;
        match &self.output {
            Some(path) => {
                fs::write(path, rendered)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                info!(path = %path.display(), "report written");
            }
            None => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(rendered.as_bytes())?;
                stdout.flush()?;
            }
        }
        Ok(report)
    }
}

/// Render a report in the requested format.
pub fn render(report: &AnalysisReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(report.to_string()),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(report).context("failed to serialize report")?;
            json.push('\n');
            Ok(json)
        }
    }
}
