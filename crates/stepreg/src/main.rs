//! stepreg - backward-elimination regression from the command line.

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use stepreg::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only the report
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_directive())))
        .init();

    info!(input = %cli.input.display(), "stepreg starting");

    let report = cli.run()?;

    info!(
        kept = report.model_items.len(),
        eliminated = report.eliminated.len(),
        "stepreg completed successfully"
    );
    Ok(())
}
