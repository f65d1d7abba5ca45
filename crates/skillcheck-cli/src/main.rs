//! validate-skills binary entry point.
//!
//! Exit codes: 0 when every skill is valid, 1 when any error was found,
//! 2 when the run itself failed.

mod cli;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use skillcheck::{ConsoleReporter, JsonReporter, ValidationReport};
use tracing_subscriber::EnvFilter;

use cli::{Cli, OutputFormat};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_level());

    match run(&cli).await {
        Ok(report) => ExitCode::from(u8::try_from(report.exit_code()).unwrap_or(1)),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<ValidationReport> {
    let validator = cli.validator().context("invalid configuration")?;

    let report = match cli.format {
        OutputFormat::Text => validator.run(&mut ConsoleReporter::stdio()).await,
        OutputFormat::Json => {
            validator
                .run(&mut JsonReporter::new(std::io::stdout()))
                .await
        }
    }
    .context("validation aborted")?;

    Ok(report)
}

/// Log to stderr; `RUST_LOG` overrides the verbosity flags
fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
