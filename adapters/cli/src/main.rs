#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives a Robodino session from a script.

mod config;
mod runner;
mod script;

use std::{
    fs::File,
    io::{self, BufReader},
    path::PathBuf,
};

use anyhow::{ensure, Context, Result};
use clap::Parser;
use robodino_system_session::Session;
use tracing_subscriber::EnvFilter;

use crate::runner::Runner;

/// Runs a Robodino simulation script.
#[derive(Debug, Parser)]
#[command(name = "robodino", version, about)]
struct CliArgs {
    /// TOML file overriding the session defaults.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Script to execute; commands are read from stdin when omitted.
    #[arg(long, value_name = "PATH")]
    script: Option<PathBuf>,

    /// Print the simulation state as JSON after every mutating command.
    #[arg(long)]
    json: bool,
}

/// Entry point for the Robodino command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = CliArgs::parse();
    let config = config::load(args.config.as_deref())?;
    let session = Session::new(config);
    let mut runner = Runner::new(session, args.json, io::stdout().lock(), io::stderr());

    let summary = match &args.script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open script at {}", path.display()))?;
            runner.run(BufReader::new(file))?
        }
        None => runner.run(io::stdin().lock())?,
    };

    tracing::info!(
        executed = summary.executed,
        failed = summary.failed,
        "script finished"
    );
    ensure!(
        summary.failed == 0,
        "{} of {} commands failed",
        summary.failed,
        summary.executed
    );
    Ok(())
}
