//! Command-line entry point for the verdict aggregator.
//!
//! Replays a recorded test-run event log through the aggregation session
//! and writes the JSON verdict document.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use verdict::{cli, logging};

#[derive(Parser)]
#[command(
    name = "verdict",
    version,
    about = "Aggregates test-run events into a JSON verdict file"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a recorded event log and write the verdict document.
    Replay {
        /// Event log: JSON Lines, one phase report per line.
        events: PathBuf,
        /// Create the JSON verdict file at the given path.
        #[arg(long, value_name = "path")]
        json: String,
        /// TOML file with per-test json_extra annotations.
        #[arg(long, value_name = "path")]
        annotations: Option<PathBuf>,
        /// Count outcomes outside passed/failed/skipped as reruns.
        #[arg(long)]
        rerun_support: bool,
        /// Act as a distributed-run worker; aggregation is suppressed.
        #[arg(long)]
        worker: bool,
    },
    /// Print the tallies of an existing verdict document.
    Show {
        verdict: PathBuf,
    },
}

fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();
    match cli.command {
        Command::Replay {
            events,
            json,
            annotations,
            rerun_support,
            worker,
        } => cli::replay(&events, &json, annotations.as_deref(), rerun_support, worker),
        Command::Show { verdict } => cli::show(&verdict),
    }
}
