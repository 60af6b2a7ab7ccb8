//! Command line front-end for inspecting and converting feature weight files.

mod commands;
mod config;
mod telemetry;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands::{ConvertArgs, InspectArgs};
use crate::telemetry::init_telemetry;

/// Inspect and convert feature weight files.
#[derive(Parser)]
#[command(name = "weights")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load a weight file, validate it and report its largest features.
    Inspect(InspectArgs),
    /// Load a weight file and write it back out; binary when a perfect hash is configured.
    Convert(ConvertArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_telemetry();
    match cli.command {
        Command::Inspect(args) => commands::run_inspect(args),
        Command::Convert(args) => commands::run_convert(args),
    }
}
