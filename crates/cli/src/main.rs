// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tw - tidewatch CLI

mod adapters;
mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{config, simulate};

#[derive(Parser)]
#[command(
    name = "tw",
    version,
    about = "tidewatch - acquisition cycle with batched maintenance"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the cycle against the simulated environment
    Simulate(simulate::SimulateArgs),
    /// Configuration inspection
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging();

    match cli.command {
        Commands::Simulate(args) => simulate::simulate(args).await,
        Commands::Config(args) => config::handle(args.command),
    }
}

/// Logs go to stderr so stdout stays parseable
fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
