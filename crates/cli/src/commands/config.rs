// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Config commands

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};
use tw_core::TidewatchConfig;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration as TOML
    Show {
        /// Configuration file; defaults apply when omitted
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Validate a configuration file
    Check {
        /// Configuration file
        path: PathBuf,
    },
}

pub fn handle(command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show { config } => {
            let config = load(config.as_deref())?;
            print!("{}", config.to_toml()?);
        }
        ConfigCommand::Check { path } => {
            let config = load(Some(&path))?;
            println!(
                "ok: {} ({} pairs, threshold {}, debounce {})",
                path.display(),
                config.rotation.pairs.len(),
                config.rotation.pair_threshold,
                humantime::format_duration(config.batch.debounce_window)
            );
        }
    }
    Ok(())
}

/// Load `path`, or the defaults when none is given
pub fn load(path: Option<&Path>) -> Result<TidewatchConfig> {
    match path {
        Some(path) => TidewatchConfig::load(path)
            .with_context(|| format!("cannot use config {}", path.display())),
        None => Ok(TidewatchConfig::default()),
    }
}
