// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Simulate command: run the cycle against the simulated world

use crate::adapters;
use crate::commands::config;
use crate::output::{self, OutputFormat};
use anyhow::{bail, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tw_adapters::{SimConfig, SimSnapshot};
use tw_core::{BatchReport, CycleState, CycleStats, RotationSnapshot, TokioClock, UuidIdGen};
use tw_engine::{CycleObserver, Runtime};

#[derive(Args)]
pub struct SimulateArgs {
    /// Configuration file (TOML); defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stop after this many successes
    #[arg(long)]
    successes: Option<u64>,

    /// Wall-clock limit for the run
    #[arg(long, value_parser = humantime::parse_duration, default_value = "30s")]
    max_time: Duration,

    /// Detection polls before each bite, cycled; 0 means no bite
    #[arg(long, value_delimiter = ',')]
    bite_pattern: Option<Vec<u32>>,

    /// Bait loaded by each restock
    #[arg(long)]
    bait: Option<u32>,

    /// Catches before a tool needs servicing
    #[arg(long)]
    wear_limit: Option<u32>,

    /// Maintenance to request as soon as the cycle starts
    #[arg(long = "request", value_enum)]
    requests: Vec<Request>,

    /// Switch the rotation to this tool once started
    #[arg(long)]
    switch_to: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Request {
    Restock,
    Cleanup,
    Service,
}

impl SimulateArgs {
    fn sim_config(&self) -> SimConfig {
        let mut sim = SimConfig::default();
        if let Some(pattern) = &self.bite_pattern {
            sim.bite_pattern = pattern.clone();
        }
        if let Some(bait) = self.bait {
            sim.bait_capacity = bait;
        }
        if let Some(limit) = self.wear_limit {
            sim.wear_limit = limit;
        }
        sim
    }
}

/// How the run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum Outcome {
    Reached,
    TimedOut,
    Halted,
    Interrupted,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Outcome::Reached => "reached",
            Outcome::TimedOut => "timed out",
            Outcome::Halted => "halted",
            Outcome::Interrupted => "interrupted",
        };
        write!(f, "{}", name)
    }
}

/// Observer feeding the run loop
struct Progress {
    successes: watch::Sender<u64>,
    state: watch::Sender<CycleState>,
    reports: Mutex<Vec<BatchReport>>,
}

impl Progress {
    fn new() -> Self {
        Self {
            successes: watch::Sender::new(0),
            state: watch::Sender::new(CycleState::Starting),
            reports: Mutex::new(Vec::new()),
        }
    }

    fn reports(&self) -> Vec<BatchReport> {
        self.reports
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl CycleObserver for Progress {
    fn on_state_change(&self, _old: CycleState, new: CycleState) {
        self.state.send_replace(new);
    }

    fn on_success(&self, count: u64) {
        self.successes.send_replace(count);
    }

    fn on_batch_complete(&self, report: &BatchReport) {
        self.reports
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(report.clone());
    }
}

#[derive(Debug, Serialize)]
struct Summary {
    outcome: Outcome,
    state: CycleState,
    stats: CycleStats,
    rotation: RotationSnapshot,
    world: SimSnapshot,
    batches: Vec<BatchReport>,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = &self.stats;
        writeln!(f, "outcome: {}", self.outcome)?;
        writeln!(f, "state: {}", self.state)?;
        writeln!(f, "successes: {}", stats.successes)?;
        writeln!(f, "failures: {}", stats.failures)?;
        writeln!(
            f,
            "batches: {} (open failures {}, close failures {})",
            stats.batches_run, stats.session_open_failures, stats.session_close_failures
        )?;
        writeln!(
            f,
            "operations: {} executed, {} failed, {} duplicate requests",
            stats.operations_executed, stats.operations_failed, stats.duplicate_requests
        )?;
        writeln!(
            f,
            "pair switches: {} (deferred run {}, skipped {})",
            stats.pair_switches, stats.deferred_switches_run, stats.deferred_switches_skipped
        )?;
        writeln!(f, "active tool: {}", self.rotation.current_tool)?;
        writeln!(
            f,
            "world: {} casts, {} catches, {} lost, bait {}, inventory {}",
            self.world.casts,
            self.world.catches,
            self.world.lost,
            self.world.bait,
            self.world.inventory
        )
    }
}

pub async fn simulate(args: SimulateArgs) -> Result<()> {
    let config = config::load(args.config.as_deref())?;
    let (world, deps) = adapters::simulated(&config, args.sim_config());
    let runtime = Runtime::spawn(deps, config, TokioClock, UuidIdGen)?;

    let progress = Arc::new(Progress::new());
    runtime.subscribe(progress.clone());
    let mut successes = progress.successes.subscribe();
    let mut state = progress.state.subscribe();

    runtime.start()?;
    for request in &args.requests {
        let outcome = match request {
            Request::Restock => runtime.request_restock(),
            Request::Cleanup => runtime.request_cleanup(),
            Request::Service => runtime.request_service(),
        };
        tracing::info!(?request, ?outcome, "requested");
    }
    if let Some(tool) = &args.switch_to {
        runtime.request_pair_switch(tool.as_str())?;
    }

    let outcome = tokio::select! {
        _ = reach(&mut successes, args.successes) => Outcome::Reached,
        _ = state.wait_for(|s| s.is_halted()) => Outcome::Halted,
        _ = tokio::time::sleep(args.max_time) => Outcome::TimedOut,
        _ = tokio::signal::ctrl_c() => Outcome::Interrupted,
    };
    let final_state = runtime.state();
    runtime.shutdown().await;
    tracing::info!(%outcome, "simulation finished");

    let summary = Summary {
        outcome,
        state: final_state,
        stats: runtime.stats(),
        rotation: runtime.rotation(),
        world: world.snapshot(),
        batches: progress.reports(),
    };
    output::print(&summary, args.format)?;

    match outcome {
        Outcome::TimedOut if args.successes.is_some() => bail!(
            "{} elapsed with {} of {} successes",
            humantime::format_duration(args.max_time),
            summary.stats.successes,
            args.successes.unwrap_or_default()
        ),
        Outcome::Halted => bail!("cycle halted in state {}", final_state),
        _ => Ok(()),
    }
}

/// Resolves once `target` successes were seen; never without a target
async fn reach(successes: &mut watch::Receiver<u64>, target: Option<u64>) {
    match target {
        Some(target) => {
            let _ = successes.wait_for(|n| *n >= target).await;
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
#[path = "simulate_tests.rs"]
mod tests;
