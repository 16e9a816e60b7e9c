// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tw-core: data model and pure state machines for tidewatch
//!
//! This crate provides:
//! - Tool rotation (paired tools, usage counters, pending switches)
//! - The de-duplicating maintenance operation queue
//! - Cycle and batch state machines with their synchronization flags
//! - Maintenance trigger evaluation, statistics, and configuration

pub mod clock;
pub mod config;
pub mod id;
pub mod tool;

// State machines (order matters for dependencies)
pub mod rotation;
pub mod operation;
pub mod queue;
pub mod flags;
pub mod cycle;
pub mod batch;
pub mod triggers;
pub mod stats;

// Re-exports
pub use batch::{Batch, BatchPhase, BatchReport, DeferredOutcome, PhaseError, SessionOutcome};
pub use clock::{Clock, FakeClock, TokioClock};
pub use config::{
    BatchConfig, ConfigError, CycleConfig, RotationConfig, SessionConfig, TidewatchConfig,
    TriggerConfig,
};
pub use cycle::{CycleInput, CycleState};
pub use flags::{DeferredAction, SyncFlags};
pub use id::{IdGen, SequentialIdGen, UuidIdGen};
pub use operation::{Operation, OperationKind, TriggerReason};
pub use queue::{EnqueueOutcome, OperationQueue};
pub use rotation::{RotationAllocator, RotationError, RotationSnapshot};
pub use stats::CycleStats;
pub use tool::{SlotStatus, ToolId, ToolPair};
pub use triggers::{MaintenanceTriggers, Trigger};
