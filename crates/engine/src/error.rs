// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine

use thiserror::Error;
use tw_adapters::{ActuatorError, CapabilityError, VisionError};
use tw_core::{ConfigError, CycleState, OperationKind, PhaseError, RotationError};

/// Errors raised by the cycle, the coordinator, or a command
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("cannot {command} while {state}")]
    InvalidCommand {
        command: &'static str,
        state: CycleState,
    },
    #[error("rotation error: {0}")]
    Rotation(#[from] RotationError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("actuator error: {0}")]
    Actuator(#[from] ActuatorError),
    #[error("vision error: {0}")]
    Vision(#[from] VisionError),
    #[error("{kind} failed: {source}")]
    Operation {
        kind: OperationKind,
        #[source]
        source: CapabilityError,
    },
    #[error("capability error: {0}")]
    Capability(#[from] CapabilityError),
    #[error("{task} panicked")]
    Panicked { task: String },
    #[error("storage session already open when batch {batch_id} started")]
    SessionAlreadyOpen { batch_id: String },
    #[error("storage session is stuck open")]
    SessionStuckOpen,
    #[error("batch phase error: {0}")]
    Phase(#[from] PhaseError),
    #[error("runtime is shut down")]
    ShutDown,
}

impl EngineError {
    /// Errors that move the cycle to `Error`
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            EngineError::SessionAlreadyOpen { .. }
                | EngineError::SessionStuckOpen
                | EngineError::Phase(_)
        )
    }
}
