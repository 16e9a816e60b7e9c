// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cycle state machine
//!
//! Pure transition table for the acquisition cycle. The engine owns the
//! driver loop; this module only decides which state an input leads to.

use serde::{Deserialize, Serialize};

/// The state of the acquisition cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleState {
    Stopped,
    /// Checking dependencies before the first attempt
    Starting,
    /// Repeatedly performing the core action
    Attempting,
    /// Core action just succeeded; triggers and rotation being evaluated
    ActionSucceeded,
    /// Suspended while a batch holds the storage session
    WaitingForBatch,
    Paused,
    /// Fatal internal error; needs an explicit start
    Error,
    EmergencyStopped,
}

/// Inputs that can change the cycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleInput {
    Start,
    DepsReady,
    Succeeded,
    Continue,
    SuspendForBatch,
    BatchComplete,
    Pause,
    /// `batch_pending` is true when a batch is queued or in flight, in which
    /// case the cycle resumes into the suspended state instead of attempting
    Resume { batch_pending: bool },
    Stop,
    Fail,
    EmergencyStop,
}

impl CycleState {
    /// Pure transition function. Returns `None` when the input does not apply.
    pub fn on(self, input: CycleInput) -> Option<CycleState> {
        use CycleInput as I;
        use CycleState as S;

        match (self, input) {
            (S::Stopped | S::Error | S::EmergencyStopped, I::Start) => Some(S::Starting),

            (S::Starting, I::DepsReady) => Some(S::Attempting),

            (S::Attempting, I::Succeeded) => Some(S::ActionSucceeded),
            (S::ActionSucceeded, I::Continue) => Some(S::Attempting),

            (S::Starting | S::Attempting | S::ActionSucceeded, I::SuspendForBatch) => {
                Some(S::WaitingForBatch)
            }

            // Only a suspended cycle is resumed; user states win
            (S::WaitingForBatch, I::BatchComplete) => Some(S::Attempting),

            (S::Starting | S::Attempting | S::ActionSucceeded | S::WaitingForBatch, I::Pause) => {
                Some(S::Paused)
            }
            (S::Paused, I::Resume { batch_pending }) => Some(if batch_pending {
                S::WaitingForBatch
            } else {
                S::Attempting
            }),

            (S::Stopped, I::Stop) => None,
            (_, I::Stop) => Some(S::Stopped),

            (S::Stopped | S::Error | S::EmergencyStopped, I::Fail) => None,
            (_, I::Fail) => Some(S::Error),

            (S::EmergencyStopped, I::EmergencyStop) => None,
            (_, I::EmergencyStop) => Some(S::EmergencyStopped),

            _ => None,
        }
    }

    /// States in which the cycle may drive the actuator itself
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            CycleState::Starting | CycleState::Attempting | CycleState::ActionSucceeded
        )
    }

    /// States that need an explicit start to leave
    pub fn is_halted(&self) -> bool {
        matches!(
            self,
            CycleState::Stopped | CycleState::Error | CycleState::EmergencyStopped
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            CycleState::Stopped => "stopped",
            CycleState::Starting => "starting",
            CycleState::Attempting => "attempting",
            CycleState::ActionSucceeded => "action_succeeded",
            CycleState::WaitingForBatch => "waiting_for_batch",
            CycleState::Paused => "paused",
            CycleState::Error => "error",
            CycleState::EmergencyStopped => "emergency_stopped",
        }
    }
}

impl std::fmt::Display for CycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
#[path = "cycle_tests.rs"]
mod tests;
