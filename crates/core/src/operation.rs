// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Maintenance operations that need the exclusive storage session

use crate::clock::Clock;
use crate::tool::ToolId;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Kind of maintenance work
///
/// The queue holds at most one pending operation of each kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Restock,
    Cleanup,
    Service,
    PairSwitch,
}

impl OperationKind {
    pub const ALL: [OperationKind; 4] = [
        OperationKind::Restock,
        OperationKind::Cleanup,
        OperationKind::Service,
        OperationKind::PairSwitch,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            OperationKind::Restock => "restock",
            OperationKind::Cleanup => "cleanup",
            OperationKind::Service => "service",
            OperationKind::PairSwitch => "pair_switch",
        }
    }

    /// Whether this kind does its work inside the open session.
    ///
    /// A pair switch is only a marker: the equip happens after the session
    /// closes, or is superseded by servicing inside it.
    pub fn uses_session(&self) -> bool {
        !matches!(self, OperationKind::PairSwitch)
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Why an operation was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerReason {
    /// A configured time interval elapsed
    Interval,
    /// A configured number of successes accumulated
    SuccessCount,
    /// A tool failed too many attempts in a row
    FailureThreshold,
    /// Requested by a command source
    External,
    /// Discovered while a batch was already being assembled
    Opportunistic,
    /// Needed to ready the tool chosen by a pair switch
    Rotation,
}

impl std::fmt::Display for TriggerReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TriggerReason::Interval => "interval",
            TriggerReason::SuccessCount => "success_count",
            TriggerReason::FailureThreshold => "failure_threshold",
            TriggerReason::External => "external",
            TriggerReason::Opportunistic => "opportunistic",
            TriggerReason::Rotation => "rotation",
        };
        write!(f, "{}", name)
    }
}

/// A pending unit of maintenance work
///
/// Owned by the queue until drained into a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub kind: OperationKind,
    pub reason: TriggerReason,
    /// Tool the request concerns: the switch target for `PairSwitch`,
    /// the failing tool for threshold-triggered `Service`
    pub target: Option<ToolId>,
    pub enqueued_at: Instant,
}

impl Operation {
    pub fn new(kind: OperationKind, reason: TriggerReason, clock: &impl Clock) -> Self {
        Self::at(kind, reason, clock.now())
    }

    pub fn at(kind: OperationKind, reason: TriggerReason, enqueued_at: Instant) -> Self {
        Self {
            kind,
            reason,
            target: None,
            enqueued_at,
        }
    }

    pub fn with_target(self, target: impl Into<ToolId>) -> Self {
        Self {
            target: Some(target.into()),
            ..self
        }
    }
}

#[cfg(test)]
#[path = "operation_tests.rs"]
mod tests;
