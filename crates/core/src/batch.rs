// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Batch phases and reports
//!
//! A batch is the set of operations executed inside one storage session.
//! The coordinator walks `Idle -> WindowOpen -> Executing -> Closing -> Idle`;
//! a failed open goes straight from `WindowOpen` back to `Idle`.

use crate::operation::{Operation, OperationKind};
use crate::tool::ToolId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use thiserror::Error;

/// Phase of the batch coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchPhase {
    #[default]
    Idle,
    /// Debounce timer running; requests are being coalesced
    WindowOpen,
    /// Session open; operations running
    Executing,
    /// Closing the session
    Closing,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("illegal batch phase change: {from} -> {to}")]
pub struct PhaseError {
    pub from: BatchPhase,
    pub to: BatchPhase,
}

impl BatchPhase {
    pub fn can_advance(self, next: BatchPhase) -> bool {
        use BatchPhase::*;
        matches!(
            (self, next),
            (Idle, WindowOpen)
                | (WindowOpen, Executing)
                | (WindowOpen, Idle)
                | (Executing, Closing)
                | (Closing, Idle)
        )
    }

    pub fn advance(self, next: BatchPhase) -> Result<BatchPhase, PhaseError> {
        if self.can_advance(next) {
            Ok(next)
        } else {
            Err(PhaseError {
                from: self,
                to: next,
            })
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BatchPhase::Idle => "idle",
            BatchPhase::WindowOpen => "window_open",
            BatchPhase::Executing => "executing",
            BatchPhase::Closing => "closing",
        }
    }
}

impl std::fmt::Display for BatchPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Operations drained from the queue when the debounce window closed
#[derive(Debug, Clone)]
pub struct Batch {
    pub id: String,
    pub operations: Vec<Operation>,
    pub opened_at: Instant,
}

impl Batch {
    pub fn new(id: impl Into<String>, operations: Vec<Operation>, opened_at: Instant) -> Self {
        Self {
            id: id.into(),
            operations,
            opened_at,
        }
    }

    /// Whether any operation needs the session opened
    pub fn needs_session(&self) -> bool {
        self.operations.iter().any(|op| op.kind.uses_session())
    }

    pub fn contains(&self, kind: OperationKind) -> bool {
        self.operations.iter().any(|op| op.kind == kind)
    }

    pub fn kinds(&self) -> Vec<OperationKind> {
        self.operations.iter().map(|op| op.kind).collect()
    }

    pub fn push(&mut self, op: Operation) {
        self.operations.push(op);
    }
}

/// How the batch got (or did not get) its session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionOutcome {
    /// Only markers were queued; the session was never touched
    NotNeeded,
    Opened,
    OpenFailed,
    /// The session was already open when the batch started
    AlreadyOpen,
}

/// What happened to a deferred pair switch at completion
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DeferredOutcome {
    #[default]
    None,
    Ran { tool: ToolId, ok: bool },
    Skipped { tool: ToolId },
}

/// Summary of one batch, delivered to observers after completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub batch_id: String,
    pub started_at: DateTime<Utc>,
    pub executed: Vec<OperationKind>,
    pub failed: Vec<OperationKind>,
    /// Drained but not run (markers, or everything after a failed open)
    pub skipped: Vec<OperationKind>,
    /// True when a service was appended that nobody asked for
    pub opportunistic: bool,
    pub session: SessionOutcome,
    /// `None` when the session was never opened
    pub close_ok: Option<bool>,
    pub deferred: DeferredOutcome,
}

impl BatchReport {
    pub fn new(batch_id: impl Into<String>, started_at: DateTime<Utc>) -> Self {
        Self {
            batch_id: batch_id.into(),
            started_at,
            executed: Vec::new(),
            failed: Vec::new(),
            skipped: Vec::new(),
            opportunistic: false,
            session: SessionOutcome::NotNeeded,
            close_ok: None,
            deferred: DeferredOutcome::None,
        }
    }

    /// Whether any operation did its work inside the session
    pub fn ran_session_operations(&self) -> bool {
        self.executed.iter().chain(&self.failed).any(|k| k.uses_session())
    }
}

#[cfg(test)]
#[path = "batch_tests.rs"]
mod tests;
