// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Maintenance trigger evaluation
//!
//! Decides, after each attempt, which maintenance operations are due.
//! Interval and success-count triggers reset when they fire; the failure
//! counter of a tool resets on its next success or when it is serviced.

use crate::clock::Clock;
use crate::config::TriggerConfig;
use crate::operation::{Operation, OperationKind, TriggerReason};
use crate::tool::ToolId;
use std::collections::HashMap;
use std::time::Instant;

/// A maintenance request produced by trigger evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    pub kind: OperationKind,
    pub reason: TriggerReason,
    pub target: Option<ToolId>,
}

impl Trigger {
    pub fn into_operation(self, enqueued_at: Instant) -> Operation {
        let op = Operation::at(self.kind, self.reason, enqueued_at);
        match self.target {
            Some(tool) => op.with_target(tool),
            None => op,
        }
    }
}

#[derive(Debug, Clone)]
struct Periodic {
    interval: Option<std::time::Duration>,
    every: Option<u32>,
    last_fired: Instant,
    successes: u32,
}

impl Periodic {
    fn new(
        interval: Option<std::time::Duration>,
        every: Option<u32>,
        now: Instant,
    ) -> Self {
        Self {
            interval,
            every,
            last_fired: now,
            successes: 0,
        }
    }

    fn interval_due(&self, now: Instant) -> bool {
        self.interval
            .is_some_and(|interval| now.saturating_duration_since(self.last_fired) >= interval)
    }

    fn count_due(&self) -> bool {
        self.every.is_some_and(|every| self.successes >= every)
    }

    fn fire(&mut self, now: Instant) {
        self.last_fired = now;
        self.successes = 0;
    }
}

/// Tracks elapsed time, success counts and per-tool failures
#[derive(Debug, Clone)]
pub struct MaintenanceTriggers {
    restock: Periodic,
    cleanup: Periodic,
    failure_threshold: u32,
    failures: HashMap<ToolId, u32>,
}

impl MaintenanceTriggers {
    pub fn new(config: &TriggerConfig, clock: &impl Clock) -> Self {
        let now = clock.now();
        Self {
            restock: Periodic::new(config.restock_interval, config.restock_every_successes, now),
            cleanup: Periodic::new(config.cleanup_interval, config.cleanup_every_successes, now),
            failure_threshold: config.failure_threshold.max(1),
            failures: HashMap::new(),
        }
    }

    /// Record a confirmed success of `tool` and return what became due
    pub fn on_success(&mut self, tool: &ToolId, clock: &impl Clock) -> Vec<Trigger> {
        self.failures.remove(tool);
        self.restock.successes += 1;
        self.cleanup.successes += 1;
        self.due(clock.now())
    }

    /// Record a failed attempt with `tool` and return what became due
    pub fn on_failure(&mut self, tool: &ToolId, clock: &impl Clock) -> Vec<Trigger> {
        let count = self.failures.entry(tool.clone()).or_insert(0);
        *count += 1;

        let mut triggers = Vec::new();
        if *count >= self.failure_threshold {
            self.failures.remove(tool);
            triggers.push(Trigger {
                kind: OperationKind::Service,
                reason: TriggerReason::FailureThreshold,
                target: Some(tool.clone()),
            });
        }
        triggers.extend(self.due(clock.now()));
        triggers
    }

    /// Forget the failure streak of a serviced tool
    pub fn clear_failures(&mut self, tool: &ToolId) {
        self.failures.remove(tool);
    }

    pub fn failures_of(&self, tool: &ToolId) -> u32 {
        self.failures.get(tool).copied().unwrap_or(0)
    }

    fn due(&mut self, now: Instant) -> Vec<Trigger> {
        let mut triggers = Vec::new();
        for (kind, periodic) in [
            (OperationKind::Restock, &mut self.restock),
            (OperationKind::Cleanup, &mut self.cleanup),
        ] {
            // Interval wins when both fire so the reason reflects the older debt
            let reason = if periodic.interval_due(now) {
                TriggerReason::Interval
            } else if periodic.count_due() {
                TriggerReason::SuccessCount
            } else {
                continue;
            };
            periodic.fire(now);
            triggers.push(Trigger {
                kind,
                reason,
                target: None,
            });
        }
        triggers
    }
}

#[cfg(test)]
#[path = "triggers_tests.rs"]
mod tests;
