// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Counters exposed to observers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cumulative cycle and batch counters
///
/// Every failure path increments exactly one of these.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleStats {
    pub successes: u64,
    pub failures: u64,
    pub batches_run: u64,
    pub session_open_failures: u64,
    pub session_close_failures: u64,
    pub operations_executed: u64,
    pub operations_failed: u64,
    pub duplicate_requests: u64,
    pub deferred_switches_run: u64,
    pub deferred_switches_skipped: u64,
    pub pair_switches: u64,
    pub services_requested: u64,
    /// Fatal errors and actuator/vision faults
    pub errors: u64,
    pub last_success_at: Option<DateTime<Utc>>,
}

impl CycleStats {
    pub fn attempts(&self) -> u64 {
        self.successes + self.failures
    }

    pub fn record_success(&mut self, at: DateTime<Utc>) {
        self.successes += 1;
        self.last_success_at = Some(at);
    }
}
