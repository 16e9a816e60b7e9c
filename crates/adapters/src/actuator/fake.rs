// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake actuator for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{Actuator, ActuatorError, Point};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Recorded actuator call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActuatorCall {
    Press { button: String },
    HoldDown { key: String },
    Release { key: String },
    MoveTo { to: Point },
    Drag { from: Point, to: Point },
}

#[derive(Default)]
struct FakeActuatorState {
    calls: Vec<ActuatorCall>,
    failing: HashSet<String>,
}

/// Fake actuator that records inputs and can reject named controls
#[derive(Clone, Default)]
pub struct FakeActuator {
    inner: Arc<Mutex<FakeActuatorState>>,
}

impl FakeActuator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<ActuatorCall> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .calls
            .clone()
    }

    /// Buttons pressed, in order
    pub fn presses(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ActuatorCall::Press { button } => Some(button),
                _ => None,
            })
            .collect()
    }

    /// Make presses of `control` fail until cleared
    pub fn fail_on(&self, control: &str) {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .failing
            .insert(control.to_string());
    }

    pub fn clear_failures(&self) {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .failing
            .clear();
    }

    fn record(&self, call: ActuatorCall, control: Option<&str>) -> Result<(), ActuatorError> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.calls.push(call);
        match control {
            Some(control) if inner.failing.contains(control) => {
                Err(ActuatorError::Rejected(control.to_string()))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl Actuator for FakeActuator {
    async fn press_and_release(&self, button: &str) -> Result<(), ActuatorError> {
        self.record(
            ActuatorCall::Press {
                button: button.to_string(),
            },
            Some(button),
        )
    }

    async fn hold_down(&self, key: &str) -> Result<(), ActuatorError> {
        self.record(
            ActuatorCall::HoldDown {
                key: key.to_string(),
            },
            Some(key),
        )
    }

    async fn release(&self, key: &str) -> Result<(), ActuatorError> {
        self.record(
            ActuatorCall::Release {
                key: key.to_string(),
            },
            Some(key),
        )
    }

    async fn move_to(&self, to: Point) -> Result<(), ActuatorError> {
        self.record(ActuatorCall::MoveTo { to }, None)
    }

    async fn drag(&self, from: Point, to: Point) -> Result<(), ActuatorError> {
        self.record(ActuatorCall::Drag { from, to }, None)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
