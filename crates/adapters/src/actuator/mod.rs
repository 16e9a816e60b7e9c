// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Input actuation adapters

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{ActuatorCall, FakeActuator};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from actuator operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActuatorError {
    #[error("unknown control: {0}")]
    UnknownControl(String),
    #[error("input rejected: {0}")]
    Rejected(String),
}

/// Screen position in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Adapter for emulated input
///
/// Timing jitter and humanization belong to implementations.
#[async_trait]
pub trait Actuator: Clone + Send + Sync + 'static {
    /// Press and release a named control
    async fn press_and_release(&self, button: &str) -> Result<(), ActuatorError>;

    async fn hold_down(&self, key: &str) -> Result<(), ActuatorError>;

    async fn release(&self, key: &str) -> Result<(), ActuatorError>;

    async fn move_to(&self, to: Point) -> Result<(), ActuatorError>;

    async fn drag(&self, from: Point, to: Point) -> Result<(), ActuatorError>;
}
