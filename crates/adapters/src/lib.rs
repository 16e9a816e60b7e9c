// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the external environment

pub mod actuator;
pub mod capability;
pub mod session;
pub mod sim;
pub mod traced;
pub mod vision;

pub use actuator::{Actuator, ActuatorError, Point};
pub use capability::{Capabilities, CapabilityError, Cleaner, Equipper, Restocker, Servicer};
pub use session::{ActuatorSession, StorageSession};
pub use sim::{SimConfig, SimSnapshot, SimulatedWorld};
pub use traced::{TracedActuator, TracedStorageSession};
pub use vision::{Detection, Vision, VisionError};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use actuator::{ActuatorCall, FakeActuator};
#[cfg(any(test, feature = "test-support"))]
pub use capability::{CapabilityCall, FakeCapabilities};
#[cfg(any(test, feature = "test-support"))]
pub use session::{FakeStorageSession, StorageCall};
#[cfg(any(test, feature = "test-support"))]
pub use vision::{FakeVision, VisionCall};
