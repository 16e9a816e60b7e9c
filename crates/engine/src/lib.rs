// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tidewatch orchestration engine
//!
//! Two tasks share one context: the cycle driver, which performs attempts,
//! and the batch coordinator, which owns the storage session.

mod context;
mod coordinator;
mod cycle;
mod error;
mod observer;
mod runtime;

pub use error::EngineError;
pub use observer::CycleObserver;
pub use runtime::{Runtime, RuntimeDeps};

#[cfg(any(test, feature = "test-support"))]
pub use observer::{ObservedEvent, RecordingObserver};
