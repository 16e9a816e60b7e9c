// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The exclusive storage session
//!
//! Only one subsystem may have the storage session open at a time. The
//! wrappers here are idempotent and carry no business logic; exclusivity is
//! enforced by the batch coordinator being the only caller.

mod actuator;

pub use actuator::ActuatorSession;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeStorageSession, StorageCall};

use async_trait::async_trait;

/// Adapter for opening and closing the storage session
#[async_trait]
pub trait StorageSession: Clone + Send + Sync + 'static {
    /// Open the session. Returns false if it could not be opened.
    async fn open(&self, reason: &str) -> bool;

    /// Close the session. Closing a closed session succeeds without input.
    async fn close(&self, reason: &str) -> bool;

    fn is_open(&self) -> bool;
}
