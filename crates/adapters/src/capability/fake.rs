// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake capabilities for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{Capabilities, CapabilityError, Cleaner, Equipper, Restocker, Servicer};
use crate::session::{FakeStorageSession, StorageSession};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tw_core::ToolId;

/// Recorded capability call
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CapabilityCall {
    Restock,
    Cleanup,
    Service { tool: ToolId },
    Equip { tool: ToolId },
}

impl CapabilityCall {
    fn name(&self) -> &'static str {
        match self {
            CapabilityCall::Restock => "restock",
            CapabilityCall::Cleanup => "cleanup",
            CapabilityCall::Service { .. } => "service",
            CapabilityCall::Equip { .. } => "equip",
        }
    }
}

#[derive(Default)]
struct FakeCapabilityState {
    calls: Vec<(CapabilityCall, bool)>,
    failing: HashSet<&'static str>,
    panicking: HashSet<&'static str>,
    delay: Option<Duration>,
}

/// Fake implementing every capability
///
/// When built with [`FakeCapabilities::watching`], each call also records
/// whether the storage session was open at the time.
#[derive(Clone, Default)]
pub struct FakeCapabilities {
    inner: Arc<Mutex<FakeCapabilityState>>,
    session: Option<FakeStorageSession>,
}

impl FakeCapabilities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn watching(session: FakeStorageSession) -> Self {
        Self {
            inner: Arc::default(),
            session: Some(session),
        }
    }

    /// All four capabilities backed by this fake
    pub fn capabilities(&self) -> Capabilities {
        Capabilities::new()
            .with_restocker(Arc::new(self.clone()))
            .with_cleaner(Arc::new(self.clone()))
            .with_servicer(Arc::new(self.clone()))
            .with_equipper(Arc::new(self.clone()))
    }

    pub fn calls(&self) -> Vec<CapabilityCall> {
        self.lock().calls.iter().map(|(c, _)| c.clone()).collect()
    }

    /// Calls paired with whether the session was open at the time
    pub fn calls_with_session(&self) -> Vec<(CapabilityCall, bool)> {
        self.lock().calls.clone()
    }

    pub fn equips(&self) -> Vec<ToolId> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                CapabilityCall::Equip { tool } => Some(tool),
                _ => None,
            })
            .collect()
    }

    /// Make calls named `name` ("restock", "cleanup", "service", "equip") fail
    pub fn fail_on(&self, name: &'static str) {
        self.lock().failing.insert(name);
    }

    /// Make calls named `name` panic
    pub fn panic_on(&self, name: &'static str) {
        self.lock().panicking.insert(name);
    }

    pub fn set_delay(&self, delay: Duration) {
        self.lock().delay = Some(delay);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeCapabilityState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn record(&self, call: CapabilityCall) -> Result<(), CapabilityError> {
        let session_open = self.session.as_ref().is_some_and(|s| s.is_open());
        let name = call.name();
        let (fail, panic, delay) = {
            let mut inner = self.lock();
            inner.calls.push((call, session_open));
            (
                inner.failing.contains(name),
                inner.panicking.contains(name),
                inner.delay,
            )
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if panic {
            #[allow(clippy::panic)]
            {
                panic!("injected {} panic", name);
            }
        }
        if fail {
            return Err(CapabilityError::Failed(name, "injected failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Restocker for FakeCapabilities {
    async fn restock(&self) -> Result<(), CapabilityError> {
        self.record(CapabilityCall::Restock).await
    }
}

#[async_trait]
impl Cleaner for FakeCapabilities {
    async fn cleanup(&self) -> Result<(), CapabilityError> {
        self.record(CapabilityCall::Cleanup).await
    }
}

#[async_trait]
impl Servicer for FakeCapabilities {
    async fn service(&self, tool: &ToolId) -> Result<(), CapabilityError> {
        self.record(CapabilityCall::Service { tool: tool.clone() })
            .await
    }
}

#[async_trait]
impl Equipper for FakeCapabilities {
    async fn equip(&self, tool: &ToolId) -> Result<(), CapabilityError> {
        self.record(CapabilityCall::Equip { tool: tool.clone() })
            .await
    }
}
