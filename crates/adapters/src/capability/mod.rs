// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Maintenance capabilities
//!
//! Each capability is optional. They are resolved once into
//! [`Capabilities`], which the batch coordinator uses to execute operations
//! while the storage session is open.

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{CapabilityCall, FakeCapabilities};

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tw_core::{Operation, OperationKind, ToolId};

/// Errors from maintenance capabilities
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapabilityError {
    #[error("{0} failed: {1}")]
    Failed(&'static str, String),
    #[error("storage session is not open")]
    SessionClosed,
    #[error("storage session is open")]
    SessionOpen,
    #[error("unknown tool: {0}")]
    UnknownTool(ToolId),
}

/// Refills consumables
#[async_trait]
pub trait Restocker: Send + Sync {
    async fn restock(&self) -> Result<(), CapabilityError>;
}

/// Clears accumulated items out of the way
#[async_trait]
pub trait Cleaner: Send + Sync {
    async fn cleanup(&self) -> Result<(), CapabilityError>;
}

/// Repairs a tool and leaves it equipped
#[async_trait]
pub trait Servicer: Send + Sync {
    async fn service(&self, tool: &ToolId) -> Result<(), CapabilityError>;
}

/// Equips a tool outside the storage session
#[async_trait]
pub trait Equipper: Send + Sync {
    async fn equip(&self, tool: &ToolId) -> Result<(), CapabilityError>;
}

/// The capabilities available to this run
#[derive(Clone, Default)]
pub struct Capabilities {
    restocker: Option<Arc<dyn Restocker>>,
    cleaner: Option<Arc<dyn Cleaner>>,
    servicer: Option<Arc<dyn Servicer>>,
    equipper: Option<Arc<dyn Equipper>>,
}

impl Capabilities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_restocker(mut self, restocker: Arc<dyn Restocker>) -> Self {
        self.restocker = Some(restocker);
        self
    }

    pub fn with_cleaner(mut self, cleaner: Arc<dyn Cleaner>) -> Self {
        self.cleaner = Some(cleaner);
        self
    }

    pub fn with_servicer(mut self, servicer: Arc<dyn Servicer>) -> Self {
        self.servicer = Some(servicer);
        self
    }

    pub fn with_equipper(mut self, equipper: Arc<dyn Equipper>) -> Self {
        self.equipper = Some(equipper);
        self
    }

    /// Whether an operation of `kind` would do any work
    pub fn supports(&self, kind: OperationKind) -> bool {
        match kind {
            OperationKind::Restock => self.restocker.is_some(),
            OperationKind::Cleanup => self.cleaner.is_some(),
            OperationKind::Service => self.servicer.is_some(),
            OperationKind::PairSwitch => false,
        }
    }

    /// Run one operation inside the open session.
    ///
    /// Service always targets `active_tool`: by the time a batch runs, the
    /// rotation may have moved on from the tool that asked for it, and the
    /// tool that will be used next is the one worth servicing.
    ///
    /// Returns `Ok(false)` when the operation was skipped.
    pub async fn execute(
        &self,
        op: &Operation,
        active_tool: &ToolId,
    ) -> Result<bool, CapabilityError> {
        match op.kind {
            OperationKind::Restock => match &self.restocker {
                Some(restocker) => restocker.restock().await.map(|()| true),
                None => Ok(false),
            },
            OperationKind::Cleanup => match &self.cleaner {
                Some(cleaner) => cleaner.cleanup().await.map(|()| true),
                None => Ok(false),
            },
            OperationKind::Service => match &self.servicer {
                Some(servicer) => servicer.service(active_tool).await.map(|()| true),
                None => Ok(false),
            },
            OperationKind::PairSwitch => Ok(false),
        }
    }

    /// Equip `tool`. Returns `Ok(false)` when nothing can equip.
    pub async fn equip(&self, tool: &ToolId) -> Result<bool, CapabilityError> {
        match &self.equipper {
            Some(equipper) => equipper.equip(tool).await.map(|()| true),
            None => Ok(false),
        }
    }
}

impl std::fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capabilities")
            .field("restock", &self.restocker.is_some())
            .field("cleanup", &self.cleaner.is_some())
            .field("service", &self.servicer.is_some())
            .field("equip", &self.equipper.is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
