// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Visual recognition adapters

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeVision, VisionCall};

use async_trait::async_trait;
use thiserror::Error;
use tw_core::{SlotStatus, ToolId};

/// Errors from vision operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VisionError {
    #[error("capture failed: {0}")]
    CaptureFailed(String),
    #[error("unknown pattern: {0}")]
    UnknownPattern(String),
}

/// Result of one success detection
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Detection {
    pub found: bool,
    pub confidence: f32,
}

impl Detection {
    pub fn found(confidence: f32) -> Self {
        Self {
            found: true,
            confidence,
        }
    }

    pub fn missing() -> Self {
        Self::default()
    }

    /// Found with at least `min_confidence`
    pub fn confirms(&self, min_confidence: f32) -> bool {
        self.found && self.confidence >= min_confidence
    }
}

/// Adapter for reading the environment's screen
#[async_trait]
pub trait Vision: Clone + Send + Sync + 'static {
    /// Check whether the core action's success indicator is showing
    async fn detect_success(&self) -> Result<Detection, VisionError>;

    async fn has_pattern(&self, name: &str) -> Result<bool, VisionError>;

    async fn detect_slot_status(&self, slot: &ToolId) -> Result<SlotStatus, VisionError>;
}
