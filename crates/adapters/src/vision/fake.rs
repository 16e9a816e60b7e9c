// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake vision adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{Detection, Vision, VisionError};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use tw_core::{SlotStatus, ToolId};

/// Recorded vision call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisionCall {
    DetectSuccess,
    HasPattern { name: String },
    DetectSlotStatus { slot: ToolId },
}

struct FakeVisionState {
    calls: Vec<VisionCall>,
    scripted: VecDeque<Result<Detection, VisionError>>,
    fallback: Detection,
    patterns: HashSet<String>,
    slots: HashMap<ToolId, SlotStatus>,
}

/// Fake vision with scripted detections
///
/// Scripted results are consumed first; after that every detection returns
/// the fallback. Slots default to `Usable`.
#[derive(Clone)]
pub struct FakeVision {
    inner: Arc<Mutex<FakeVisionState>>,
}

impl Default for FakeVision {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeVisionState {
                calls: Vec::new(),
                scripted: VecDeque::new(),
                fallback: Detection::missing(),
                patterns: HashSet::new(),
                slots: HashMap::new(),
            })),
        }
    }
}

impl FakeVision {
    pub fn new() -> Self {
        Self::default()
    }

    /// Vision that confirms success on every detection
    pub fn always_found() -> Self {
        let vision = Self::default();
        vision.set_fallback(Detection::found(1.0));
        vision
    }

    pub fn calls(&self) -> Vec<VisionCall> {
        self.lock().calls.clone()
    }

    pub fn detect_count(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| matches!(c, VisionCall::DetectSuccess))
            .count()
    }

    pub fn push_detection(&self, result: Result<Detection, VisionError>) {
        self.lock().scripted.push_back(result);
    }

    pub fn set_fallback(&self, detection: Detection) {
        self.lock().fallback = detection;
    }

    pub fn set_pattern(&self, name: &str, visible: bool) {
        let mut inner = self.lock();
        if visible {
            inner.patterns.insert(name.to_string());
        } else {
            inner.patterns.remove(name);
        }
    }

    pub fn set_slot_status(&self, slot: impl Into<ToolId>, status: SlotStatus) {
        self.lock().slots.insert(slot.into(), status);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeVisionState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Vision for FakeVision {
    async fn detect_success(&self) -> Result<Detection, VisionError> {
        let mut inner = self.lock();
        inner.calls.push(VisionCall::DetectSuccess);
        let fallback = inner.fallback;
        inner.scripted.pop_front().unwrap_or(Ok(fallback))
    }

    async fn has_pattern(&self, name: &str) -> Result<bool, VisionError> {
        let mut inner = self.lock();
        inner.calls.push(VisionCall::HasPattern {
            name: name.to_string(),
        });
        Ok(inner.patterns.contains(name))
    }

    async fn detect_slot_status(&self, slot: &ToolId) -> Result<SlotStatus, VisionError> {
        let mut inner = self.lock();
        inner
            .calls
            .push(VisionCall::DetectSlotStatus { slot: slot.clone() });
        Ok(inner.slots.get(slot).copied().unwrap_or(SlotStatus::Usable))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
