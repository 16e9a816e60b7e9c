// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Push notifications for cycle and batch events

use crate::EngineError;
use std::sync::{Arc, Mutex};
use tw_core::{BatchReport, CycleState};

/// Receives cycle events
///
/// Called from the engine's tasks with no internal locks held. Every method
/// defaults to doing nothing.
pub trait CycleObserver: Send + Sync {
    fn on_state_change(&self, _old: CycleState, _new: CycleState) {}

    /// `count` is the total number of successes so far
    fn on_success(&self, _count: u64) {}

    fn on_error(&self, _err: &EngineError) {}

    fn on_batch_complete(&self, _report: &BatchReport) {}
}

/// Registered observers
#[derive(Default)]
pub(crate) struct Observers {
    inner: Mutex<Vec<Arc<dyn CycleObserver>>>,
}

impl Observers {
    pub(crate) fn add(&self, observer: Arc<dyn CycleObserver>) {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(observer);
    }

    fn snapshot(&self) -> Vec<Arc<dyn CycleObserver>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub(crate) fn state_changed(&self, old: CycleState, new: CycleState) {
        for observer in self.snapshot() {
            observer.on_state_change(old, new);
        }
    }

    pub(crate) fn succeeded(&self, count: u64) {
        for observer in self.snapshot() {
            observer.on_success(count);
        }
    }

    pub(crate) fn errored(&self, err: &EngineError) {
        for observer in self.snapshot() {
            observer.on_error(err);
        }
    }

    pub(crate) fn batch_completed(&self, report: &BatchReport) {
        for observer in self.snapshot() {
            observer.on_batch_complete(report);
        }
    }
}

/// Event captured by [`RecordingObserver`]
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Clone, PartialEq)]
pub enum ObservedEvent {
    StateChange { old: CycleState, new: CycleState },
    Success { count: u64 },
    Error { message: String },
    BatchComplete(BatchReport),
}

/// Observer that records everything it is told
#[cfg(any(test, feature = "test-support"))]
#[derive(Clone, Default)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<ObservedEvent>>>,
}

#[cfg(any(test, feature = "test-support"))]
impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ObservedEvent> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn reports(&self) -> Vec<BatchReport> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ObservedEvent::BatchComplete(report) => Some(report),
                _ => None,
            })
            .collect()
    }

    pub fn states(&self) -> Vec<CycleState> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ObservedEvent::StateChange { new, .. } => Some(new),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ObservedEvent::Error { message } => Some(message),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: ObservedEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
    }
}

#[cfg(any(test, feature = "test-support"))]
impl CycleObserver for RecordingObserver {
    fn on_state_change(&self, old: CycleState, new: CycleState) {
        self.push(ObservedEvent::StateChange { old, new });
    }

    fn on_success(&self, count: u64) {
        self.push(ObservedEvent::Success { count });
    }

    fn on_error(&self, err: &EngineError) {
        self.push(ObservedEvent::Error {
            message: err.to_string(),
        });
    }

    fn on_batch_complete(&self, report: &BatchReport) {
        self.push(ObservedEvent::BatchComplete(report.clone()));
    }
}
