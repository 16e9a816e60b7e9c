// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake storage session for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::StorageSession;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Recorded session call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageCall {
    Open { reason: String },
    Close { reason: String },
}

#[derive(Default)]
struct FakeStorageState {
    open: bool,
    fail_open: bool,
    fail_close: bool,
    open_delay: Option<Duration>,
    calls: Vec<StorageCall>,
    overlapping_opens: usize,
}

/// Fake storage session with failure injection
///
/// Counts opens requested while already open, which a correct caller never
/// does.
#[derive(Clone, Default)]
pub struct FakeStorageSession {
    inner: Arc<Mutex<FakeStorageState>>,
}

impl FakeStorageSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<StorageCall> {
        self.lock().calls.clone()
    }

    pub fn open_count(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| matches!(c, StorageCall::Open { .. }))
            .count()
    }

    pub fn close_count(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| matches!(c, StorageCall::Close { .. }))
            .count()
    }

    pub fn overlapping_opens(&self) -> usize {
        self.lock().overlapping_opens
    }

    pub fn set_fail_open(&self, fail: bool) {
        self.lock().fail_open = fail;
    }

    pub fn set_fail_close(&self, fail: bool) {
        self.lock().fail_close = fail;
    }

    /// Make every open take `delay` before it completes
    pub fn set_open_delay(&self, delay: Duration) {
        self.lock().open_delay = Some(delay);
    }

    /// Force the open flag, e.g. to simulate a session left open
    pub fn force_open(&self, open: bool) {
        self.lock().open = open;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeStorageState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl StorageSession for FakeStorageSession {
    async fn open(&self, reason: &str) -> bool {
        let delay = {
            let mut inner = self.lock();
            inner.calls.push(StorageCall::Open {
                reason: reason.to_string(),
            });
            if inner.open {
                inner.overlapping_opens += 1;
                return true;
            }
            inner.open_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut inner = self.lock();
        if inner.fail_open {
            return false;
        }
        inner.open = true;
        true
    }

    async fn close(&self, reason: &str) -> bool {
        let mut inner = self.lock();
        inner.calls.push(StorageCall::Close {
            reason: reason.to_string(),
        });
        if !inner.open {
            return true;
        }
        if inner.fail_close {
            return false;
        }
        inner.open = false;
        true
    }

    fn is_open(&self) -> bool {
        self.lock().open
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
