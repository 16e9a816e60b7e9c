// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Storage session driven through the actuator

use super::StorageSession;
use crate::actuator::Actuator;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tw_core::SessionConfig;

/// Opens and closes the storage session by pressing its controls
///
/// The open flag only changes when the press succeeds, so a failed close
/// leaves the session reported as open.
#[derive(Clone)]
pub struct ActuatorSession<A> {
    actuator: A,
    open_button: String,
    close_button: String,
    open: Arc<AtomicBool>,
}

impl<A: Actuator> ActuatorSession<A> {
    pub fn new(actuator: A, config: &SessionConfig) -> Self {
        Self {
            actuator,
            open_button: config.open_button.clone(),
            close_button: config.close_button.clone(),
            open: Arc::new(AtomicBool::new(false)),
        }
    }
}

#[async_trait]
impl<A: Actuator> StorageSession for ActuatorSession<A> {
    async fn open(&self, reason: &str) -> bool {
        if self.open.load(Ordering::SeqCst) {
            return true;
        }
        match self.actuator.press_and_release(&self.open_button).await {
            Ok(()) => {
                self.open.store(true, Ordering::SeqCst);
                true
            }
            Err(e) => {
                tracing::warn!(reason, error = %e, "storage open rejected");
                false
            }
        }
    }

    async fn close(&self, reason: &str) -> bool {
        if !self.open.load(Ordering::SeqCst) {
            return true;
        }
        match self.actuator.press_and_release(&self.close_button).await {
            Ok(()) => {
                self.open.store(false, Ordering::SeqCst);
                true
            }
            Err(e) => {
                tracing::warn!(reason, error = %e, "storage close rejected");
                false
            }
        }
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[path = "actuator_tests.rs"]
mod tests;
