// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::actuator::{Actuator, ActuatorError, Point};
use crate::session::StorageSession;
use async_trait::async_trait;
use tracing::Instrument;

/// Wrapper that adds tracing to any StorageSession
#[derive(Clone)]
pub struct TracedStorageSession<S> {
    inner: S,
}

impl<S> TracedStorageSession<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: StorageSession> StorageSession for TracedStorageSession<S> {
    async fn open(&self, reason: &str) -> bool {
        let span = tracing::info_span!("session.open", reason);
        async {
            if self.inner.is_open() {
                tracing::warn!("already open");
            }
            let start = std::time::Instant::now();
            let opened = self.inner.open(reason).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            if opened {
                tracing::info!(elapsed_ms, "session opened");
            } else {
                tracing::error!(elapsed_ms, "open failed");
            }
            opened
        }
        .instrument(span)
        .await
    }

    async fn close(&self, reason: &str) -> bool {
        let span = tracing::info_span!("session.close", reason);
        async {
            let start = std::time::Instant::now();
            let closed = self.inner.close(reason).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            if closed {
                tracing::info!(elapsed_ms, "session closed");
            } else {
                tracing::warn!(elapsed_ms, "close failed");
            }
            closed
        }
        .instrument(span)
        .await
    }

    fn is_open(&self) -> bool {
        let open = self.inner.is_open();
        tracing::trace!(open, "checked");
        open
    }
}

/// Wrapper that adds tracing to any Actuator
#[derive(Clone)]
pub struct TracedActuator<A> {
    inner: A,
}

impl<A> TracedActuator<A> {
    pub fn new(inner: A) -> Self {
        Self { inner }
    }
}

fn log_result(result: &Result<(), ActuatorError>) {
    match result {
        Ok(()) => tracing::debug!("done"),
        Err(e) => tracing::warn!(error = %e, "input failed"),
    }
}

#[async_trait]
impl<A: Actuator> Actuator for TracedActuator<A> {
    async fn press_and_release(&self, button: &str) -> Result<(), ActuatorError> {
        let span = tracing::debug_span!("actuator.press", button);
        async {
            let result = self.inner.press_and_release(button).await;
            log_result(&result);
            result
        }
        .instrument(span)
        .await
    }

    async fn hold_down(&self, key: &str) -> Result<(), ActuatorError> {
        let span = tracing::debug_span!("actuator.hold", key);
        async {
            let result = self.inner.hold_down(key).await;
            log_result(&result);
            result
        }
        .instrument(span)
        .await
    }

    async fn release(&self, key: &str) -> Result<(), ActuatorError> {
        let span = tracing::debug_span!("actuator.release", key);
        async {
            let result = self.inner.release(key).await;
            log_result(&result);
            result
        }
        .instrument(span)
        .await
    }

    async fn move_to(&self, to: Point) -> Result<(), ActuatorError> {
        let result = self.inner.move_to(to).await;
        tracing::trace!(x = to.x, y = to.y, ok = result.is_ok(), "moved");
        result
    }

    async fn drag(&self, from: Point, to: Point) -> Result<(), ActuatorError> {
        let span = tracing::debug_span!(
            "actuator.drag",
            from_x = from.x,
            from_y = from.y,
            to_x = to.x,
            to_y = to.y
        );
        async {
            let result = self.inner.drag(from, to).await;
            log_result(&result);
            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
