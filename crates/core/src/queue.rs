// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! De-duplicating queue of maintenance operations
//!
//! Holds the operations waiting for the next batch window. At most one
//! operation of each kind can be pending, and a kind that is currently
//! executing inside a batch cannot be queued again until that batch finishes.
//! All methods synchronize internally.

use crate::operation::{Operation, OperationKind};
use std::collections::BTreeSet;
use std::sync::Mutex;
use tokio::sync::Notify;

/// Result of offering an operation to the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// Accepted. `first` is set when the queue was empty before, which is
    /// what opens a new batch window.
    Queued { first: bool },
    /// Dropped: the same kind is already pending
    AlreadyQueued,
    /// Dropped: the same kind is running in the current batch
    AlreadyExecuting,
    /// Dropped: the queue is closed (system stopped)
    Closed,
}

impl EnqueueOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, EnqueueOutcome::Queued { .. })
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(
            self,
            EnqueueOutcome::AlreadyQueued | EnqueueOutcome::AlreadyExecuting
        )
    }
}

#[derive(Debug, Default)]
struct QueueInner {
    pending: Vec<Operation>,
    executing: BTreeSet<OperationKind>,
    closed: bool,
}

/// Ordered, de-duplicated set of pending operations
#[derive(Debug, Default)]
pub struct OperationQueue {
    inner: Mutex<QueueInner>,
    wakeup: Notify,
}

impl OperationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, QueueInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Offer an operation. Duplicates are dropped.
    pub fn enqueue(&self, op: Operation) -> EnqueueOutcome {
        let outcome = {
            let mut inner = self.lock();
            if inner.closed {
                EnqueueOutcome::Closed
            } else if inner.executing.contains(&op.kind) {
                EnqueueOutcome::AlreadyExecuting
            } else if inner.pending.iter().any(|p| p.kind == op.kind) {
                EnqueueOutcome::AlreadyQueued
            } else {
                let first = inner.pending.is_empty();
                inner.pending.push(op);
                EnqueueOutcome::Queued { first }
            }
        };

        if let EnqueueOutcome::Queued { first: true } = outcome {
            self.wakeup.notify_one();
        }
        outcome
    }

    /// Take every pending operation, in enqueue order.
    ///
    /// The drained kinds count as executing until [`finish_batch`] is called.
    ///
    /// [`finish_batch`]: OperationQueue::finish_batch
    pub fn drain_all(&self) -> Vec<Operation> {
        let mut inner = self.lock();
        let drained = std::mem::take(&mut inner.pending);
        inner.executing = drained.iter().map(|op| op.kind).collect();
        drained
    }

    /// Mark the current batch as done so its kinds can be queued again
    pub fn finish_batch(&self) {
        self.lock().executing.clear();
    }

    /// Reject further operations and discard whatever is pending
    pub fn close(&self) -> Vec<Operation> {
        let mut inner = self.lock();
        inner.closed = true;
        std::mem::take(&mut inner.pending)
    }

    pub fn reopen(&self) {
        self.lock().closed = false;
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    pub fn has_pending(&self) -> bool {
        !self.lock().pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lock().pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().pending.is_empty()
    }

    pub fn pending_kinds(&self) -> Vec<OperationKind> {
        self.lock().pending.iter().map(|op| op.kind).collect()
    }

    pub fn is_executing(&self, kind: OperationKind) -> bool {
        self.lock().executing.contains(&kind)
    }

    /// Resolve once at least one operation is pending
    pub async fn wait_for_pending(&self) {
        loop {
            if self.has_pending() {
                return;
            }
            // notify_one stores a permit when nobody is waiting, so an enqueue
            // between the check above and this await is not lost
            self.wakeup.notified().await;
        }
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
