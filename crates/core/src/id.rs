// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Batch identifiers
//!
//! Every batch gets an id of the form `batch-<suffix>`. It names the tracing
//! span of the batch and is carried in its [`BatchReport`](crate::BatchReport).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

const BATCH_PREFIX: &str = "batch";

/// Source of batch ids
pub trait IdGen: Clone + Send + Sync + 'static {
    fn next(&self) -> String;
}

/// `batch-` followed by a v4 UUID in simple form
#[derive(Clone, Default)]
pub struct UuidIdGen;

impl IdGen for UuidIdGen {
    fn next(&self) -> String {
        format!("{}-{}", BATCH_PREFIX, uuid::Uuid::new_v4().simple())
    }
}

/// `batch-1`, `batch-2`, ... shared between clones
#[derive(Clone)]
pub struct SequentialIdGen {
    counter: Arc<AtomicU64>,
}

impl Default for SequentialIdGen {
    fn default() -> Self {
        Self {
            counter: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl IdGen for SequentialIdGen {
    fn next(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        format!("{}-{}", BATCH_PREFIX, n)
    }
}
