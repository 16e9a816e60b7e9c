// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Paired tool rotation
//!
//! Tools are grouped into interchangeable pairs. Confirmed uses alternate
//! between the two tools of the current pair; once the pair's combined usage
//! reaches the threshold the allocator moves on to the next pair.
//!
//! Usage counters only change on confirmed use (increment) and on a pair
//! switch (the incoming pair is zeroed). Servicing a tool never touches them.

use crate::config::RotationConfig;
use crate::tool::{ToolId, ToolPair};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use thiserror::Error;

/// Errors from building or steering the rotation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RotationError {
    #[error("rotation needs at least one tool pair")]
    NoPairs,
    #[error("pair threshold must be greater than zero")]
    ZeroThreshold,
    #[error("tool {0} appears more than once in the rotation")]
    DuplicateTool(ToolId),
    #[error("unknown tool: {0}")]
    UnknownTool(ToolId),
}

/// Which tool is active, and how much each tool has been used
#[derive(Debug, Clone)]
pub struct RotationAllocator {
    pairs: Vec<ToolPair>,
    pair_threshold: u32,
    current_pair: usize,
    current_in_pair: usize,
    usage: HashMap<ToolId, u32>,
    pending_switch: Option<ToolId>,
}

/// Serializable view of the rotation for observers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RotationSnapshot {
    pub current_tool: ToolId,
    pub current_pair: usize,
    pub current_tool_index: usize,
    pub pair_threshold: u32,
    pub usage: BTreeMap<ToolId, u32>,
    pub pending_switch: Option<ToolId>,
}

impl RotationAllocator {
    pub fn new(config: &RotationConfig) -> Result<Self, RotationError> {
        Self::with_pairs(config.pairs.clone(), config.pair_threshold)
    }

    pub fn with_pairs(pairs: Vec<ToolPair>, pair_threshold: u32) -> Result<Self, RotationError> {
        if pairs.is_empty() {
            return Err(RotationError::NoPairs);
        }
        if pair_threshold == 0 {
            return Err(RotationError::ZeroThreshold);
        }

        let mut seen = HashSet::new();
        for tool in pairs.iter().flat_map(|p| p.tools().iter()) {
            if !seen.insert(tool.clone()) {
                return Err(RotationError::DuplicateTool(tool.clone()));
            }
        }

        let usage = seen.into_iter().map(|tool| (tool, 0)).collect();
        Ok(Self {
            pairs,
            pair_threshold,
            current_pair: 0,
            current_in_pair: 0,
            usage,
            pending_switch: None,
        })
    }

    /// The tool that should be in use right now
    pub fn current_tool(&self) -> &ToolId {
        self.pairs[self.current_pair].get(self.current_in_pair)
    }

    pub fn current_pair_index(&self) -> usize {
        self.current_pair
    }

    pub fn current_tool_index(&self) -> usize {
        self.current_in_pair
    }

    pub fn pair_threshold(&self) -> u32 {
        self.pair_threshold
    }

    /// Confirmed uses of `tool` since its pair was last switched in
    pub fn usage_of(&self, tool: &ToolId) -> u32 {
        self.usage.get(tool).copied().unwrap_or(0)
    }

    /// Combined usage of the current pair
    pub fn pair_usage(&self) -> u32 {
        self.pairs[self.current_pair]
            .tools()
            .iter()
            .map(|t| self.usage_of(t))
            .sum()
    }

    /// Switch target whose physical equip is waiting on a batch
    pub fn pending_switch(&self) -> Option<&ToolId> {
        self.pending_switch.as_ref()
    }

    pub fn clear_pending_switch(&mut self) -> Option<ToolId> {
        self.pending_switch.take()
    }

    /// Record the outcome of one attempt made with `used`.
    ///
    /// Returns the first tool of the next pair when this use exhausted the
    /// current pair. When `will_open_batch` is set the returned tool is also
    /// kept as the pending switch: the caller must not equip it until the
    /// batch that is about to open has finished.
    ///
    /// If the rotation was steered while the attempt ran (`used` is no longer
    /// current, or a requested switch is pending), `used` is still credited
    /// but the rotation does not advance: the steered target stays active.
    pub fn register_use(
        &mut self,
        used: &ToolId,
        succeeded: bool,
        will_open_batch: bool,
    ) -> Option<ToolId> {
        if !succeeded {
            return None;
        }
        let Some(count) = self.usage.get_mut(used) else {
            tracing::warn!(tool = %used, "use of a tool outside the rotation ignored");
            return None;
        };
        *count += 1;

        if used != self.current_tool() || self.pending_switch.is_some() {
            tracing::debug!(
                tool = %used,
                current = %self.current_tool(),
                "rotation steered during use; not advancing"
            );
            return None;
        }
        let tool = used.clone();

        if self.pair_usage() < self.pair_threshold {
            self.current_in_pair = (self.current_in_pair + 1) % 2;
            return None;
        }

        let exhausted = self.current_pair;
        self.current_pair = (self.current_pair + 1) % self.pairs.len();
        self.current_in_pair = 0;
        self.reset_pair_usage(self.current_pair);

        let next = self.current_tool().clone();
        if will_open_batch {
            self.pending_switch = Some(next.clone());
        }

        tracing::info!(
            from_pair = exhausted,
            to_pair = self.current_pair,
            last_tool = %tool,
            next_tool = %next,
            deferred = will_open_batch,
            "tool pair exhausted"
        );

        Some(next)
    }

    /// Steer the rotation to `target` on request.
    ///
    /// Moving into a different pair zeroes that pair's counters, exactly as
    /// an exhausted pair would. The target is recorded as the pending switch
    /// so it is equipped once the exclusive session is free.
    pub fn request_pair_switch(&mut self, target: &ToolId) -> Result<ToolId, RotationError> {
        let (pair_index, position) = self
            .pairs
            .iter()
            .enumerate()
            .find_map(|(i, pair)| pair.position(target).map(|pos| (i, pos)))
            .ok_or_else(|| RotationError::UnknownTool(target.clone()))?;

        if pair_index != self.current_pair {
            self.reset_pair_usage(pair_index);
        }
        self.current_pair = pair_index;
        self.current_in_pair = position;
        self.pending_switch = Some(target.clone());

        Ok(target.clone())
    }

    pub fn snapshot(&self) -> RotationSnapshot {
        RotationSnapshot {
            current_tool: self.current_tool().clone(),
            current_pair: self.current_pair,
            current_tool_index: self.current_in_pair,
            pair_threshold: self.pair_threshold,
            usage: self
                .usage
                .iter()
                .map(|(tool, count)| (tool.clone(), *count))
                .collect(),
            pending_switch: self.pending_switch.clone(),
        }
    }

    fn reset_pair_usage(&mut self, pair_index: usize) {
        for tool in self.pairs[pair_index].tools() {
            self.usage.insert(tool.clone(), 0);
        }
    }
}

#[cfg(test)]
#[path = "rotation_tests.rs"]
mod tests;
