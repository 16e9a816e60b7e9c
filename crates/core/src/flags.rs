// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Flags shared between the cycle and the batch coordinator

use crate::tool::ToolId;

/// Synchronization flags for one batch handshake
///
/// `waiting_for_batch` is true exactly while the cycle is suspended for a
/// batch. The cycle sets it once per batch and the batch completion clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncFlags {
    pub waiting_for_batch: bool,
    pub had_session_operations: bool,
    pub deferred_switch: Option<ToolId>,
    /// Servicing inside this batch succeeded on the deferred switch target
    pub switch_readied: bool,
}

/// What batch completion should do with a recorded deferred switch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeferredAction {
    /// Nothing was deferred
    None,
    /// Nothing in the batch readied the target; equip it now
    Run(ToolId),
    /// Servicing inside the session already readied the target; equipping
    /// again would overwrite it
    Skip(ToolId),
}

impl SyncFlags {
    /// Mark the cycle as suspended. Returns false if it already was.
    pub fn begin_wait(&mut self) -> bool {
        if self.waiting_for_batch {
            return false;
        }
        self.waiting_for_batch = true;
        true
    }

    /// Clear the suspension. Returns false if it was not set.
    pub fn end_wait(&mut self) -> bool {
        std::mem::replace(&mut self.waiting_for_batch, false)
    }

    pub fn record_deferred_switch(&mut self, tool: ToolId) {
        self.deferred_switch = Some(tool);
    }

    pub fn mark_session_operations(&mut self) {
        self.had_session_operations = true;
    }

    /// Note a successful service of `tool`. Only counts when `tool` is the
    /// deferred switch target.
    pub fn mark_serviced(&mut self, tool: &ToolId) {
        if self.deferred_switch.as_ref() == Some(tool) {
            self.switch_readied = true;
        }
    }

    /// Decide step one of batch completion without changing anything
    pub fn deferred_action(&self) -> DeferredAction {
        match &self.deferred_switch {
            None => DeferredAction::None,
            Some(tool) if self.switch_readied => DeferredAction::Skip(tool.clone()),
            Some(tool) => DeferredAction::Run(tool.clone()),
        }
    }

    /// Forget the deferred switch and the per-batch markers
    pub fn reset_batch(&mut self) {
        self.deferred_switch = None;
        self.had_session_operations = false;
        self.switch_readied = false;
    }

    /// Clear everything, whatever state the batch was in
    pub fn release(&mut self) {
        *self = SyncFlags::default();
    }
}

#[cfg(test)]
#[path = "flags_tests.rs"]
mod tests;
