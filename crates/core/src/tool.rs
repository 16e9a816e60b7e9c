// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tools, tool pairs, and slot status

use serde::{Deserialize, Serialize};

/// Unique identifier for an interchangeable tool
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolId(pub String);

impl ToolId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ToolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ToolId {
    fn from(s: String) -> Self {
        ToolId(s)
    }
}

impl From<&str> for ToolId {
    fn from(s: &str) -> Self {
        ToolId(s.to_string())
    }
}

/// Two interchangeable tools used alternately
///
/// Serialized as a two-element array: `["rod-1", "rod-2"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[ToolId; 2]", into = "[ToolId; 2]")]
pub struct ToolPair {
    tools: [ToolId; 2],
}

impl ToolPair {
    pub fn new(first: impl Into<ToolId>, second: impl Into<ToolId>) -> Self {
        Self {
            tools: [first.into(), second.into()],
        }
    }

    /// Tool at `index` within the pair (0 or 1; anything else wraps)
    pub fn get(&self, index: usize) -> &ToolId {
        &self.tools[index % 2]
    }

    pub fn first(&self) -> &ToolId {
        &self.tools[0]
    }

    pub fn tools(&self) -> &[ToolId; 2] {
        &self.tools
    }

    /// Position of `tool` within the pair
    pub fn position(&self, tool: &ToolId) -> Option<usize> {
        self.tools.iter().position(|t| t == tool)
    }

    pub fn contains(&self, tool: &ToolId) -> bool {
        self.position(tool).is_some()
    }
}

impl From<[ToolId; 2]> for ToolPair {
    fn from(tools: [ToolId; 2]) -> Self {
        Self { tools }
    }
}

impl From<ToolPair> for [ToolId; 2] {
    fn from(pair: ToolPair) -> Self {
        pair.tools
    }
}

/// Condition of a tool slot as reported by vision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    Empty,
    Usable,
    NeedsService,
    Broken,
}

impl SlotStatus {
    /// How urgently the slot wants servicing.
    ///
    /// Compared against the batch `opportunistic_threshold` to decide whether
    /// servicing discovered during a batch is worth folding into it.
    pub fn service_priority(&self) -> u32 {
        match self {
            SlotStatus::Usable => 0,
            SlotStatus::NeedsService => 1,
            SlotStatus::Empty => 2,
            SlotStatus::Broken => 3,
        }
    }

    pub fn is_usable(&self) -> bool {
        matches!(self, SlotStatus::Usable)
    }
}

impl std::fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SlotStatus::Empty => "empty",
            SlotStatus::Usable => "usable",
            SlotStatus::NeedsService => "needs_service",
            SlotStatus::Broken => "broken",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
#[path = "tool_tests.rs"]
mod tests;
