// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deterministic simulated environment
//!
//! One shared world that implements the actuator, vision and every
//! maintenance capability, so the whole orchestration can run without a
//! real screen. Bites arrive after a repeating pattern of detection polls;
//! a zero in the pattern is a cast that never gets a bite.
//!
//! Slot status of a tool is derived from its wear: `NeedsService` at
//! `wear_limit` catches, `Broken` at twice that. The equipped tool reads
//! `Empty` once bait runs out.

use crate::actuator::{Actuator, ActuatorError, Point};
use crate::capability::{
    Capabilities, CapabilityError, Cleaner, Equipper, Restocker, Servicer,
};
use crate::vision::{Detection, Vision, VisionError};
use async_trait::async_trait;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};
use tw_core::{CycleConfig, SessionConfig, SlotStatus, ToolId};

/// Tunables for the simulated world
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    /// Detection polls before each successive bite; 0 means no bite
    pub bite_pattern: Vec<u32>,
    pub bait_capacity: u32,
    pub inventory_capacity: u32,
    pub wear_limit: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            bite_pattern: vec![3, 5, 2, 4, 0, 3],
            bait_capacity: 20,
            inventory_capacity: 15,
            wear_limit: 6,
        }
    }
}

/// Observable state of the simulated world
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimSnapshot {
    pub casts: u64,
    pub catches: u64,
    /// Catches dropped because the inventory was full
    pub lost: u64,
    pub bait: u32,
    pub inventory: u32,
    pub equipped: Option<ToolId>,
    pub storage_open: bool,
    pub storage_opens: u64,
    pub wear: BTreeMap<ToolId, u32>,
}

#[derive(Debug)]
struct World {
    config: SimConfig,
    cast_button: String,
    complete_button: String,
    open_button: String,
    close_button: String,
    tools: HashSet<ToolId>,
    wear: BTreeMap<ToolId, u32>,
    equipped: Option<ToolId>,
    bait: u32,
    inventory: u32,
    storage_open: bool,
    storage_opens: u64,
    casts: u64,
    catches: u64,
    lost: u64,
    pattern_index: usize,
    /// Polls remaining until the bite of the current cast, if any
    line: Option<Option<u32>>,
}

impl World {
    fn next_bite(&mut self) -> Option<u32> {
        let pattern = &self.config.bite_pattern;
        if pattern.is_empty() {
            return Some(0);
        }
        let polls = pattern[self.pattern_index % pattern.len()];
        self.pattern_index += 1;
        (polls > 0).then_some(polls)
    }

    fn cast(&mut self) -> Result<(), ActuatorError> {
        if self.storage_open {
            return Err(ActuatorError::Rejected("storage is open".to_string()));
        }
        if self.equipped.is_none() {
            return Err(ActuatorError::Rejected("no tool equipped".to_string()));
        }
        self.casts += 1;
        let bite = if self.bait > 0 {
            self.bait -= 1;
            self.next_bite()
        } else {
            None
        };
        self.line = Some(bite);
        Ok(())
    }

    fn complete(&mut self) {
        let landed = matches!(self.line.take(), Some(Some(0)));
        if !landed {
            return;
        }
        self.catches += 1;
        if self.inventory < self.config.inventory_capacity {
            self.inventory += 1;
        } else {
            self.lost += 1;
        }
        if let Some(tool) = &self.equipped {
            *self.wear.entry(tool.clone()).or_insert(0) += 1;
        }
    }

    fn toggle_storage(&mut self, button: &str) {
        let open = if self.open_button == self.close_button {
            !self.storage_open
        } else {
            button == self.open_button
        };
        if open && !self.storage_open {
            self.storage_opens += 1;
        }
        self.storage_open = open;
    }

    fn require_open(&self) -> Result<(), CapabilityError> {
        if self.storage_open {
            Ok(())
        } else {
            Err(CapabilityError::SessionClosed)
        }
    }

    fn require_tool(&self, tool: &ToolId) -> Result<(), CapabilityError> {
        if self.tools.contains(tool) {
            Ok(())
        } else {
            Err(CapabilityError::UnknownTool(tool.clone()))
        }
    }

    fn slot_status(&self, tool: &ToolId) -> SlotStatus {
        let wear = self.wear.get(tool).copied().unwrap_or(0);
        let limit = self.config.wear_limit.max(1);
        if wear >= limit * 2 {
            SlotStatus::Broken
        } else if wear >= limit {
            SlotStatus::NeedsService
        } else if self.bait == 0 && self.equipped.as_ref() == Some(tool) {
            SlotStatus::Empty
        } else {
            SlotStatus::Usable
        }
    }
}

/// The simulated environment, shared by every adapter handle
#[derive(Clone)]
pub struct SimulatedWorld {
    inner: Arc<Mutex<World>>,
}

impl SimulatedWorld {
    pub fn new(
        config: SimConfig,
        tools: impl IntoIterator<Item = ToolId>,
        cycle: &CycleConfig,
        session: &SessionConfig,
    ) -> Self {
        let tools: HashSet<ToolId> = tools.into_iter().collect();
        let wear = tools.iter().map(|t| (t.clone(), 0)).collect();
        let bait = config.bait_capacity;
        Self {
            inner: Arc::new(Mutex::new(World {
                config,
                cast_button: cycle.cast_button.clone(),
                complete_button: cycle.complete_button.clone(),
                open_button: session.open_button.clone(),
                close_button: session.close_button.clone(),
                tools,
                wear,
                equipped: None,
                bait,
                inventory: 0,
                storage_open: false,
                storage_opens: 0,
                casts: 0,
                catches: 0,
                lost: 0,
                pattern_index: 0,
                line: None,
            })),
        }
    }

    /// Every capability, backed by this world
    pub fn capabilities(&self) -> Capabilities {
        Capabilities::new()
            .with_restocker(Arc::new(self.clone()))
            .with_cleaner(Arc::new(self.clone()))
            .with_servicer(Arc::new(self.clone()))
            .with_equipper(Arc::new(self.clone()))
    }

    pub fn snapshot(&self) -> SimSnapshot {
        let world = self.lock();
        SimSnapshot {
            casts: world.casts,
            catches: world.catches,
            lost: world.lost,
            bait: world.bait,
            inventory: world.inventory,
            equipped: world.equipped.clone(),
            storage_open: world.storage_open,
            storage_opens: world.storage_opens,
            wear: world.wear.clone(),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, World> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Actuator for SimulatedWorld {
    async fn press_and_release(&self, button: &str) -> Result<(), ActuatorError> {
        let mut world = self.lock();
        if button == world.cast_button {
            world.cast()
        } else if button == world.complete_button {
            world.complete();
            Ok(())
        } else if button == world.open_button || button == world.close_button {
            world.toggle_storage(button);
            Ok(())
        } else {
            Err(ActuatorError::UnknownControl(button.to_string()))
        }
    }

    async fn hold_down(&self, _key: &str) -> Result<(), ActuatorError> {
        Ok(())
    }

    async fn release(&self, _key: &str) -> Result<(), ActuatorError> {
        Ok(())
    }

    async fn move_to(&self, _to: Point) -> Result<(), ActuatorError> {
        Ok(())
    }

    async fn drag(&self, _from: Point, _to: Point) -> Result<(), ActuatorError> {
        Ok(())
    }
}

#[async_trait]
impl Vision for SimulatedWorld {
    async fn detect_success(&self) -> Result<Detection, VisionError> {
        let mut world = self.lock();
        match &mut world.line {
            Some(Some(0)) => Ok(Detection::found(0.95)),
            Some(Some(polls)) => {
                *polls -= 1;
                Ok(Detection::missing())
            }
            _ => Ok(Detection::missing()),
        }
    }

    async fn has_pattern(&self, name: &str) -> Result<bool, VisionError> {
        let world = self.lock();
        match name {
            "storage_open" => Ok(world.storage_open),
            "bite" => Ok(matches!(world.line, Some(Some(0)))),
            "inventory_full" => Ok(world.inventory >= world.config.inventory_capacity),
            "out_of_bait" => Ok(world.bait == 0),
            _ => Err(VisionError::UnknownPattern(name.to_string())),
        }
    }

    async fn detect_slot_status(&self, slot: &ToolId) -> Result<SlotStatus, VisionError> {
        Ok(self.lock().slot_status(slot))
    }
}

#[async_trait]
impl Restocker for SimulatedWorld {
    async fn restock(&self) -> Result<(), CapabilityError> {
        let mut world = self.lock();
        world.require_open()?;
        world.bait = world.config.bait_capacity;
        Ok(())
    }
}

#[async_trait]
impl Cleaner for SimulatedWorld {
    async fn cleanup(&self) -> Result<(), CapabilityError> {
        let mut world = self.lock();
        world.require_open()?;
        world.inventory = 0;
        Ok(())
    }
}

#[async_trait]
impl Servicer for SimulatedWorld {
    async fn service(&self, tool: &ToolId) -> Result<(), CapabilityError> {
        let mut world = self.lock();
        world.require_open()?;
        world.require_tool(tool)?;
        world.wear.insert(tool.clone(), 0);
        world.equipped = Some(tool.clone());
        Ok(())
    }
}

#[async_trait]
impl Equipper for SimulatedWorld {
    async fn equip(&self, tool: &ToolId) -> Result<(), CapabilityError> {
        let mut world = self.lock();
        if world.storage_open {
            return Err(CapabilityError::SessionOpen);
        }
        world.require_tool(tool)?;
        world.equipped = Some(tool.clone());
        Ok(())
    }
}

#[cfg(test)]
#[path = "sim_tests.rs"]
mod tests;
