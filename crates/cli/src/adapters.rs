// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Adapter factory for CLI commands

use tw_adapters::{ActuatorSession, SimConfig, SimulatedWorld};
use tw_core::TidewatchConfig;
use tw_engine::RuntimeDeps;

/// Runtime dependencies backed by one simulated world
pub type SimDeps = RuntimeDeps<SimulatedWorld, SimulatedWorld, ActuatorSession<SimulatedWorld>>;

/// Build a world holding every tool in the rotation, plus the adapters
/// that drive it
pub fn simulated(config: &TidewatchConfig, sim: SimConfig) -> (SimulatedWorld, SimDeps) {
    let tools = config
        .rotation
        .pairs
        .iter()
        .flat_map(|pair| pair.tools().iter().cloned());
    let world = SimulatedWorld::new(sim, tools, &config.cycle, &config.session);
    let deps = RuntimeDeps {
        actuator: world.clone(),
        vision: world.clone(),
        session: ActuatorSession::new(world.clone(), &config.session),
        capabilities: world.capabilities(),
    };
    (world, deps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tw_adapters::StorageSession;
    use tw_core::ToolId;

    #[tokio::test]
    async fn every_rotation_tool_can_be_equipped() {
        let config = TidewatchConfig::default();
        let (world, deps) = simulated(&config, SimConfig::default());

        for pair in &config.rotation.pairs {
            for tool in pair.tools() {
                assert!(deps.capabilities.equip(tool).await.unwrap());
            }
        }
        assert!(deps.capabilities.equip(&ToolId::new("nope")).await.is_err());
        assert_eq!(world.snapshot().equipped, Some(ToolId::new("rod-2")));
    }

    #[tokio::test]
    async fn session_drives_world_storage() {
        let config = TidewatchConfig::default();
        let (world, deps) = simulated(&config, SimConfig::default());

        assert!(deps.session.open("restock").await);
        assert!(world.snapshot().storage_open);
        assert!(deps.session.close("restock").await);
        assert!(!world.snapshot().storage_open);
    }
}
