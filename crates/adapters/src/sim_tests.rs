// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn world(config: SimConfig) -> SimulatedWorld {
    SimulatedWorld::new(
        config,
        [ToolId::new("rod-1"), ToolId::new("rod-2")],
        &CycleConfig::default(),
        &SessionConfig::default(),
    )
}

fn rod(id: &str) -> ToolId {
    ToolId::new(id)
}

async fn catch_one(world: &SimulatedWorld) -> bool {
    world.press_and_release("cast").await.unwrap();
    for _ in 0..10 {
        if world.detect_success().await.unwrap().found {
            world.press_and_release("reel").await.unwrap();
            return true;
        }
    }
    world.press_and_release("reel").await.unwrap();
    false
}

#[tokio::test]
async fn cast_needs_an_equipped_tool() {
    let world = world(SimConfig::default());
    let err = world.press_and_release("cast").await.unwrap_err();
    assert_eq!(err, ActuatorError::Rejected("no tool equipped".to_string()));
}

#[tokio::test]
async fn bite_arrives_after_pattern_polls() {
    let world = world(SimConfig {
        bite_pattern: vec![2],
        ..SimConfig::default()
    });
    world.equip(&rod("rod-1")).await.unwrap();
    world.press_and_release("cast").await.unwrap();

    assert!(!world.detect_success().await.unwrap().found);
    assert!(!world.detect_success().await.unwrap().found);
    assert!(world.has_pattern("bite").await.unwrap());
    assert!(world.detect_success().await.unwrap().confirms(0.8));

    world.press_and_release("reel").await.unwrap();
    let snapshot = world.snapshot();
    assert_eq!(snapshot.catches, 1);
    assert_eq!(snapshot.wear[&rod("rod-1")], 1);
    assert_eq!(snapshot.bait, 19);
}

#[tokio::test]
async fn zero_in_pattern_never_bites() {
    let world = world(SimConfig {
        bite_pattern: vec![0],
        ..SimConfig::default()
    });
    world.equip(&rod("rod-1")).await.unwrap();
    assert!(!catch_one(&world).await);
    assert_eq!(world.snapshot().catches, 0);
    assert_eq!(world.snapshot().casts, 1);
}

#[tokio::test]
async fn wear_drives_slot_status() {
    let world = world(SimConfig {
        bite_pattern: vec![1],
        wear_limit: 2,
        ..SimConfig::default()
    });
    world.equip(&rod("rod-1")).await.unwrap();

    assert_eq!(
        world.detect_slot_status(&rod("rod-1")).await.unwrap(),
        SlotStatus::Usable
    );
    assert!(catch_one(&world).await);
    assert!(catch_one(&world).await);
    assert_eq!(
        world.detect_slot_status(&rod("rod-1")).await.unwrap(),
        SlotStatus::NeedsService
    );
    assert!(catch_one(&world).await);
    assert!(catch_one(&world).await);
    assert_eq!(
        world.detect_slot_status(&rod("rod-1")).await.unwrap(),
        SlotStatus::Broken
    );
    // The other rod is untouched
    assert_eq!(
        world.detect_slot_status(&rod("rod-2")).await.unwrap(),
        SlotStatus::Usable
    );
}

#[tokio::test]
async fn maintenance_needs_open_storage() {
    let world = world(SimConfig::default());
    assert_eq!(world.restock().await, Err(CapabilityError::SessionClosed));
    assert_eq!(world.cleanup().await, Err(CapabilityError::SessionClosed));

    world.press_and_release("storage").await.unwrap();
    assert!(world.has_pattern("storage_open").await.unwrap());
    world.restock().await.unwrap();
    world.cleanup().await.unwrap();
    world.service(&rod("rod-2")).await.unwrap();

    // Equipping is a field action, not a storage one
    assert_eq!(
        world.equip(&rod("rod-1")).await,
        Err(CapabilityError::SessionOpen)
    );
    // Casting with storage open is refused
    assert!(world.press_and_release("cast").await.is_err());

    world.press_and_release("storage").await.unwrap();
    let snapshot = world.snapshot();
    assert!(!snapshot.storage_open);
    assert_eq!(snapshot.storage_opens, 1);
    assert_eq!(snapshot.equipped, Some(rod("rod-2")));
}

#[tokio::test]
async fn service_resets_wear() {
    let world = world(SimConfig {
        bite_pattern: vec![1],
        ..SimConfig::default()
    });
    world.equip(&rod("rod-1")).await.unwrap();
    catch_one(&world).await;
    assert_eq!(world.snapshot().wear[&rod("rod-1")], 1);

    world.press_and_release("storage").await.unwrap();
    world.service(&rod("rod-1")).await.unwrap();
    assert_eq!(world.snapshot().wear[&rod("rod-1")], 0);
}

#[tokio::test]
async fn running_out_of_bait_empties_the_slot() {
    let world = world(SimConfig {
        bite_pattern: vec![1],
        bait_capacity: 1,
        ..SimConfig::default()
    });
    world.equip(&rod("rod-1")).await.unwrap();
    assert!(catch_one(&world).await);
    assert!(world.has_pattern("out_of_bait").await.unwrap());
    assert_eq!(
        world.detect_slot_status(&rod("rod-1")).await.unwrap(),
        SlotStatus::Empty
    );
    assert!(!catch_one(&world).await);
}

#[tokio::test]
async fn full_inventory_loses_catches() {
    let world = world(SimConfig {
        bite_pattern: vec![1],
        inventory_capacity: 1,
        ..SimConfig::default()
    });
    world.equip(&rod("rod-1")).await.unwrap();
    catch_one(&world).await;
    catch_one(&world).await;
    let snapshot = world.snapshot();
    assert_eq!(snapshot.catches, 2);
    assert_eq!(snapshot.lost, 1);
    assert!(world.has_pattern("inventory_full").await.unwrap());
}

#[tokio::test]
async fn unknown_inputs_are_errors() {
    let world = world(SimConfig::default());
    assert!(matches!(
        world.press_and_release("jump").await,
        Err(ActuatorError::UnknownControl(_))
    ));
    assert!(world.has_pattern("sunset").await.is_err());
    assert_eq!(
        world.equip(&rod("rod-9")).await,
        Err(CapabilityError::UnknownTool(rod("rod-9")))
    );
}

#[tokio::test]
async fn separate_storage_buttons() {
    let session = SessionConfig {
        open_button: "open".to_string(),
        close_button: "close".to_string(),
    };
    let world = SimulatedWorld::new(
        SimConfig::default(),
        [rod("rod-1")],
        &CycleConfig::default(),
        &session,
    );
    world.press_and_release("open").await.unwrap();
    world.press_and_release("open").await.unwrap();
    assert!(world.snapshot().storage_open);
    assert_eq!(world.snapshot().storage_opens, 1);
    world.press_and_release("close").await.unwrap();
    assert!(!world.snapshot().storage_open);
}
