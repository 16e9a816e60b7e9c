// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::clock::FakeClock;
use std::time::Duration;

fn rod(id: &str) -> ToolId {
    ToolId::new(id)
}

fn config() -> TriggerConfig {
    TriggerConfig::default()
}

#[test]
fn nothing_due_by_default() {
    let clock = FakeClock::new();
    let mut triggers = MaintenanceTriggers::new(&config(), &clock);
    for _ in 0..100 {
        assert!(triggers.on_success(&rod("a"), &clock).is_empty());
        clock.advance(Duration::from_secs(60));
    }
}

#[test]
fn success_count_fires_and_resets() {
    let clock = FakeClock::new();
    let mut cfg = config();
    cfg.restock_every_successes = Some(3);
    let mut triggers = MaintenanceTriggers::new(&cfg, &clock);

    assert!(triggers.on_success(&rod("a"), &clock).is_empty());
    assert!(triggers.on_success(&rod("a"), &clock).is_empty());
    let fired = triggers.on_success(&rod("b"), &clock);
    assert_eq!(
        fired,
        vec![Trigger {
            kind: OperationKind::Restock,
            reason: TriggerReason::SuccessCount,
            target: None,
        }]
    );

    assert!(triggers.on_success(&rod("a"), &clock).is_empty());
    assert!(triggers.on_success(&rod("a"), &clock).is_empty());
    assert_eq!(triggers.on_success(&rod("a"), &clock).len(), 1);
}

#[test]
fn interval_fires_after_elapsed_time() {
    let clock = FakeClock::new();
    let mut cfg = config();
    cfg.cleanup_interval = Some(Duration::from_secs(300));
    let mut triggers = MaintenanceTriggers::new(&cfg, &clock);

    clock.advance(Duration::from_secs(299));
    assert!(triggers.on_success(&rod("a"), &clock).is_empty());

    clock.advance(Duration::from_secs(1));
    let fired = triggers.on_success(&rod("a"), &clock);
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].kind, OperationKind::Cleanup);
    assert_eq!(fired[0].reason, TriggerReason::Interval);

    // Timer restarted at the firing instant
    clock.advance(Duration::from_secs(200));
    assert!(triggers.on_success(&rod("a"), &clock).is_empty());
}

#[test]
fn interval_and_count_fire_once() {
    let clock = FakeClock::new();
    let mut cfg = config();
    cfg.restock_interval = Some(Duration::from_secs(10));
    cfg.restock_every_successes = Some(1);
    let mut triggers = MaintenanceTriggers::new(&cfg, &clock);

    clock.advance(Duration::from_secs(10));
    let fired = triggers.on_success(&rod("a"), &clock);
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].reason, TriggerReason::Interval);
}

#[test]
fn failure_threshold_requests_service_for_the_tool() {
    let clock = FakeClock::new();
    let mut triggers = MaintenanceTriggers::new(&config(), &clock);

    assert!(triggers.on_failure(&rod("a"), &clock).is_empty());
    assert!(triggers.on_failure(&rod("a"), &clock).is_empty());
    assert_eq!(triggers.failures_of(&rod("a")), 2);

    let fired = triggers.on_failure(&rod("a"), &clock);
    assert_eq!(
        fired,
        vec![Trigger {
            kind: OperationKind::Service,
            reason: TriggerReason::FailureThreshold,
            target: Some(rod("a")),
        }]
    );
    assert_eq!(triggers.failures_of(&rod("a")), 0);
}

#[test]
fn failures_are_per_tool_and_reset_on_success() {
    let clock = FakeClock::new();
    let mut triggers = MaintenanceTriggers::new(&config(), &clock);

    triggers.on_failure(&rod("a"), &clock);
    triggers.on_failure(&rod("a"), &clock);
    triggers.on_failure(&rod("b"), &clock);
    assert_eq!(triggers.failures_of(&rod("b")), 1);

    triggers.on_success(&rod("a"), &clock);
    assert_eq!(triggers.failures_of(&rod("a")), 0);
    assert_eq!(triggers.failures_of(&rod("b")), 1);

    triggers.clear_failures(&rod("b"));
    assert_eq!(triggers.failures_of(&rod("b")), 0);
}

#[test]
fn interval_also_checked_on_failure() {
    let clock = FakeClock::new();
    let mut cfg = config();
    cfg.restock_interval = Some(Duration::from_secs(5));
    let mut triggers = MaintenanceTriggers::new(&cfg, &clock);

    clock.advance(Duration::from_secs(6));
    let fired = triggers.on_failure(&rod("a"), &clock);
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].kind, OperationKind::Restock);
}

#[test]
fn trigger_becomes_targeted_operation() {
    let now = Instant::now();
    let op = Trigger {
        kind: OperationKind::Service,
        reason: TriggerReason::FailureThreshold,
        target: Some(rod("a")),
    }
    .into_operation(now);
    assert_eq!(op.kind, OperationKind::Service);
    assert_eq!(op.target, Some(rod("a")));
    assert_eq!(op.enqueued_at, now);
}
