// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::clock::FakeClock;
use std::time::Duration;

#[test]
fn operation_records_enqueue_time() {
    let clock = FakeClock::new();
    let before = clock.now();
    clock.advance(Duration::from_secs(3));

    let op = Operation::new(OperationKind::Restock, TriggerReason::Interval, &clock);

    assert_eq!(op.kind, OperationKind::Restock);
    assert_eq!(op.reason, TriggerReason::Interval);
    assert_eq!(op.enqueued_at.duration_since(before), Duration::from_secs(3));
    assert!(op.target.is_none());
}

#[test]
fn with_target_sets_tool() {
    let clock = FakeClock::new();
    let op = Operation::new(OperationKind::PairSwitch, TriggerReason::External, &clock)
        .with_target("rod-3");
    assert_eq!(op.target, Some(ToolId::new("rod-3")));
}

#[test]
fn only_pair_switch_skips_the_session() {
    for kind in OperationKind::ALL {
        assert_eq!(kind.uses_session(), kind != OperationKind::PairSwitch);
    }
}

#[test]
fn kinds_render_snake_case() {
    assert_eq!(OperationKind::PairSwitch.to_string(), "pair_switch");
    assert_eq!(TriggerReason::FailureThreshold.to_string(), "failure_threshold");
    assert_eq!(
        serde_json::to_string(&OperationKind::Cleanup).unwrap(),
        r#""cleanup""#
    );
}
