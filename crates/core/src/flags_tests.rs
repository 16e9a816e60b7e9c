// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[test]
fn wait_is_set_once_and_cleared_once() {
    let mut flags = SyncFlags::default();

    assert!(flags.begin_wait());
    assert!(!flags.begin_wait());
    assert!(flags.waiting_for_batch);

    assert!(flags.end_wait());
    assert!(!flags.end_wait());
    assert!(!flags.waiting_for_batch);
}

#[parameterized(
    nothing_deferred = { None, false, None, DeferredAction::None },
    nothing_deferred_with_session_work = { None, true, None, DeferredAction::None },
    deferred_without_session_work_runs = { Some("rod-3"), false, None, DeferredAction::Run(ToolId::new("rod-3")) },
    deferred_with_unserviced_session_work_runs = { Some("rod-3"), true, None, DeferredAction::Run(ToolId::new("rod-3")) },
    deferred_serviced_target_skips = { Some("rod-3"), true, Some("rod-3"), DeferredAction::Skip(ToolId::new("rod-3")) },
    deferred_other_tool_serviced_runs = { Some("rod-3"), true, Some("rod-1"), DeferredAction::Run(ToolId::new("rod-3")) },
)]
fn deferred_action_decision(
    deferred: Option<&str>,
    had_session: bool,
    serviced: Option<&str>,
    expected: DeferredAction,
) {
    let mut flags = SyncFlags::default();
    if let Some(tool) = deferred {
        flags.record_deferred_switch(ToolId::new(tool));
    }
    if had_session {
        flags.mark_session_operations();
    }
    if let Some(tool) = serviced {
        flags.mark_serviced(&ToolId::new(tool));
    }

    assert_eq!(flags.deferred_action(), expected);
}

#[test]
fn reset_batch_keeps_wait_flag() {
    let mut flags = SyncFlags::default();
    flags.begin_wait();
    flags.record_deferred_switch(ToolId::new("rod-2"));
    flags.mark_session_operations();
    flags.mark_serviced(&ToolId::new("rod-2"));

    flags.reset_batch();

    assert!(flags.waiting_for_batch);
    assert!(flags.deferred_switch.is_none());
    assert!(!flags.had_session_operations);
    assert!(!flags.switch_readied);
}

#[test]
fn release_clears_everything() {
    let mut flags = SyncFlags::default();
    flags.begin_wait();
    flags.record_deferred_switch(ToolId::new("rod-2"));
    flags.mark_session_operations();

    flags.release();

    assert_eq!(flags, SyncFlags::default());
}
