// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

fn tool(id: &str) -> ToolId {
    ToolId::new(id)
}

/// Register a use of whichever tool is current
fn register(
    rotation: &mut RotationAllocator,
    succeeded: bool,
    will_open_batch: bool,
) -> Option<ToolId> {
    let used = rotation.current_tool().clone();
    rotation.register_use(&used, succeeded, will_open_batch)
}

fn two_pairs(threshold: u32) -> RotationAllocator {
    RotationAllocator::with_pairs(
        vec![ToolPair::new("a", "b"), ToolPair::new("c", "d")],
        threshold,
    )
    .unwrap()
}

#[test]
fn starts_on_first_tool_of_first_pair() {
    let rotation = two_pairs(3);
    assert_eq!(rotation.current_tool(), &tool("a"));
    assert_eq!(rotation.current_pair_index(), 0);
    assert_eq!(rotation.current_tool_index(), 0);
    assert!(rotation.pending_switch().is_none());
}

#[test]
fn confirmed_uses_alternate_within_pair() {
    let mut rotation = two_pairs(10);

    assert_eq!(register(&mut rotation, true, false), None);
    assert_eq!(rotation.current_tool(), &tool("b"));

    assert_eq!(register(&mut rotation, true, false), None);
    assert_eq!(rotation.current_tool(), &tool("a"));

    assert_eq!(rotation.usage_of(&tool("a")), 1);
    assert_eq!(rotation.usage_of(&tool("b")), 1);
}

#[test]
fn third_use_at_threshold_three_switches_pair() {
    let mut rotation = two_pairs(3);

    assert_eq!(register(&mut rotation, true, false), None);
    assert_eq!(register(&mut rotation, true, false), None);
    let switched = register(&mut rotation, true, false);

    assert_eq!(switched, Some(tool("c")));
    assert_eq!(rotation.current_pair_index(), 1);
    assert_eq!(rotation.current_tool_index(), 0);
    assert_eq!(rotation.usage_of(&tool("c")), 0);
    assert_eq!(rotation.usage_of(&tool("d")), 0);
    // Switching without a batch leaves nothing pending
    assert!(rotation.pending_switch().is_none());
}

#[test]
fn switch_with_batch_about_to_open_is_recorded_as_pending() {
    let mut rotation = two_pairs(1);

    let switched = register(&mut rotation, true, true);

    assert_eq!(switched, Some(tool("c")));
    assert_eq!(rotation.pending_switch(), Some(&tool("c")));
    assert_eq!(rotation.clear_pending_switch(), Some(tool("c")));
    assert!(rotation.pending_switch().is_none());
}

#[test]
fn unconfirmed_use_changes_nothing() {
    let mut rotation = two_pairs(1);

    assert_eq!(register(&mut rotation, false, true), None);
    assert_eq!(rotation.current_tool(), &tool("a"));
    assert_eq!(rotation.usage_of(&tool("a")), 0);
    assert!(rotation.pending_switch().is_none());
}

#[test]
fn last_pair_wraps_to_first_and_zeroes_it() {
    let mut rotation = two_pairs(2);

    register(&mut rotation, true, false);
    assert_eq!(register(&mut rotation, true, false), Some(tool("c")));
    register(&mut rotation, true, false);
    assert_eq!(register(&mut rotation, true, false), Some(tool("a")));

    assert_eq!(rotation.current_pair_index(), 0);
    assert_eq!(rotation.usage_of(&tool("a")), 0);
    assert_eq!(rotation.usage_of(&tool("b")), 0);
    // The pair that was just left keeps its counts until it comes around again
    assert_eq!(rotation.usage_of(&tool("c")), 1);
}

#[test]
fn single_pair_switch_resets_same_pair() {
    let mut rotation =
        RotationAllocator::with_pairs(vec![ToolPair::new("a", "b")], 2).unwrap();

    register(&mut rotation, true, false);
    assert_eq!(register(&mut rotation, true, false), Some(tool("a")));
    assert_eq!(rotation.usage_of(&tool("a")), 0);
    assert_eq!(rotation.usage_of(&tool("b")), 0);
}

#[test]
fn request_pair_switch_moves_to_target_and_marks_pending() {
    let mut rotation = two_pairs(10);
    register(&mut rotation, true, false);

    let target = rotation.request_pair_switch(&tool("d")).unwrap();

    assert_eq!(target, tool("d"));
    assert_eq!(rotation.current_tool(), &tool("d"));
    assert_eq!(rotation.current_pair_index(), 1);
    assert_eq!(rotation.current_tool_index(), 1);
    assert_eq!(rotation.pending_switch(), Some(&tool("d")));
}

#[test]
fn request_switch_within_current_pair_keeps_counters() {
    let mut rotation = two_pairs(10);
    register(&mut rotation, true, false);

    rotation.request_pair_switch(&tool("a")).unwrap();

    assert_eq!(rotation.usage_of(&tool("a")), 1);
}

#[test]
fn use_finishing_after_steer_credits_used_tool_only() {
    let mut rotation = two_pairs(3);
    rotation.request_pair_switch(&tool("d")).unwrap();

    assert_eq!(rotation.register_use(&tool("a"), true, false), None);

    assert_eq!(rotation.usage_of(&tool("a")), 1);
    assert_eq!(rotation.usage_of(&tool("d")), 0);
    assert_eq!(rotation.current_tool(), &tool("d"));
    assert_eq!(rotation.pending_switch(), Some(&tool("d")));
}

#[test]
fn steer_to_tool_in_use_does_not_alternate() {
    let mut rotation = two_pairs(3);
    rotation.request_pair_switch(&tool("a")).unwrap();

    assert_eq!(rotation.register_use(&tool("a"), true, true), None);

    assert_eq!(rotation.usage_of(&tool("a")), 1);
    assert_eq!(rotation.current_tool(), &tool("a"));
}

#[test]
fn use_of_unknown_tool_is_ignored() {
    let mut rotation = two_pairs(3);

    assert_eq!(rotation.register_use(&tool("z"), true, false), None);

    assert_eq!(rotation.current_tool(), &tool("a"));
    assert_eq!(rotation.snapshot().usage.values().sum::<u32>(), 0);
}

#[test]
fn request_switch_to_unknown_tool_fails() {
    let mut rotation = two_pairs(3);
    let err = rotation.request_pair_switch(&tool("z")).unwrap_err();
    assert_eq!(err, RotationError::UnknownTool(tool("z")));
    assert_eq!(rotation.current_tool(), &tool("a"));
}

#[test]
fn snapshot_reflects_state() {
    let mut rotation = two_pairs(3);
    register(&mut rotation, true, false);

    let snapshot = rotation.snapshot();
    assert_eq!(snapshot.current_tool, tool("b"));
    assert_eq!(snapshot.usage.get(&tool("a")), Some(&1));
    assert_eq!(snapshot.usage.len(), 4);
    assert_eq!(snapshot.pair_threshold, 3);
}

#[parameterized(
    no_pairs = { vec![], 3, RotationError::NoPairs },
    zero_threshold = { vec![ToolPair::new("a", "b")], 0, RotationError::ZeroThreshold },
    duplicate_within_pair = { vec![ToolPair::new("a", "a")], 3, RotationError::DuplicateTool(ToolId::new("a")) },
    duplicate_across_pairs = {
        vec![ToolPair::new("a", "b"), ToolPair::new("b", "c")],
        3,
        RotationError::DuplicateTool(ToolId::new("b"))
    },
)]
fn invalid_rotation_rejected(pairs: Vec<ToolPair>, threshold: u32, expected: RotationError) {
    let err = RotationAllocator::with_pairs(pairs, threshold).unwrap_err();
    assert_eq!(err, expected);
}

// Property-based tests
use proptest::prelude::*;

proptest! {
    #[test]
    fn usage_counts_only_confirmed_uses(
        outcomes in proptest::collection::vec(any::<bool>(), 1..60)
    ) {
        // Threshold high enough that no pair switch happens
        let mut rotation = two_pairs(1_000);
        let mut expected: HashMap<ToolId, u32> = HashMap::new();

        for succeeded in outcomes {
            let current = rotation.current_tool().clone();
            prop_assert_eq!(register(&mut rotation, succeeded, false), None);
            if succeeded {
                *expected.entry(current).or_insert(0) += 1;
            }
        }

        for t in ["a", "b", "c", "d"] {
            let id = tool(t);
            prop_assert_eq!(rotation.usage_of(&id), expected.get(&id).copied().unwrap_or(0));
        }
    }

    #[test]
    fn pair_usage_never_exceeds_threshold(
        threshold in 1..8u32,
        uses in 1..100usize
    ) {
        let mut rotation = two_pairs(threshold);
        for _ in 0..uses {
            register(&mut rotation, true, false);
            prop_assert!(rotation.pair_usage() < threshold);
        }
    }
}
