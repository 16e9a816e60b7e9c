//! `tw simulate` maintenance specs

use crate::prelude::*;

#[test]
fn requested_restock_and_cleanup_share_one_batch() {
    let temp = Project::fast();

    let output = temp
        .tw()
        .args(&[
            "simulate",
            "--config",
            "tw.toml",
            "--request",
            "restock",
            "--request",
            "cleanup",
            "--successes",
            "1",
            "--max-time",
            "30s",
            "--format",
            "json",
        ])
        .passes();

    let json = output.json();
    let first = &json["batches"][0];
    assert_eq!(first["session"], "opened");
    assert_eq!(first["executed"][0], "restock");
    assert_eq!(first["executed"][1], "cleanup");
    assert_eq!(first["close_ok"], true);
    assert_eq!(json["world"]["storage_opens"], json["stats"]["batches_run"]);
}

#[test]
fn requested_switch_moves_rotation() {
    let temp = Project::fast();

    let output = temp
        .tw()
        .args(&[
            "simulate",
            "--config",
            "tw.toml",
            "--switch-to",
            "rod-4",
            "--successes",
            "1",
            "--max-time",
            "30s",
            "--format",
            "json",
        ])
        .passes();

    let json = output.json();
    let first = &json["batches"][0];
    assert_eq!(first["session"], "not_needed");
    assert_eq!(first["deferred"]["outcome"], "ran");
    assert_eq!(first["deferred"]["tool"], "rod-4");
}

#[test]
fn switch_to_unknown_tool_fails() {
    let temp = Project::fast();

    temp.tw()
        .args(&[
            "simulate",
            "--config",
            "tw.toml",
            "--switch-to",
            "rod-9",
            "--max-time",
            "1s",
        ])
        .fails()
        .stderr_has("unknown tool: rod-9");
}
