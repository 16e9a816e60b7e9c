//! `tw simulate` run specs

use crate::prelude::*;

#[test]
fn reaches_success_target() {
    let temp = Project::fast();

    temp.tw()
        .args(&[
            "simulate",
            "--config",
            "tw.toml",
            "--successes",
            "5",
            "--max-time",
            "30s",
        ])
        .passes()
        .stdout_has("outcome: reached")
        .stdout_has("active tool: rod-");
}

#[test]
fn json_summary_reports_stats() {
    let temp = Project::fast();

    let output = temp
        .tw()
        .args(&[
            "simulate",
            "--config",
            "tw.toml",
            "--successes",
            "8",
            "--max-time",
            "30s",
            "--format",
            "json",
        ])
        .passes();

    let json = output.json();
    assert_eq!(json["outcome"], "reached");
    assert!(json["stats"]["successes"].as_u64().unwrap() >= 8);
    // Eight successes cross the pair threshold of three at least twice
    assert!(json["stats"]["pair_switches"].as_u64().unwrap() >= 2);
    // A cast into open storage would have been counted as an error
    assert_eq!(json["stats"]["errors"], 0);
    assert_eq!(json["world"]["storage_open"], false);
    assert_eq!(json["world"]["catches"], json["stats"]["successes"]);
}

#[test]
fn missing_target_within_time_fails() {
    let temp = Project::fast();

    temp.tw()
        .args(&[
            "simulate",
            "--config",
            "tw.toml",
            "--bite-pattern",
            "0",
            "--successes",
            "3",
            "--max-time",
            "1s",
        ])
        .fails()
        .stdout_has("outcome: timed out")
        .stderr_has("1s elapsed with 0 of 3 successes");
}

#[test]
fn runs_for_max_time_without_target() {
    let temp = Project::fast();

    temp.tw()
        .args(&["simulate", "--config", "tw.toml", "--max-time", "500ms"])
        .passes()
        .stdout_has("outcome: timed out");
}
