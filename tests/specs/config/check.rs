//! `tw config check` specs

use crate::prelude::*;

#[test]
fn accepts_valid_file() {
    let temp = Project::fast();

    temp.tw()
        .args(&["config", "check", "tw.toml"])
        .passes()
        .stdout_has("ok: tw.toml (2 pairs, threshold 3, debounce 100ms)");
}

#[test]
fn rejects_missing_file() {
    let temp = Project::empty();

    temp.tw()
        .args(&["config", "check", "missing.toml"])
        .fails()
        .stderr_has("cannot use config missing.toml");
}

#[test]
fn rejects_malformed_toml() {
    let temp = Project::empty();
    temp.file("bad.toml", "[batch\n");

    temp.tw()
        .args(&["config", "check", "bad.toml"])
        .fails()
        .stderr_has("TOML parse error");
}

#[test]
fn rejects_duplicate_tools() {
    let temp = Project::empty();
    temp.file("dup.toml", "[rotation]\npairs = [[\"a\", \"b\"], [\"b\", \"c\"]]\n");

    temp.tw()
        .args(&["config", "check", "dup.toml"])
        .fails()
        .stderr_has("tool b appears more than once");
}

#[test]
fn rejects_out_of_range_confidence() {
    let temp = Project::empty();
    temp.file("conf.toml", "[cycle]\nmin_confidence = 1.5\n");

    temp.tw()
        .args(&["config", "check", "conf.toml"])
        .fails()
        .stderr_has("cycle.min_confidence must be within 0..=1");
}
