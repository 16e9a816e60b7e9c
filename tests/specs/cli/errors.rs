//! Usage error specs

use crate::prelude::*;

#[test]
fn unknown_command_fails() {
    let temp = Project::empty();

    temp.tw()
        .args(&["fish"])
        .fails()
        .stderr_has("unrecognized subcommand");
}

#[test]
fn unknown_request_kind_fails() {
    let temp = Project::empty();

    temp.tw()
        .args(&["simulate", "--request", "polish"])
        .fails()
        .stderr_has("invalid value 'polish'");
}

#[test]
fn bad_duration_fails() {
    let temp = Project::empty();

    temp.tw()
        .args(&["simulate", "--max-time", "soon"])
        .fails()
        .stderr_has("--max-time");
}
