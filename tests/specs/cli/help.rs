//! Help and version specs

use crate::prelude::*;

#[test]
fn help_lists_commands() {
    let temp = Project::empty();

    temp.tw()
        .args(&["--help"])
        .passes()
        .stdout_has("simulate")
        .stdout_has("config");
}

#[test]
fn simulate_help_lists_options() {
    let temp = Project::empty();

    temp.tw()
        .args(&["simulate", "--help"])
        .passes()
        .stdout_has("--successes")
        .stdout_has("--max-time")
        .stdout_has("--request")
        .stdout_has("--switch-to");
}

#[test]
fn version_is_printed() {
    let temp = Project::empty();

    temp.tw()
        .args(&["--version"])
        .passes()
        .stdout_has(env!("CARGO_PKG_VERSION"));
}
