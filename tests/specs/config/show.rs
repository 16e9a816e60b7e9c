//! `tw config show` specs

use crate::prelude::*;

#[test]
fn shows_defaults() {
    let temp = Project::empty();

    temp.tw()
        .args(&["config", "show"])
        .passes()
        .stdout_has("[cycle]")
        .stdout_has("[batch]")
        .stdout_has("debounce_window = \"2s\"")
        .stdout_has("pair_threshold = 10");
}

#[test]
fn shows_file_merged_over_defaults() {
    let temp = Project::fast();

    temp.tw()
        .args(&["config", "show", "--config", "tw.toml"])
        .passes()
        .stdout_has("debounce_window = \"100ms\"")
        .stdout_has("pair_threshold = 3")
        .stdout_has("failure_threshold = 3")
        .stdout_lacks("restock_interval");
}
