//! Behavioral specifications for the tw CLI.
//!
//! These tests are black-box: they invoke the CLI binary and verify
//! stdout, stderr, and exit codes.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

// cli/
#[path = "specs/cli/errors.rs"]
mod cli_errors;
#[path = "specs/cli/help.rs"]
mod cli_help;

// config/
#[path = "specs/config/check.rs"]
mod config_check;
#[path = "specs/config/show.rs"]
mod config_show;

// simulate/
#[path = "specs/simulate/maintenance.rs"]
mod simulate_maintenance;
#[path = "specs/simulate/run.rs"]
mod simulate_run;
