//! Helpers shared by the behavioral specs

use assert_cmd::assert::Assert;
use assert_cmd::Command;
use predicates::prelude::*;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Timings short enough that a simulated success takes milliseconds
pub const FAST_CONFIG: &str = r#"
[cycle]
attempt_timeout = "300ms"
poll_interval = "10ms"
grace_delay = "20ms"
detect_interval = "5ms"

[batch]
debounce_window = "100ms"
poll_interval = "10ms"

[rotation]
pairs = [["rod-1", "rod-2"], ["rod-3", "rod-4"]]
pair_threshold = 3

[triggers]
restock_every_successes = 4
cleanup_every_successes = 6
"#;

/// A scratch directory to run the CLI in
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// A project holding `tw.toml` with [`FAST_CONFIG`]
    pub fn fast() -> Self {
        let project = Self::empty();
        project.file("tw.toml", FAST_CONFIG);
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn tw(&self) -> Cli {
        let mut cmd = Command::cargo_bin("tw").unwrap();
        cmd.current_dir(self.path()).env("RUST_LOG", "warn");
        Cli { cmd }
    }
}

/// A pending CLI invocation
pub struct Cli {
    cmd: Command,
}

impl Cli {
    pub fn args<S: AsRef<OsStr>>(mut self, args: &[S]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn passes(mut self) -> Output {
        Output {
            assert: self.cmd.assert().success(),
        }
    }

    pub fn fails(mut self) -> Output {
        Output {
            assert: self.cmd.assert().failure(),
        }
    }
}

/// The finished invocation
pub struct Output {
    assert: Assert,
}

impl Output {
    pub fn stdout_has(self, expected: &str) -> Self {
        Self {
            assert: self.assert.stdout(predicate::str::contains(expected)),
        }
    }

    pub fn stdout_lacks(self, unexpected: &str) -> Self {
        Self {
            assert: self
                .assert
                .stdout(predicate::str::contains(unexpected).not()),
        }
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        Self {
            assert: self.assert.stderr(predicate::str::contains(expected)),
        }
    }

    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.assert.get_output().stdout).into_owned()
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout()).unwrap()
    }
}
