// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration value objects
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration. Durations use humantime strings ("2s", "300ms").

use crate::rotation::{RotationAllocator, RotationError};
use crate::tool::ToolPair;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors from loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML render error: {0}")]
    Render(#[from] toml::ser::Error),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
    #[error("invalid rotation: {0}")]
    Rotation(#[from] RotationError),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TidewatchConfig {
    pub cycle: CycleConfig,
    pub batch: BatchConfig,
    pub rotation: RotationConfig,
    pub session: SessionConfig,
    pub triggers: TriggerConfig,
}

/// Timing and controls for the acquisition cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CycleConfig {
    /// Upper bound on one attempt; expiry counts as a failure
    #[serde(with = "humantime_serde")]
    pub attempt_timeout: Duration,
    /// Sleep between driver loop iterations
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,
    /// Pause after a success so concurrent requests can land
    #[serde(with = "humantime_serde")]
    pub grace_delay: Duration,
    /// Sleep between success detections within an attempt
    #[serde(with = "humantime_serde")]
    pub detect_interval: Duration,
    pub min_confidence: f32,
    pub cast_button: String,
    pub complete_button: String,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            attempt_timeout: Duration::from_secs(20),
            poll_interval: Duration::from_millis(100),
            grace_delay: Duration::from_millis(300),
            detect_interval: Duration::from_millis(50),
            min_confidence: 0.8,
            cast_button: "cast".to_string(),
            complete_button: "reel".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// How long requests are coalesced after the first one arrives
    #[serde(with = "humantime_serde")]
    pub debounce_window: Duration,
    /// Minimum slot-status priority that earns an opportunistic service
    pub opportunistic_threshold: u32,
    /// Sleep between safe-point checks
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            debounce_window: Duration::from_secs(2),
            opportunistic_threshold: 1,
            poll_interval: Duration::from_millis(50),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    pub pairs: Vec<ToolPair>,
    /// Combined uses of a pair before moving to the next one
    pub pair_threshold: u32,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            pairs: vec![ToolPair::new("rod-1", "rod-2")],
            pair_threshold: 10,
        }
    }
}

/// Controls that open and close the storage session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub open_button: String,
    pub close_button: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            open_button: "storage".to_string(),
            close_button: "storage".to_string(),
        }
    }
}

/// When maintenance gets requested automatically
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerConfig {
    #[serde(with = "humantime_serde", skip_serializing_if = "Option::is_none")]
    pub restock_interval: Option<Duration>,
    #[serde(with = "humantime_serde", skip_serializing_if = "Option::is_none")]
    pub cleanup_interval: Option<Duration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restock_every_successes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleanup_every_successes: Option<u32>,
    /// Consecutive failures of one tool before it is sent for service
    pub failure_threshold: u32,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            restock_interval: None,
            cleanup_interval: None,
            restock_every_successes: None,
            cleanup_every_successes: None,
            failure_threshold: 3,
        }
    }
}

impl TidewatchConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: TidewatchConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let nonzero = [
            ("cycle.attempt_timeout", self.cycle.attempt_timeout),
            ("cycle.poll_interval", self.cycle.poll_interval),
            ("cycle.detect_interval", self.cycle.detect_interval),
            ("batch.poll_interval", self.batch.poll_interval),
        ];
        for (name, value) in nonzero {
            if value.is_zero() {
                return Err(ConfigError::Invalid(format!("{} must be non-zero", name)));
            }
        }

        if !(0.0..=1.0).contains(&self.cycle.min_confidence) {
            return Err(ConfigError::Invalid(format!(
                "cycle.min_confidence must be within 0..=1, got {}",
                self.cycle.min_confidence
            )));
        }

        let buttons = [
            ("cycle.cast_button", &self.cycle.cast_button),
            ("cycle.complete_button", &self.cycle.complete_button),
            ("session.open_button", &self.session.open_button),
            ("session.close_button", &self.session.close_button),
        ];
        for (name, button) in buttons {
            if button.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{} must not be empty", name)));
            }
        }

        if self.triggers.failure_threshold == 0 {
            return Err(ConfigError::Invalid(
                "triggers.failure_threshold must be greater than zero".to_string(),
            ));
        }
        let counts = [
            ("triggers.restock_every_successes", self.triggers.restock_every_successes),
            ("triggers.cleanup_every_successes", self.triggers.cleanup_every_successes),
        ];
        for (name, count) in counts {
            if count == Some(0) {
                return Err(ConfigError::Invalid(format!("{} must be greater than zero", name)));
            }
        }
        let intervals = [
            ("triggers.restock_interval", self.triggers.restock_interval),
            ("triggers.cleanup_interval", self.triggers.cleanup_interval),
        ];
        for (name, interval) in intervals {
            if interval.is_some_and(|d| d.is_zero()) {
                return Err(ConfigError::Invalid(format!("{} must be non-zero", name)));
            }
        }

        RotationAllocator::new(&self.rotation)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
