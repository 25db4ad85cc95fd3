//! Experiment profile management.
//!
//! Timing thresholds are empirical, so they live in an optional
//! `.maskrace.toml` rather than in code. Every field has a default and a
//! missing file is the same as an empty one.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::core::constants;
use crate::error::{ConfigError, Result};

/// Experiment profile stored in `.maskrace.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub timing: Timing,
    #[serde(default)]
    pub secret: SecretSettings,
}

/// Polling and rotation timing.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Timing {
    /// Seconds between two polls of the platform.
    pub poll_interval_secs: u64,
    /// Listing attempts before the triggered run is declared missing.
    pub discovery_attempts: u32,
    /// Ceiling for the sub-job barrier. `None` waits forever.
    pub barrier_attempts: Option<u32>,
    /// Delay added after the barrier fires, before rotating.
    pub grace_secs: u64,
    /// Fraction of `WAIT` after which the late variant rotates.
    pub late_fraction: f64,
    /// Pause between consecutive rapid rotations.
    pub rapid_interval_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            poll_interval_secs: constants::POLL_INTERVAL_SECS,
            discovery_attempts: constants::DISCOVERY_ATTEMPTS,
            barrier_attempts: None,
            grace_secs: constants::GRACE_SECS,
            late_fraction: constants::LATE_FRACTION,
            rapid_interval_ms: constants::RAPID_INTERVAL_MS,
        }
    }
}

impl Timing {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn grace(&self) -> Duration {
        Duration::from_secs(self.grace_secs)
    }

    pub fn rapid_interval(&self) -> Duration {
        Duration::from_millis(self.rapid_interval_ms)
    }

    /// Delay before the late rotation for a wait window of `wait_secs`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` when the delay does not fit a `Duration`.
    pub fn late_delay(&self, wait_secs: u64) -> Result<Duration> {
        Duration::try_from_secs_f64(wait_secs as f64 * self.late_fraction).map_err(|e| {
            ConfigError::Invalid {
                field: "wait",
                reason: format!("{} seconds is out of range: {}", wait_secs, e),
            }
            .into()
        })
    }
}

/// Secret hygiene settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SecretSettings {
    /// Value written back when the experiment ends.
    pub placeholder: String,
}

impl Default for SecretSettings {
    fn default() -> Self {
        Self {
            placeholder: constants::DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

impl Config {
    /// Default profile location in the current directory.
    pub fn default_path() -> PathBuf {
        PathBuf::from(constants::CONFIG_FILE)
    }

    /// Load the profile at `path`, or the default location when `None`.
    ///
    /// An explicit path must exist; the default location is optional.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadFile` or `ConfigError::Parse` for unreadable
    /// or malformed files, and `ConfigError::Invalid` for out-of-range values.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::default_path(), false),
        };

        if !required && !path.exists() {
            debug!(path = %path.display(), "no experiment profile, using defaults");
            return Ok(Self::default());
        }

        debug!(path = %path.display(), "loading experiment profile");
        let contents = std::fs::read_to_string(&path).map_err(ConfigError::ReadFile)?;
        Self::parse(&contents)
    }

    /// Parse and validate a profile from TOML text.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        let timing = &self.timing;
        if !(timing.late_fraction > 0.0 && timing.late_fraction <= 1.0) {
            return Err(ConfigError::Invalid {
                field: "timing.late_fraction",
                reason: format!("{} is not in (0, 1]", timing.late_fraction),
            }
            .into());
        }
        if timing.discovery_attempts == 0 {
            return Err(ConfigError::Invalid {
                field: "timing.discovery_attempts",
                reason: "must be at least 1".to_string(),
            }
            .into());
        }
        if timing.barrier_attempts == Some(0) {
            return Err(ConfigError::Invalid {
                field: "timing.barrier_attempts",
                reason: "must be at least 1 (omit for no limit)".to_string(),
            }
            .into());
        }
        if self.secret.placeholder.is_empty() {
            return Err(ConfigError::Invalid {
                field: "secret.placeholder",
                reason: "must not be empty".to_string(),
            }
            .into());
        }
        Ok(())
    }
}
