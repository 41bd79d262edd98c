//! # Check Configuration
//!
//! Loaded once at startup, validated, then shared read-only as
//! `Arc<CheckConfig>` by every player's checks.
//!
//! ```toml
//! debug = false
//! server_authoritative_movement = true
//!
//! [checks.survival_fly]
//! enabled = true
//! cancel_threshold = 10.0
//! enable_cancel = true
//!
//! [physics]
//! jump_normal_walk = 1.2523
//! ```
//!
//! Every key is optional; missing keys keep their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{SecurityError, SecurityResult};
use crate::moving::PhysicsTable;
use crate::violation::CheckType;

/// Per-category switches.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckSettings {
    /// Run the check at all.
    pub enabled: bool,
    /// Violation level at which the player is considered cheating.
    pub cancel_threshold: f64,
    /// Cancel the packet once the threshold is reached.
    pub enable_cancel: bool,
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            cancel_threshold: 10.0,
            enable_cancel: true,
        }
    }
}

/// Settings of every check category.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChecksConfig {
    /// Air, fall, fly and bunny-hop checks.
    pub survival_fly: CheckSettings,
}

impl ChecksConfig {
    /// Settings of a category.
    #[must_use]
    pub fn settings(&self, check: CheckType) -> &CheckSettings {
        match check {
            CheckType::SurvivalFly => &self.survival_fly,
        }
    }
}

/// Complete check configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Emit per-tick tag lines and lag-back notices.
    pub debug: bool,
    /// The server owns the player position. When false the client does, and
    /// every lag-back also cancels the movement packet.
    pub server_authoritative_movement: bool,
    /// Per-category settings.
    pub checks: ChecksConfig,
    /// Physics calibration.
    pub physics: PhysicsTable,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            debug: false,
            server_authoritative_movement: true,
            checks: ChecksConfig::default(),
            physics: PhysicsTable::default(),
        }
    }
}

impl CheckConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or fails validation.
    pub fn from_toml_str(source: &str) -> SecurityResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is malformed or fails
    /// validation.
    pub fn from_file(path: impl AsRef<Path>) -> SecurityResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| SecurityError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Serializes the configuration to TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be represented in TOML.
    pub fn to_toml_string(&self) -> SecurityResult<String> {
        Ok(toml::to_string(self)?)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityError::InvalidConfig`] naming the first bad entry.
    pub fn validate(&self) -> SecurityResult<()> {
        let threshold = self.checks.survival_fly.cancel_threshold;
        if !threshold.is_finite() || threshold <= 0.0 {
            warn!(threshold, "rejected survival_fly cancel threshold");
            return Err(SecurityError::InvalidConfig(format!(
                "checks.survival_fly.cancel_threshold must be a positive number, got {threshold}"
            )));
        }

        let invalid = self.physics.invalid_entries();
        if !invalid.is_empty() {
            warn!(entries = ?invalid, "rejected physics table");
            return Err(SecurityError::InvalidConfig(format!(
                "physics entries must be finite and non-negative: {}",
                invalid.join(", ")
            )));
        }
        Ok(())
    }

    /// Settings of a category.
    #[must_use]
    pub fn settings(&self, check: CheckType) -> &CheckSettings {
        self.checks.settings(check)
    }
}
