//! Loot configuration values.
//!
//! Only the values are owned here; where they come from (file, admin
//! command, database) is up to the host. [`LootConfig::load`] covers the
//! common case of a JSON file next to the server.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ruleset::Ruleset;

/// Default on-disk location of the loot config
pub const DEFAULT_CONFIG_PATH: &str = "config/loot.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid loot config json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid value for {field}: {value}")]
    Invalid { field: &'static str, value: f64 },
}

/// Drop-rate multipliers and world ruleset.
///
/// A cantrip drop rate of 1.0 is retail; 2.0 doubles the odds. A rate of
/// zero or below disables that cantrip grade entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LootConfig {
    pub minor_cantrip_drop_rate: f64,
    pub major_cantrip_drop_rate: f64,
    pub epic_cantrip_drop_rate: f64,
    pub legendary_cantrip_drop_rate: f64,
    /// Apply the profile quality modifier to cantrip ladders
    pub loot_quality_mod: bool,
    pub world_ruleset: Ruleset,
}

impl Default for LootConfig {
    fn default() -> Self {
        Self {
            minor_cantrip_drop_rate: 1.0,
            major_cantrip_drop_rate: 1.0,
            epic_cantrip_drop_rate: 1.0,
            legendary_cantrip_drop_rate: 1.0,
            loot_quality_mod: true,
            world_ruleset: Ruleset::EoR,
        }
    }
}

impl LootConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: LootConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&content)?;
        tracing::debug!(path = %path.display(), ruleset = config.world_ruleset.as_str(), "loot config loaded");
        Ok(config)
    }

    /// Drop rates must be finite. Non-positive rates are legal.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rates = [
            ("minor_cantrip_drop_rate", self.minor_cantrip_drop_rate),
            ("major_cantrip_drop_rate", self.major_cantrip_drop_rate),
            ("epic_cantrip_drop_rate", self.epic_cantrip_drop_rate),
            ("legendary_cantrip_drop_rate", self.legendary_cantrip_drop_rate),
        ];
        for (field, value) in rates {
            if !value.is_finite() {
                return Err(ConfigError::Invalid { field, value });
            }
        }
        if self.world_ruleset == Ruleset::Invalid {
            tracing::warn!("world ruleset is Invalid, itemization follows the legacy gates");
        }
        Ok(())
    }

    /// Config with every cantrip grade disabled
    pub fn without_cantrips() -> Self {
        Self {
            minor_cantrip_drop_rate: 0.0,
            major_cantrip_drop_rate: 0.0,
            epic_cantrip_drop_rate: 0.0,
            legendary_cantrip_drop_rate: 0.0,
            ..Self::default()
        }
    }
}
