//! labtest configuration
//!
//! Settings come from three layers, later ones winning:
//! 1. the embedded defaults (`default.toml`)
//! 2. an optional user file given with `--config`
//! 3. command-line flags (applied by `main`)
//!
//! A user file only needs the keys it changes:
//!
//! ```toml
//! [btest]
//! trials = 500
//!
//! [qtest]
//! buffer_size = 16
//! ```

use lab_bits::CheckOptions;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Embedded default configuration
pub static DEFAULT_CONFIG: &str = include_str!("default.toml");

/// Settings for the puzzle checker
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BtestConfig {
    pub seed: u64,
    pub trials: usize,
    /// Puzzle names to check; empty means all
    pub functions: Vec<String>,
}

impl BtestConfig {
    pub fn check_options(&self) -> CheckOptions {
        CheckOptions {
            seed: self.seed,
            trials: self.trials,
        }
    }
}

/// Settings for the queue driver
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QtestConfig {
    /// Capacity of the removal buffer, NUL included
    pub buffer_size: usize,
}

/// Complete configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LabConfig {
    pub btest: BtestConfig,
    pub qtest: QtestConfig,
}

/// User overrides; every key is optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    #[serde(default)]
    pub btest: BtestOverrides,
    #[serde(default)]
    pub qtest: QtestOverrides,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BtestOverrides {
    pub seed: Option<u64>,
    pub trials: Option<usize>,
    pub functions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QtestOverrides {
    pub buffer_size: Option<usize>,
}

impl LabConfig {
    /// Parse a complete configuration from TOML
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse config: {}", e))
    }

    /// Load the embedded defaults
    pub fn default_config() -> Result<Self, String> {
        Self::from_toml(DEFAULT_CONFIG)
    }

    /// Defaults merged with the user file at `path`, if any
    pub fn load(path: Option<&Path>) -> Result<Self, String> {
        let mut config = Self::default_config()?;
        if let Some(path) = path {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;
            let overrides = ConfigOverrides::from_toml(&text)
                .map_err(|e| format!("{}: {}", path.display(), e))?;
            config.merge(overrides);
        }
        config.validate()?;
        Ok(config)
    }

    /// Apply user overrides
    pub fn merge(&mut self, other: ConfigOverrides) {
        if let Some(seed) = other.btest.seed {
            self.btest.seed = seed;
        }
        if let Some(trials) = other.btest.trials {
            self.btest.trials = trials;
        }
        if let Some(functions) = other.btest.functions {
            self.btest.functions = functions;
        }
        if let Some(buffer_size) = other.qtest.buffer_size {
            self.qtest.buffer_size = buffer_size;
        }
    }

    /// Reject settings the drivers cannot use
    pub fn validate(&self) -> Result<(), String> {
        for name in &self.btest.functions {
            if lab_bits::find(name).is_none() {
                return Err(format!("Unknown puzzle '{}' in btest.functions", name));
            }
        }
        Ok(())
    }
}

impl ConfigOverrides {
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse config: {}", e))
    }
}
