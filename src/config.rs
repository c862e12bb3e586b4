// src/config.rs
//! Ledger configuration
//!
//! Defaults: difficulty 4, unbounded mining,
//! export to `blockchain.json` in the working directory.

use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Longest possible run of leading zeros in a hex SHA-256 digest
pub const MAX_DIFFICULTY: usize = 64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Leading '0' hex characters a mined hash must have
    pub difficulty: usize,

    /// Per-block attempt budget for the proof-of-work search (None = unbounded)
    pub max_mining_attempts: Option<u64>,

    /// Where `export` writes the ledger
    pub export_path: PathBuf,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            difficulty: 4,
            max_mining_attempts: None,
            export_path: PathBuf::from("blockchain.json"),
        }
    }
}

impl LedgerConfig {
    /// Defaults overridden by environment variables.
    ///
    /// - `CHAINSCRIPT_DIFFICULTY`
    /// - `CHAINSCRIPT_MAX_ATTEMPTS`
    /// - `CHAINSCRIPT_EXPORT_PATH`
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(value) = env::var("CHAINSCRIPT_DIFFICULTY") {
            config.difficulty = value.parse().map_err(|_| ConfigError::InvalidEnv {
                var: "CHAINSCRIPT_DIFFICULTY",
                value: value.clone(),
            })?;
        }

        if let Ok(value) = env::var("CHAINSCRIPT_MAX_ATTEMPTS") {
            let attempts = value.parse().map_err(|_| ConfigError::InvalidEnv {
                var: "CHAINSCRIPT_MAX_ATTEMPTS",
                value: value.clone(),
            })?;
            config.max_mining_attempts = Some(attempts);
        }

        if let Ok(value) = env::var("CHAINSCRIPT_EXPORT_PATH") {
            config.export_path = PathBuf::from(value);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file; missing keys keep their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.difficulty == 0 || self.difficulty > MAX_DIFFICULTY {
            return Err(ConfigError::InvalidDifficulty(self.difficulty));
        }
        if self.max_mining_attempts == Some(0) {
            return Err(ConfigError::ZeroMiningAttempts);
        }
        Ok(())
    }

    pub fn with_difficulty(mut self, difficulty: usize) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_max_mining_attempts(mut self, attempts: u64) -> Self {
        self.max_mining_attempts = Some(attempts);
        self
    }

    pub fn with_export_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.export_path = path.into();
        self
    }
}
