//! # Runtime Configuration
//!
//! Unified configuration for the ledger and the runtime around it.
//!
//! ## Sources
//!
//! 1. JSON file named by `HP_CONFIG` (optional)
//! 2. Environment overrides: `HP_ADMINS` (comma-separated hex addresses),
//!    `HP_QUEUE_CAPACITY`, `HP_EVENT_CAPACITY`
//!
//! ## Security Requirements
//!
//! - At least one admin address MUST be configured in production

use std::env;
use std::path::{Path, PathBuf};

use housing_ledger::config::LedgerConfig;
use housing_ledger::domain::Address;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::genesis::GenesisConfig;

/// Complete runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Addresses holding the admin role, hex encoded.
    pub admins: Vec<String>,
    /// Ledger policies.
    pub ledger: LedgerConfig,
    /// Bound of the sequencer's command queue.
    pub queue_capacity: usize,
    /// Buffer of the event broadcast channel.
    pub event_capacity: usize,
    /// Projects and units seeded at boot.
    pub genesis: GenesisConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            admins: Vec::new(),
            ledger: LedgerConfig::default(),
            queue_capacity: 1024,
            event_capacity: 256,
            genesis: GenesisConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Loads from `HP_CONFIG` (if set) and applies environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| env::var(key).ok())
    }

    /// Same as [`Self::load`] with an explicit variable source.
    pub fn load_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup("HP_CONFIG") {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(&lookup)?;
        Ok(config)
    }

    /// Reads a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&raw).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        info!(path = %path.display(), "Loaded runtime configuration");
        Ok(config)
    }

    fn apply_overrides<F>(&mut self, lookup: &F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(admins) = lookup("HP_ADMINS") {
            self.admins = admins
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            info!(count = self.admins.len(), "Loaded admin addresses from environment");
        }
        if let Some(value) = lookup("HP_QUEUE_CAPACITY") {
            self.queue_capacity = parse_capacity("HP_QUEUE_CAPACITY", &value)?;
        }
        if let Some(value) = lookup("HP_EVENT_CAPACITY") {
            self.event_capacity = parse_capacity("HP_EVENT_CAPACITY", &value)?;
        }
        Ok(())
    }

    /// Parsed admin addresses, in configured order.
    pub fn admin_addresses(&self) -> Result<Vec<Address>, ConfigError> {
        self.admins
            .iter()
            .map(|raw| {
                Address::from_hex(raw).map_err(|e| ConfigError::InvalidAdmin {
                    value: raw.clone(),
                    reason: e.to_string(),
                })
            })
            .collect()
    }

    /// Structural validation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queue_capacity == 0 {
            return Err(ConfigError::ZeroCapacity("queue_capacity"));
        }
        if self.event_capacity == 0 {
            return Err(ConfigError::ZeroCapacity("event_capacity"));
        }
        let admins = self.admin_addresses()?;
        if admins.contains(&Address::ZERO) {
            return Err(ConfigError::InvalidAdmin {
                value: Address::ZERO.to_hex(),
                reason: "zero address".to_string(),
            });
        }
        if admins.is_empty() {
            warn!("No admin addresses configured; admin operations will be rejected");
        }
        Ok(())
    }

    /// Validate configuration for production readiness.
    ///
    /// # Returns
    ///
    /// Returns `Err` if:
    /// - Structural validation fails
    /// - No admin address is configured
    pub fn validate_for_production(&self) -> Result<(), ConfigError> {
        self.validate()?;
        if self.admins.is_empty() {
            return Err(ConfigError::NoAdmins);
        }
        Ok(())
    }
}

fn parse_capacity(key: &'static str, value: &str) -> Result<usize, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber {
            key,
            value: value.to_string(),
        })
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No admin is configured.
    #[error("no admin addresses configured; set HP_ADMINS or `admins` in the config file")]
    NoAdmins,

    /// An admin entry is not a valid address.
    #[error("invalid admin address {value:?}: {reason}")]
    InvalidAdmin {
        /// The raw entry.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A capacity is zero.
    #[error("{0} must be greater than zero")]
    ZeroCapacity(&'static str),

    /// A numeric variable did not parse.
    #[error("{key} is not a number: {value:?}")]
    InvalidNumber {
        /// Variable name.
        key: &'static str,
        /// Raw value.
        value: String,
    },

    /// The config file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid JSON for this schema.
    #[error("failed to parse {path}: {reason}")]
    Parse {
        /// File path.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },
}
