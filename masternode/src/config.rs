//! Masternode sync configuration
//!
//! Loaded from an optional TOML file. Every field has a default, so an
//! empty file (or no file at all) yields the network defaults:
//!
//! ```toml
//! network = "testnet"
//! sync_threshold = 2
//! sync_timeout_secs = 5
//! failure_cooldown_secs = 10
//! ```

use crate::error::SyncConfigError;
use fdr_core::{ChainParams, NetworkType};
use fdr_network::MIN_MASTERNODE_PAYMENTS_PROTO;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SyncConfig {
    pub network: NetworkType,

    /// Requests per phase before a phase may complete, and the cap on
    /// counted sightings per gossip object
    pub sync_threshold: u32,

    /// Scheduler period and liveness window, in seconds
    pub sync_timeout_secs: i64,

    /// Wait after a hard failure before starting over
    pub failure_cooldown_secs: i64,

    /// Gap between freshness checks that means the host was asleep
    pub sleep_detect_secs: i64,

    /// Maximum age of the chain tip for the chain to count as fresh
    pub max_tip_age_secs: i64,

    /// A timed-out roster phase is a failure only above this many
    /// enabled masternodes
    pub failure_roster_cutoff: usize,

    /// Requests sent during the auxiliary data phase
    pub auxiliary_attempts: u32,

    /// Minimum peer protocol for roster and winner exchanges
    pub min_payments_protocol: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            network: NetworkType::Mainnet,
            sync_threshold: 2,
            sync_timeout_secs: 5,
            failure_cooldown_secs: 10,
            sleep_detect_secs: 60 * 60,
            max_tip_age_secs: 60 * 60,
            failure_roster_cutoff: 6,
            auxiliary_attempts: 2,
            min_payments_protocol: MIN_MASTERNODE_PAYMENTS_PROTO,
        }
    }
}

impl SyncConfig {
    /// Default configuration for a network
    pub fn for_network(network: NetworkType) -> Self {
        Self {
            network,
            ..Self::default()
        }
    }

    /// Load configuration from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, SyncConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string
    pub fn parse(content: &str) -> Result<Self, SyncConfigError> {
        let config: SyncConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SyncConfigError> {
        if self.sync_threshold == 0 || self.sync_threshold > u8::MAX as u32 {
            return Err(SyncConfigError::InvalidValue {
                field: "sync_threshold",
                message: format!("must be between 1 and 255, got {}", self.sync_threshold),
            });
        }

        let windows = [
            ("sync_timeout_secs", self.sync_timeout_secs),
            ("sleep_detect_secs", self.sleep_detect_secs),
            ("max_tip_age_secs", self.max_tip_age_secs),
        ];
        for (field, value) in windows {
            if value <= 0 {
                return Err(SyncConfigError::InvalidValue {
                    field,
                    message: format!("must be positive, got {}", value),
                });
            }
        }

        if self.failure_cooldown_secs < 0 {
            return Err(SyncConfigError::InvalidValue {
                field: "failure_cooldown_secs",
                message: format!("must not be negative, got {}", self.failure_cooldown_secs),
            });
        }

        Ok(())
    }

    /// Read-only chain parameters for the configured network
    pub fn chain_params(&self) -> ChainParams {
        ChainParams::for_network(self.network)
    }
}
