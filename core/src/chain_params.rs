//! Chain parameter table for FDReserve networks
//!
//! The table is static configuration: the node reads it, nothing here
//! is ever mutated at runtime.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    #[default]
    Mainnet,
    Testnet,
    /// Local regression-test network
    Regtest,
}

impl NetworkType {
    /// Network identifier as used in data directories and RPC replies
    pub fn id(&self) -> &'static str {
        match self {
            NetworkType::Mainnet => "main",
            NetworkType::Testnet => "test",
            NetworkType::Regtest => "regtest",
        }
    }

    pub fn is_regtest(&self) -> bool {
        matches!(self, NetworkType::Regtest)
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for NetworkType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "main" | "mainnet" => Ok(NetworkType::Mainnet),
            "test" | "testnet" => Ok(NetworkType::Testnet),
            "regtest" => Ok(NetworkType::Regtest),
            other => Err(format!("Unknown network: {}", other)),
        }
    }
}

/// Consensus and networking constants for one network
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChainParams {
    pub network: NetworkType,
    /// Message start bytes prefixed to every P2P frame
    pub message_start: [u8; 4],
    pub default_port: u16,
    /// Target block spacing in seconds
    pub target_spacing: u32,
    /// Coinbase/coinstake maturity in blocks
    pub maturity: u32,
    /// Allowed drift between announced and counted masternodes
    pub masternode_count_drift: u32,
    /// First block paying masternodes
    pub start_masternode_payments_block: u64,
    pub last_pow_block: u64,
}

impl ChainParams {
    pub fn mainnet() -> Self {
        ChainParams {
            network: NetworkType::Mainnet,
            message_start: [0xa5, 0xc2, 0xd1, 0x74],
            default_port: 12474,
            target_spacing: 60,
            maturity: 40,
            masternode_count_drift: 3,
            start_masternode_payments_block: 100,
            last_pow_block: 200,
        }
    }

    pub fn testnet() -> Self {
        ChainParams {
            network: NetworkType::Testnet,
            message_start: [0x17, 0x27, 0xa6, 0xbc],
            default_port: 42322,
            maturity: 15,
            masternode_count_drift: 4,
            ..Self::mainnet()
        }
    }

    pub fn regtest() -> Self {
        ChainParams {
            network: NetworkType::Regtest,
            message_start: [0xa1, 0xcf, 0x7e, 0xac],
            default_port: 52322,
            ..Self::testnet()
        }
    }

    /// Get parameters for a specific network
    pub fn for_network(network: NetworkType) -> Self {
        match network {
            NetworkType::Mainnet => Self::mainnet(),
            NetworkType::Testnet => Self::testnet(),
            NetworkType::Regtest => Self::regtest(),
        }
    }
}
