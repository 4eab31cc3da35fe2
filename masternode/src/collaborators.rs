//! Services the sync coordinator consumes but does not own
//!
//! The roster directory, spork controller, local masternode activator and
//! transaction filter builder live elsewhere in the node. The coordinator
//! only sees them through these traits.

use fdr_core::{Clock, Hash256, SharedChain};
use fdr_network::{Peer, PeerManager};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Network-wide feature flags consulted during sync
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SporkId {
    /// Mandatory masternode payment validation
    MasternodePaymentEnforcement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MasternodeTier {
    Tier1,
    Tier2,
    Tier3,
}

/// One entry of the gossip-replicated masternode roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasternodeEntry {
    /// Collateral outpoint hash
    pub outpoint: Hash256,
    pub tier: MasternodeTier,
    pub enabled: bool,
    pub protocol_version: u32,
}

pub trait MasternodeDirectory: Send + Sync {
    fn enabled_count(&self) -> usize;

    fn full_roster(&self) -> Vec<MasternodeEntry>;

    /// Ask `peer` for a roster update. Returns false when the directory
    /// declines, e.g. because this peer was asked too recently.
    fn request_update(&self, peer: &Peer) -> bool;

    /// Ask `peer` for payment winners. Same contract as `request_update`.
    fn request_winners(&self, peer: &Peer) -> bool;
}

pub trait SporkController: Send + Sync {
    fn is_active(&self, spork: SporkId) -> bool;
}

/// The local masternode, if this node runs one
pub trait ActiveMasternode: Send + Sync {
    fn try_activate(&self);
}

pub trait TxFilterBuilder: Send + Sync {
    fn build_once(&self);
}

/// Everything the coordinator talks to
#[derive(Clone)]
pub struct Collaborators {
    pub chain: SharedChain,
    pub peers: PeerManager,
    pub directory: Arc<dyn MasternodeDirectory>,
    pub sporks: Arc<dyn SporkController>,
    pub active_masternode: Arc<dyn ActiveMasternode>,
    pub tx_filter: Arc<dyn TxFilterBuilder>,
    pub clock: Arc<dyn Clock>,
}
