//! FDReserve Masternode Sync
//!
//! Coordinates the staged download of sporks, the masternode roster,
//! payment winners and auxiliary data from peers, and reports when the
//! node's masternode view can be trusted.

// test_support.rs refers to this crate by name
extern crate self as fdr_masternode;

pub mod collaborators;
pub mod config;
pub mod error;
pub mod freshness;
pub mod logging;
pub mod phase;
pub mod seen;
pub mod service;
pub mod status;
pub mod sync;

#[cfg(test)]
mod test_support;

pub use collaborators::{
    ActiveMasternode, Collaborators, MasternodeDirectory, MasternodeEntry, MasternodeTier,
    SporkController, SporkId, TxFilterBuilder,
};
pub use config::SyncConfig;
pub use error::{Result, SyncConfigError, SyncError};
pub use freshness::FreshnessMonitor;
pub use phase::SyncPhase;
pub use seen::{SeenTracker, Sighting};
pub use service::{SyncHandle, SyncService};
pub use status::{RosterSummary, SyncStatusReport};
pub use sync::{MasternodeSync, ReportTally};

/// Masternode sync module version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
