//! Masternode sync phases

use fdr_network::RequestKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sync assets in the order they are requested. `Failed` sits outside the
/// progression and is only left through a reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SyncPhase {
    Initial,
    Sporks,
    MasternodeList,
    MasternodeWinners,
    AuxiliaryData,
    Finished,
    Failed,
}

impl SyncPhase {
    /// Phase reached by an unconditional advance
    pub fn next(&self) -> SyncPhase {
        match self {
            SyncPhase::Initial | SyncPhase::Failed => SyncPhase::Sporks,
            SyncPhase::Sporks => SyncPhase::MasternodeList,
            SyncPhase::MasternodeList => SyncPhase::MasternodeWinners,
            SyncPhase::MasternodeWinners => SyncPhase::AuxiliaryData,
            SyncPhase::AuxiliaryData | SyncPhase::Finished => SyncPhase::Finished,
        }
    }

    /// Position in the progression; `None` for `Failed`
    pub fn rank(&self) -> Option<u8> {
        match self {
            SyncPhase::Initial => Some(0),
            SyncPhase::Sporks => Some(1),
            SyncPhase::MasternodeList => Some(2),
            SyncPhase::MasternodeWinners => Some(3),
            SyncPhase::AuxiliaryData => Some(4),
            SyncPhase::Finished => Some(5),
            SyncPhase::Failed => None,
        }
    }

    /// True if this phase comes after `other` in the progression
    pub fn is_past(&self, other: SyncPhase) -> bool {
        match (self.rank(), other.rank()) {
            (Some(a), Some(b)) => a > b,
            _ => false,
        }
    }

    /// Item id carried by sync-status-count messages
    pub fn item_id(&self) -> i32 {
        match self {
            SyncPhase::Initial => 0,
            SyncPhase::Sporks => 1,
            SyncPhase::MasternodeList => 2,
            SyncPhase::MasternodeWinners => 3,
            SyncPhase::AuxiliaryData => 4,
            SyncPhase::Failed => 998,
            SyncPhase::Finished => 999,
        }
    }

    pub fn from_item_id(item_id: i32) -> Option<SyncPhase> {
        match item_id {
            0 => Some(SyncPhase::Initial),
            1 => Some(SyncPhase::Sporks),
            2 => Some(SyncPhase::MasternodeList),
            3 => Some(SyncPhase::MasternodeWinners),
            4 => Some(SyncPhase::AuxiliaryData),
            998 => Some(SyncPhase::Failed),
            999 => Some(SyncPhase::Finished),
            _ => None,
        }
    }

    /// Per-peer token for the request sent during this phase
    pub fn request_kind(&self) -> Option<RequestKind> {
        match self {
            SyncPhase::Sporks => Some(RequestKind::Sporks),
            SyncPhase::MasternodeList => Some(RequestKind::MasternodeList),
            SyncPhase::MasternodeWinners => Some(RequestKind::MasternodeWinners),
            SyncPhase::AuxiliaryData => Some(RequestKind::AuxiliaryData),
            SyncPhase::Initial | SyncPhase::Finished | SyncPhase::Failed => None,
        }
    }

    pub fn status_text(&self) -> &'static str {
        match self {
            SyncPhase::Initial => "Synchronization pending...",
            SyncPhase::Sporks => "Synchronizing sporks...",
            SyncPhase::MasternodeList => "Synchronizing masternodes...",
            SyncPhase::MasternodeWinners => "Synchronizing masternode winners...",
            SyncPhase::AuxiliaryData => "Synchronizing auxiliary data...",
            SyncPhase::Failed => "Synchronization failed",
            SyncPhase::Finished => "Synchronization finished",
        }
    }
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncPhase::Initial => "initial",
            SyncPhase::Sporks => "sporks",
            SyncPhase::MasternodeList => "masternode-list",
            SyncPhase::MasternodeWinners => "masternode-winners",
            SyncPhase::AuxiliaryData => "auxiliary-data",
            SyncPhase::Finished => "finished",
            SyncPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}
