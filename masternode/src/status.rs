//! Sync status snapshots for the RPC and wallet layers
use crate::collaborators::MasternodeTier;
use crate::phase::SyncPhase;
use crate::sync::MasternodeSync;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point-in-time view of the coordinator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyncStatusReport {
    pub phase: SyncPhase,
    /// Item id as carried on the wire
    pub item_id: i32,
    pub status: String,
    pub attempt: u32,
    /// Seconds spent in the current phase
    pub phase_elapsed_secs: i64,
    pub last_list_update: Option<DateTime<Utc>>,
    pub last_winner_update: Option<DateTime<Utc>>,
    pub failure_count: u32,
    pub last_failure: Option<DateTime<Utc>>,
    /// Mean roster size reported by peers
    pub average_list_report: Option<u64>,
    /// Mean winner count reported by peers
    pub average_winner_report: Option<u64>,
    pub blockchain_synced: bool,
}

fn timestamp(secs: i64) -> Option<DateTime<Utc>> {
    if secs == 0 {
        None
    } else {
        DateTime::from_timestamp(secs, 0)
    }
}

impl SyncStatusReport {
    /// Snapshot the coordinator. Uses the cached freshness answer so taking
    /// a report never triggers a sleep reset.
    pub fn capture(sync: &MasternodeSync) -> Self {
        let now = sync.collaborators().clock.now();
        let phase = sync.phase();

        Self {
            phase,
            item_id: phase.item_id(),
            status: phase.status_text().to_string(),
            attempt: sync.phase_attempt(),
            phase_elapsed_secs: (now - sync.phase_started_at()).max(0),
            last_list_update: timestamp(sync.last_list_update_at()),
            last_winner_update: timestamp(sync.last_winner_update_at()),
            failure_count: sync.failure_count(),
            last_failure: timestamp(sync.failure_at()),
            average_list_report: sync.list_reports().average(),
            average_winner_report: sync.winner_reports().average(),
            blockchain_synced: sync.blockchain_latched(),
        }
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Enabled masternodes per collateral tier
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RosterSummary {
    pub tier1: usize,
    pub tier2: usize,
    pub tier3: usize,
}

impl RosterSummary {
    /// Count the enabled roster. `None` until both the chain and the
    /// masternode sync are complete, since partial counts are misleading.
    pub fn capture(sync: &MasternodeSync) -> Option<Self> {
        if !sync.blockchain_latched() || !sync.is_synced() {
            return None;
        }

        let mut summary = RosterSummary::default();
        for entry in sync.collaborators().directory.full_roster() {
            if !entry.enabled {
                continue;
            }
            match entry.tier {
                MasternodeTier::Tier1 => summary.tier1 += 1,
                MasternodeTier::Tier2 => summary.tier2 += 1,
                MasternodeTier::Tier3 => summary.tier3 += 1,
            }
        }
        Some(summary)
    }

    pub fn total(&self) -> usize {
        self.tier1 + self.tier2 + self.tier3
    }
}
