//! Masternode synchronization coordinator
//!
//! Brings a freshly connected node's view of sporks, the masternode roster,
//! payment winners and auxiliary data into agreement with its peers before
//! the node trusts its masternode state.
//!
//! The coordinator is driven from outside: a scheduler calls [`MasternodeSync::tick`]
//! every `sync_timeout_secs`, and inbound gossip/status messages are fed in
//! through the notification methods. Both paths need `&mut self`, so the
//! owner keeps the coordinator behind one exclusive lock.

use crate::collaborators::{Collaborators, SporkId};
use crate::config::SyncConfig;
use crate::freshness::FreshnessMonitor;
use crate::phase::SyncPhase;
use crate::seen::SeenTracker;
use fdr_core::Hash256;
use fdr_network::{NetworkMessage, Peer, RequestKind};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Running aggregate of peer status reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportTally {
    pub sum: u64,
    pub count: u32,
}

impl ReportTally {
    fn add(&mut self, items: u64) {
        self.sum += items;
        self.count += 1;
    }

    /// Mean reported item count, `None` before the first report
    pub fn average(&self) -> Option<u64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as u64)
        }
    }
}

/// Whether the dispatcher should look at the next peer or end the tick
enum PeerStep {
    Next,
    Done,
}

pub struct MasternodeSync {
    config: SyncConfig,
    ctx: Collaborators,

    phase: SyncPhase,
    phase_attempt: u32,
    phase_started_at: i64,

    last_list_update_at: i64,
    last_winner_update_at: i64,
    list_reports: ReportTally,
    winner_reports: ReportTally,

    failure_at: i64,
    failure_count: u32,

    seen_list: SeenTracker,
    seen_winners: SeenTracker,

    freshness: FreshnessMonitor,
    tx_filter_built: bool,
}

impl MasternodeSync {
    pub fn new(config: SyncConfig, ctx: Collaborators) -> Self {
        let now = ctx.clock.now();
        let threshold = config.sync_threshold.min(u8::MAX as u32) as u8;
        Self {
            freshness: FreshnessMonitor::new(now, config.sleep_detect_secs, config.max_tip_age_secs),
            seen_list: SeenTracker::new(threshold),
            seen_winners: SeenTracker::new(threshold),
            phase: SyncPhase::Initial,
            phase_attempt: 0,
            phase_started_at: now,
            last_list_update_at: 0,
            last_winner_update_at: 0,
            list_reports: ReportTally::default(),
            winner_reports: ReportTally::default(),
            failure_at: 0,
            failure_count: 0,
            tx_filter_built: false,
            config,
            ctx,
        }
    }

    fn now(&self) -> i64 {
        self.ctx.clock.now()
    }

    /// Start over from `Initial`, forgetting all progress and asking every
    /// peer again from scratch
    pub fn reset(&mut self) {
        info!(phase = %self.phase, "resetting masternode sync");

        self.phase = SyncPhase::Initial;
        self.phase_attempt = 0;
        self.phase_started_at = self.now();
        self.last_list_update_at = 0;
        self.last_winner_update_at = 0;
        self.list_reports = ReportTally::default();
        self.winner_reports = ReportTally::default();
        self.failure_at = 0;
        self.failure_count = 0;
        self.seen_list.clear();
        self.seen_winners.clear();

        // Busy peer list is fine: leaving Initial clears the tokens again
        if !self.ctx.peers.try_clear_fulfilled(&RequestKind::ALL) {
            debug!("peer list busy, request tokens will be cleared on next advance");
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    pub fn phase_attempt(&self) -> u32 {
        self.phase_attempt
    }

    pub fn phase_started_at(&self) -> i64 {
        self.phase_started_at
    }

    pub fn last_list_update_at(&self) -> i64 {
        self.last_list_update_at
    }

    pub fn last_winner_update_at(&self) -> i64 {
        self.last_winner_update_at
    }

    pub fn list_reports(&self) -> ReportTally {
        self.list_reports
    }

    pub fn winner_reports(&self) -> ReportTally {
        self.winner_reports
    }

    pub fn failure_at(&self) -> i64 {
        self.failure_at
    }

    pub fn failure_count(&self) -> u32 {
        self.failure_count
    }

    pub fn is_synced(&self) -> bool {
        self.phase == SyncPhase::Finished
    }

    pub fn is_failed(&self) -> bool {
        self.phase == SyncPhase::Failed
    }

    /// Roster phase is behind us
    pub fn is_masternode_list_synced(&self) -> bool {
        self.phase.is_past(SyncPhase::MasternodeList)
    }

    /// Winners phase is behind us
    pub fn is_winners_synced(&self) -> bool {
        self.phase.is_past(SyncPhase::MasternodeWinners)
    }

    pub fn status_text(&self) -> &'static str {
        self.phase.status_text()
    }

    pub(crate) fn collaborators(&self) -> &Collaborators {
        &self.ctx
    }

    pub(crate) fn blockchain_latched(&self) -> bool {
        self.freshness.is_latched()
    }

    /// Is the local chain tip recent enough to trust? Resets the whole sync
    /// when the host appears to have been asleep since the last check.
    pub fn is_blockchain_synced(&mut self) -> bool {
        let now = self.now();
        if self.freshness.detect_sleep(now) {
            warn!("⏰ no freshness check for over {}s, host was asleep", self.config.sleep_detect_secs);
            self.reset();
        }
        self.freshness.evaluate(now, &self.ctx.chain)
    }

    // ------------------------------------------------------------------
    // Phase transitions
    // ------------------------------------------------------------------

    /// Move to the next phase unconditionally
    pub fn advance_phase(&mut self) {
        let peers = self.ctx.peers.clone();
        let guard = peers.try_acquire();
        match guard {
            Some(list) => self.advance_with(&list),
            None => self.advance_with(&[]),
        };
    }

    fn advance_with(&mut self, peers: &[Arc<Peer>]) {
        let next = self.phase.next();
        self.enter(next, peers);
    }

    fn enter(&mut self, next: SyncPhase, peers: &[Arc<Peer>]) {
        let previous = self.phase;

        for peer in peers {
            for kind in RequestKind::ALL {
                peer.clear_fulfilled_request(kind);
            }
        }

        self.phase = next;
        self.phase_attempt = 0;
        self.phase_started_at = self.now();

        info!(from = %previous, to = %next, "📍 masternode sync phase transition");

        if next == SyncPhase::Finished {
            info!("✅ masternode sync has finished");
            if !self.tx_filter_built {
                self.ctx.tx_filter.build_once();
                self.tx_filter_built = true;
            }
        }
    }

    fn fail(&mut self, now: i64) {
        error!(
            phase = %self.phase,
            enabled = self.ctx.directory.enabled_count(),
            "❌ masternode sync has failed, will retry later"
        );
        self.phase = SyncPhase::Failed;
        self.phase_attempt = 0;
        self.phase_started_at = now;
        self.failure_at = now;
        self.failure_count += 1;
    }

    /// Advance out of a roster phase; leaving the winners phase also gives
    /// the local masternode a chance to activate
    fn complete_roster_phase(&mut self, peers: &[Arc<Peer>]) {
        let leaving_winners = self.phase == SyncPhase::MasternodeWinners;
        self.advance_with(peers);
        if leaving_winners {
            self.ctx.active_masternode.try_activate();
        }
    }

    // ------------------------------------------------------------------
    // Tick
    // ------------------------------------------------------------------

    /// One scheduler step. Sends at most one request and never blocks on
    /// the chain or peer locks.
    pub fn tick(&mut self) {
        let now = self.now();

        if self.phase == SyncPhase::Finished {
            // Nothing else polls freshness once synced; keep the sleep detector current
            self.freshness.touch(now);

            let enforced = self
                .ctx
                .sporks
                .is_active(SporkId::MasternodePaymentEnforcement);
            if enforced && self.ctx.directory.enabled_count() == 0 {
                warn!("masternode roster is empty after sync, starting over");
                self.reset();
            } else {
                return;
            }
        }

        if self.phase == SyncPhase::Failed {
            if now - self.failure_at >= self.config.failure_cooldown_secs {
                self.reset();
            } else {
                return;
            }
        }

        debug!(phase = %self.phase, attempt = self.phase_attempt, "masternode sync tick");

        if self.phase == SyncPhase::Initial {
            self.advance_phase();
        }

        // Roster and winner data are meaningless against a stale chain
        let wait_for_chain = !self.config.network.is_regtest()
            && !self.is_blockchain_synced()
            && self.phase.is_past(SyncPhase::Sporks);
        if wait_for_chain {
            debug!(phase = %self.phase, "waiting for blockchain sync");
            self.phase_started_at = now;
            return;
        }

        let peer_list = self.ctx.peers.clone();
        let Some(peers) = peer_list.try_acquire() else {
            debug!("peer list busy, skipping sync tick");
            return;
        };

        if self.config.network.is_regtest() {
            if let Some(peer) = peers.first() {
                self.regtest_step(peer, &peers);
            }
            return;
        }

        for peer in peers.iter() {
            let step = match self.phase {
                SyncPhase::Sporks => {
                    self.request_step(peer, &peers, self.config.sync_threshold)
                }
                SyncPhase::AuxiliaryData => {
                    self.request_step(peer, &peers, self.config.auxiliary_attempts)
                }
                SyncPhase::MasternodeList | SyncPhase::MasternodeWinners => {
                    if peer.version() < self.config.min_payments_protocol {
                        PeerStep::Next
                    } else {
                        self.roster_step(peer, &peers, now)
                    }
                }
                SyncPhase::Initial | SyncPhase::Finished | SyncPhase::Failed => PeerStep::Done,
            };

            if let PeerStep::Done = step {
                return;
            }
        }
    }

    /// Fixed request sequence for the regression-test network, one peer per tick
    fn regtest_step(&mut self, peer: &Arc<Peer>, peers: &[Arc<Peer>]) {
        match self.phase_attempt {
            0..=2 => {
                peer.push_message(NetworkMessage::GetSporks);
            }
            3..=4 => {
                self.ctx.directory.request_update(peer);
            }
            5 => {
                let count = self.ctx.directory.enabled_count();
                peer.push_message(NetworkMessage::WinnersRequest {
                    count: i32::try_from(count).unwrap_or(i32::MAX),
                });
            }
            _ => {
                self.enter(SyncPhase::Finished, peers);
                return;
            }
        }
        self.phase_attempt += 1;
    }

    /// Sporks and auxiliary data: ask `limit` distinct peers, then move on
    fn request_step(&mut self, peer: &Arc<Peer>, peers: &[Arc<Peer>], limit: u32) -> PeerStep {
        let Some(kind) = self.phase.request_kind() else {
            return PeerStep::Done;
        };

        if peer.has_fulfilled_request(kind) {
            return PeerStep::Next;
        }

        if self.phase_attempt >= limit {
            self.advance_with(peers);
            return PeerStep::Done;
        }

        peer.fulfilled_request(kind);
        let message = match kind {
            RequestKind::AuxiliaryData => NetworkMessage::GetAuxiliaryData,
            _ => NetworkMessage::GetSporks,
        };
        peer.push_message(message);
        self.phase_attempt += 1;
        debug!(peer = %peer.address(), request = kind.key(), attempt = self.phase_attempt, "sent sync request");
        PeerStep::Done
    }

    /// Roster and winners: keep asking peers until gossip stops arriving,
    /// or give up after the attempt/time budget
    fn roster_step(&mut self, peer: &Arc<Peer>, peers: &[Arc<Peer>], now: i64) -> PeerStep {
        let (kind, last_update) = match self.phase {
            SyncPhase::MasternodeList => (RequestKind::MasternodeList, self.last_list_update_at),
            SyncPhase::MasternodeWinners => {
                (RequestKind::MasternodeWinners, self.last_winner_update_at)
            }
            _ => return PeerStep::Done,
        };
        let threshold = self.config.sync_threshold;
        let timeout = self.config.sync_timeout_secs;

        debug!(
            phase = %self.phase,
            last_update,
            attempt = self.phase_attempt,
            elapsed = now - self.phase_started_at,
            "checking roster phase"
        );

        // Data arrived and has gone quiet: this phase is done
        if last_update > 0 && last_update < now - timeout && self.phase_attempt >= threshold {
            self.complete_roster_phase(peers);
            return PeerStep::Done;
        }

        if peer.has_fulfilled_request(kind) {
            return PeerStep::Next;
        }
        peer.fulfilled_request(kind);

        let out_of_budget = self.phase_attempt >= threshold * 3
            || now - self.phase_started_at > timeout * 5;
        if last_update == 0 && out_of_budget {
            let enforced = self
                .ctx
                .sporks
                .is_active(SporkId::MasternodePaymentEnforcement);
            let enabled = self.ctx.directory.enabled_count();

            if enforced && enabled > self.config.failure_roster_cutoff {
                self.fail(now);
            } else {
                info!(phase = %self.phase, enabled, "nothing received before timeout, moving on");
                self.complete_roster_phase(peers);
            }
            return PeerStep::Done;
        }

        if self.phase_attempt >= threshold * 3 {
            return PeerStep::Done;
        }

        let requested = match self.phase {
            SyncPhase::MasternodeList => self.ctx.directory.request_update(peer),
            _ => {
                let has_tip = self
                    .ctx
                    .chain
                    .try_acquire()
                    .map(|state| state.tip().is_some())
                    .unwrap_or(false);
                if !has_tip {
                    return PeerStep::Done;
                }
                self.ctx.directory.request_winners(peer)
            }
        };

        if !requested {
            return PeerStep::Next;
        }

        self.phase_attempt += 1;
        PeerStep::Done
    }

    // ------------------------------------------------------------------
    // Gossip notifications
    // ------------------------------------------------------------------

    /// A masternode broadcast was accepted
    pub fn added_masternode_list(&mut self, hash: Hash256) {
        if self.seen_list.record_sighting(hash).is_counted() {
            self.last_list_update_at = self.now();
        }
    }

    /// A masternode winner vote was accepted
    pub fn added_masternode_winner(&mut self, hash: Hash256) {
        if self.seen_winners.record_sighting(hash).is_counted() {
            self.last_winner_update_at = self.now();
        }
    }

    pub fn seen_list_count(&self, hash: &Hash256) -> u8 {
        self.seen_list.count(hash)
    }

    pub fn seen_winner_count(&self, hash: &Hash256) -> u8 {
        self.seen_winners.count(hash)
    }

    /// Fold a peer's sync-status-count into the current phase statistics.
    /// Reports for any other phase are dropped.
    pub fn handle_status_report(&mut self, item_id: i32, count: i32) {
        if self.phase == SyncPhase::Finished {
            return;
        }

        if SyncPhase::from_item_id(item_id) != Some(self.phase) {
            debug!(item_id, phase = %self.phase, "dropping status report for another phase");
            return;
        }

        let Ok(items) = u64::try_from(count) else {
            debug!(item_id, count, "dropping status report with negative count");
            return;
        };

        match self.phase {
            SyncPhase::MasternodeList => self.list_reports.add(items),
            SyncPhase::MasternodeWinners => self.winner_reports.add(items),
            _ => return,
        }

        debug!(item_id, count, "got inventory count");
    }

    /// Handle a decoded message from `peer`. Messages other than status
    /// reports belong to other subsystems and are ignored here.
    pub fn process_message(&mut self, peer: &Peer, message: &NetworkMessage) {
        match message {
            NetworkMessage::SyncStatusCount { item_id, count } => {
                debug!(peer = %peer.address(), item_id, count, "ssc");
                self.handle_status_report(*item_id, *count);
            }
            NetworkMessage::GetSporks
            | NetworkMessage::MasternodeListRequest { .. }
            | NetworkMessage::WinnersRequest { .. }
            | NetworkMessage::GetAuxiliaryData => {}
        }
    }

    /// Decode a raw frame from `peer` and handle it
    pub fn process_frame(&mut self, peer: &Peer, frame: &[u8]) -> crate::Result<()> {
        let magic = self.config.chain_params().message_start;
        let message = NetworkMessage::from_frame(magic, frame)?;
        self.process_message(peer, &message);
        Ok(())
    }
}
