//! Periodic driver for the sync coordinator
use crate::status::{RosterSummary, SyncStatusReport};
use crate::sync::MasternodeSync;
use fdr_network::{NetworkMessage, Peer};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

/// Cloneable access to a running coordinator for message handlers and RPC
#[derive(Clone)]
pub struct SyncHandle {
    sync: Arc<Mutex<MasternodeSync>>,
}

impl SyncHandle {
    pub fn new(sync: MasternodeSync) -> Self {
        Self {
            sync: Arc::new(Mutex::new(sync)),
        }
    }

    pub async fn tick(&self) {
        self.sync.lock().await.tick();
    }

    pub async fn process_message(&self, peer: &Peer, message: &NetworkMessage) {
        self.sync.lock().await.process_message(peer, message);
    }

    pub async fn process_frame(&self, peer: &Peer, frame: &[u8]) -> crate::Result<()> {
        self.sync.lock().await.process_frame(peer, frame)
    }

    pub async fn added_masternode_list(&self, hash: fdr_core::Hash256) {
        self.sync.lock().await.added_masternode_list(hash);
    }

    pub async fn added_masternode_winner(&self, hash: fdr_core::Hash256) {
        self.sync.lock().await.added_masternode_winner(hash);
    }

    pub async fn reset(&self) {
        self.sync.lock().await.reset();
    }

    pub async fn is_synced(&self) -> bool {
        self.sync.lock().await.is_synced()
    }

    pub async fn is_blockchain_synced(&self) -> bool {
        self.sync.lock().await.is_blockchain_synced()
    }

    pub async fn status(&self) -> SyncStatusReport {
        SyncStatusReport::capture(&*self.sync.lock().await)
    }

    pub async fn roster_summary(&self) -> Option<RosterSummary> {
        RosterSummary::capture(&*self.sync.lock().await)
    }
}

/// Background task calling `tick()` every `sync_timeout_secs`
pub struct SyncService {
    handle: SyncHandle,
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SyncService {
    pub fn spawn(sync: MasternodeSync) -> Self {
        let period = Duration::from_secs(sync.config().sync_timeout_secs.max(1) as u64);
        let handle = SyncHandle::new(sync);
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let driver = handle.clone();
        let task = tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            info!(period_secs = period.as_secs(), "🔄 masternode sync service started");

            loop {
                tokio::select! {
                    _ = interval.tick() => driver.tick().await,
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                }
            }

            debug!("masternode sync service stopped");
        });

        Self {
            handle,
            shutdown_tx,
            task,
        }
    }

    pub fn handle(&self) -> SyncHandle {
        self.handle.clone()
    }

    /// Stop the tick task and wait for it to exit
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        let _ = self.task.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::SyncPhase;
    use crate::test_support::Fixture;
    use fdr_core::NetworkType;

    #[tokio::test(start_paused = true)]
    async fn test_service_ticks_and_shuts_down() {
        let fx = Fixture::new(NetworkType::Mainnet).await;
        let (_peer, mut outbox) = fx.add_peer(1, 70920).await;
        let service = SyncService::spawn(fx.coordinator());
        let handle = service.handle();

        // First interval tick fires immediately
        time::sleep(Duration::from_millis(10)).await;
        assert_eq!(handle.status().await.phase, SyncPhase::Sporks);
        assert_eq!(outbox.try_recv().unwrap(), NetworkMessage::GetSporks);

        service.shutdown().await;
        assert_eq!(handle.status().await.phase, SyncPhase::Sporks);
    }

    #[tokio::test]
    async fn test_handle_reset() {
        let fx = Fixture::new(NetworkType::Mainnet).await;
        let handle = SyncHandle::new(fx.coordinator());
        handle.tick().await;
        assert_eq!(handle.status().await.phase, SyncPhase::Sporks);

        handle.reset().await;
        assert_eq!(handle.status().await.phase, SyncPhase::Initial);
        assert!(!handle.is_synced().await);
    }
}
