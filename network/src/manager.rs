//! Connected peer list
use crate::peer::Peer;
use crate::protocol::RequestKind;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Clone, Default)]
pub struct PeerManager {
    peers: Arc<RwLock<Vec<Arc<Peer>>>>,
}

impl PeerManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-blocking read access to the peer list. `None` while a writer
    /// (connect/disconnect) holds the lock.
    pub fn try_acquire(&self) -> Option<RwLockReadGuard<'_, Vec<Arc<Peer>>>> {
        self.peers.try_read().ok()
    }

    /// Exclusive access to the list, held while connecting or dropping peers
    pub async fn write(&self) -> RwLockWriteGuard<'_, Vec<Arc<Peer>>> {
        self.peers.write().await
    }

    /// Register a connected peer, replacing any previous entry for its address
    pub async fn add_connected_peer(&self, peer: Arc<Peer>) {
        let mut peers = self.write().await;
        peers.retain(|p| p.address() != peer.address());
        peers.push(peer);
    }

    pub async fn remove_peer(&self, address: SocketAddr) -> bool {
        let mut peers = self.write().await;
        let before = peers.len();
        peers.retain(|p| p.address() != address);
        peers.len() != before
    }

    pub async fn peer_count(&self) -> usize {
        self.peers.read().await.len()
    }

    /// Clear the given request tokens on every peer. Returns false if the
    /// list was busy and nothing was cleared.
    pub fn try_clear_fulfilled(&self, kinds: &[RequestKind]) -> bool {
        let Some(peers) = self.try_acquire() else {
            return false;
        };
        for peer in peers.iter() {
            for kind in kinds {
                peer.clear_fulfilled_request(*kind);
            }
        }
        true
    }
}
