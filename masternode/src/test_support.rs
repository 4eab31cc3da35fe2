//! In-memory collaborators shared by unit and integration tests
#![allow(dead_code)]

use fdr_core::{ChainTip, Clock, Hash256, ManualClock, NetworkType, SharedChain};
use fdr_masternode::{
    ActiveMasternode, Collaborators, MasternodeDirectory, MasternodeEntry, MasternodeSync,
    MasternodeTier, SporkController, SporkId, SyncConfig, TxFilterBuilder,
};
use fdr_network::{NetworkMessage, Peer, PeerManager, PeerOutbox, PROTOCOL_VERSION};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const NOW: i64 = 1_700_000_000;

pub fn entry(n: u8, tier: MasternodeTier, enabled: bool) -> MasternodeEntry {
    MasternodeEntry {
        outpoint: Hash256::digest(&[n]),
        tier,
        enabled,
        protocol_version: PROTOCOL_VERSION,
    }
}

/// Roster directory that records requests and answers with canned counts
#[derive(Default)]
pub struct MockDirectory {
    pub enabled: AtomicUsize,
    pub roster: Mutex<Vec<MasternodeEntry>>,
    pub decline: AtomicBool,
    pub update_requests: AtomicUsize,
    pub winner_requests: AtomicUsize,
}

impl MockDirectory {
    pub fn set_enabled(&self, count: usize) {
        self.enabled.store(count, Ordering::SeqCst);
    }

    pub fn set_roster(&self, roster: Vec<MasternodeEntry>) {
        self.set_enabled(roster.iter().filter(|e| e.enabled).count());
        *self.roster.lock().unwrap() = roster;
    }

    pub fn set_decline(&self, decline: bool) {
        self.decline.store(decline, Ordering::SeqCst);
    }

    pub fn updates(&self) -> usize {
        self.update_requests.load(Ordering::SeqCst)
    }

    pub fn winners(&self) -> usize {
        self.winner_requests.load(Ordering::SeqCst)
    }
}

impl MasternodeDirectory for MockDirectory {
    fn enabled_count(&self) -> usize {
        self.enabled.load(Ordering::SeqCst)
    }

    fn full_roster(&self) -> Vec<MasternodeEntry> {
        self.roster.lock().unwrap().clone()
    }

    fn request_update(&self, peer: &Peer) -> bool {
        if self.decline.load(Ordering::SeqCst) {
            return false;
        }
        self.update_requests.fetch_add(1, Ordering::SeqCst);
        peer.push_message(NetworkMessage::MasternodeListRequest { outpoint: None });
        true
    }

    fn request_winners(&self, peer: &Peer) -> bool {
        if self.decline.load(Ordering::SeqCst) {
            return false;
        }
        self.winner_requests.fetch_add(1, Ordering::SeqCst);
        peer.push_message(NetworkMessage::WinnersRequest {
            count: self.enabled_count() as i32,
        });
        true
    }
}

#[derive(Default)]
pub struct MockSporks {
    pub enforcement: AtomicBool,
}

impl MockSporks {
    pub fn enforce(&self, on: bool) {
        self.enforcement.store(on, Ordering::SeqCst);
    }
}

impl SporkController for MockSporks {
    fn is_active(&self, spork: SporkId) -> bool {
        match spork {
            SporkId::MasternodePaymentEnforcement => self.enforcement.load(Ordering::SeqCst),
        }
    }
}

#[derive(Default)]
pub struct MockActivator {
    pub attempts: AtomicUsize,
}

impl MockActivator {
    pub fn activations(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl ActiveMasternode for MockActivator {
    fn try_activate(&self) {
        self.attempts.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct MockFilter {
    pub built: AtomicUsize,
}

impl MockFilter {
    pub fn builds(&self) -> usize {
        self.built.load(Ordering::SeqCst)
    }
}

impl TxFilterBuilder for MockFilter {
    fn build_once(&self) {
        self.built.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct Fixture {
    pub network: NetworkType,
    pub clock: ManualClock,
    pub chain: SharedChain,
    pub peers: PeerManager,
    pub directory: Arc<MockDirectory>,
    pub sporks: Arc<MockSporks>,
    pub activator: Arc<MockActivator>,
    pub tx_filter: Arc<MockFilter>,
}

impl Fixture {
    /// Collaborators with a chain tip at the current time
    pub async fn new(network: NetworkType) -> Self {
        let fx = Self {
            network,
            clock: ManualClock::new(NOW),
            chain: SharedChain::new(),
            peers: PeerManager::new(),
            directory: Arc::new(MockDirectory::default()),
            sporks: Arc::new(MockSporks::default()),
            activator: Arc::new(MockActivator::default()),
            tx_filter: Arc::new(MockFilter::default()),
        };
        fx.set_tip_age(0).await;
        fx
    }

    /// Move the chain tip so it is `age` seconds old
    pub async fn set_tip_age(&self, age: i64) {
        self.chain
            .set_tip(ChainTip {
                height: 100,
                hash: Hash256::digest(b"tip"),
                time: self.clock.now() - age,
            })
            .await;
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            chain: self.chain.clone(),
            peers: self.peers.clone(),
            directory: self.directory.clone(),
            sporks: self.sporks.clone(),
            active_masternode: self.activator.clone(),
            tx_filter: self.tx_filter.clone(),
            clock: Arc::new(self.clock.clone()),
        }
    }

    pub fn coordinator(&self) -> MasternodeSync {
        MasternodeSync::new(SyncConfig::for_network(self.network), self.collaborators())
    }

    pub async fn add_peer(&self, n: u8, version: u32) -> (Arc<Peer>, PeerOutbox) {
        let addr: SocketAddr = format!("10.0.0.{}:12474", n).parse().unwrap();
        let (peer, outbox) = Peer::new(addr, version);
        let peer = Arc::new(peer);
        self.peers.add_connected_peer(peer.clone()).await;
        (peer, outbox)
    }
}
