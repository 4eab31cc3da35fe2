#![allow(dead_code)]

#[path = "../../src/test_support.rs"]
mod support;

pub use support::*;

use fdr_core::NetworkType;
use fdr_network::{NetworkMessage, Peer, PeerOutbox, PROTOCOL_VERSION};
use std::ops::Deref;
use std::sync::Arc;

/// A node under test holding its peers' outboxes
pub struct TestNode {
    fixture: Fixture,
    outboxes: Vec<(Arc<Peer>, PeerOutbox)>,
}

impl TestNode {
    pub async fn new(network: NetworkType, peer_count: u8) -> Self {
        Self::with_peer_version(network, peer_count, PROTOCOL_VERSION).await
    }

    pub async fn with_peer_version(network: NetworkType, peer_count: u8, version: u32) -> Self {
        fdr_masternode::logging::init();

        let fixture = Fixture::new(network).await;
        let mut outboxes = Vec::new();
        for n in 1..=peer_count {
            outboxes.push(fixture.add_peer(n, version).await);
        }
        Self { fixture, outboxes }
    }

    /// Drain everything queued for peer `index`
    pub fn drain(&mut self, index: usize) -> Vec<NetworkMessage> {
        let mut messages = Vec::new();
        while let Ok(message) = self.outboxes[index].1.try_recv() {
            messages.push(message);
        }
        messages
    }

    pub fn peer(&self, index: usize) -> Arc<Peer> {
        self.outboxes[index].0.clone()
    }
}

impl Deref for TestNode {
    type Target = Fixture;

    fn deref(&self) -> &Fixture {
        &self.fixture
    }
}
