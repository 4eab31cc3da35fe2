//! Connected peer as seen by the sync layer
//!
//! Transport owns the socket; the sync layer only needs the negotiated
//! protocol version, the "already asked" tokens and an outbox to push
//! fire-and-forget messages into.

use crate::protocol::{NetworkMessage, RequestKind};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU8, Ordering};
use tokio::sync::mpsc;
use tracing::debug;

pub type PeerOutbox = mpsc::UnboundedReceiver<NetworkMessage>;

#[derive(Debug)]
pub struct Peer {
    address: SocketAddr,
    version: u32,
    fulfilled: AtomicU8,
    outbox: mpsc::UnboundedSender<NetworkMessage>,
}

impl Peer {
    /// Create a peer handle and the receiving end of its outbox
    pub fn new(address: SocketAddr, version: u32) -> (Self, PeerOutbox) {
        let (tx, rx) = mpsc::unbounded_channel();
        let peer = Peer {
            address,
            version,
            fulfilled: AtomicU8::new(0),
            outbox: tx,
        };
        (peer, rx)
    }

    pub fn address(&self) -> SocketAddr {
        self.address
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn has_fulfilled_request(&self, kind: RequestKind) -> bool {
        self.fulfilled.load(Ordering::SeqCst) & kind.bit() != 0
    }

    pub fn fulfilled_request(&self, kind: RequestKind) {
        self.fulfilled.fetch_or(kind.bit(), Ordering::SeqCst);
    }

    pub fn clear_fulfilled_request(&self, kind: RequestKind) {
        self.fulfilled.fetch_and(!kind.bit(), Ordering::SeqCst);
    }

    /// Queue a message for this peer. Returns false if the connection is gone.
    pub fn push_message(&self, message: NetworkMessage) -> bool {
        let command = message.command();
        match self.outbox.send(message) {
            Ok(()) => {
                debug!(peer = %self.address, command, "queued message");
                true
            }
            Err(_) => {
                debug!(peer = %self.address, command, "peer outbox closed, dropping message");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr() -> SocketAddr {
        "127.0.0.1:12474".parse().unwrap()
    }

    #[test]
    fn test_fulfilled_flags_are_independent() {
        let (peer, _rx) = Peer::new(addr(), 70920);

        peer.fulfilled_request(RequestKind::Sporks);
        peer.fulfilled_request(RequestKind::MasternodeWinners);

        assert!(peer.has_fulfilled_request(RequestKind::Sporks));
        assert!(!peer.has_fulfilled_request(RequestKind::MasternodeList));
        assert!(peer.has_fulfilled_request(RequestKind::MasternodeWinners));

        peer.clear_fulfilled_request(RequestKind::Sporks);
        assert!(!peer.has_fulfilled_request(RequestKind::Sporks));
        assert!(peer.has_fulfilled_request(RequestKind::MasternodeWinners));
    }

    #[test]
    fn test_push_message_reaches_outbox() {
        let (peer, mut rx) = Peer::new(addr(), 70920);

        assert!(peer.push_message(NetworkMessage::GetSporks));
        assert_eq!(rx.try_recv().unwrap(), NetworkMessage::GetSporks);
    }

    #[test]
    fn test_push_message_after_disconnect() {
        let (peer, rx) = Peer::new(addr(), 70920);
        drop(rx);

        assert!(!peer.push_message(NetworkMessage::GetAuxiliaryData));
    }
}
