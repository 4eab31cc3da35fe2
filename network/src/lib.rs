//! FDReserve Network Module
//!
//! Sync wire messages, per-peer request tokens and the connected peer list.
pub mod error;
pub mod manager;
pub mod peer;
pub mod protocol;

pub use error::CodecError;
pub use manager::PeerManager;
pub use peer::{Peer, PeerOutbox};
pub use protocol::{
    NetworkMessage, RequestKind, MIN_MASTERNODE_PAYMENTS_PROTO, PROTOCOL_VERSION,
};
