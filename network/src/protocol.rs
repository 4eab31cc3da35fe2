//! Network protocol for masternode synchronization
//!
//! Covers the sync-related messages exchanged with peers and their frame
//! encoding. Handshake and general transport live outside this crate.

use crate::error::CodecError;
use fdr_core::Hash256;
use serde::{Deserialize, Serialize};

/// Protocol version spoken by this node
pub const PROTOCOL_VERSION: u32 = 70920;

/// Oldest protocol version that understands masternode payment sync
pub const MIN_MASTERNODE_PAYMENTS_PROTO: u32 = 70920;

/// Upper bound for a single sync frame payload
pub const MAX_FRAME_SIZE: usize = 1024 * 1024;

/// Frame header: 4 message-start bytes followed by a big-endian u32 length
const HEADER_LEN: usize = 8;

/// Network message envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkMessage {
    /// Ask for all current network sporks
    GetSporks,
    /// Incremental masternode roster pull. `None` asks for the full list.
    MasternodeListRequest { outpoint: Option<Hash256> },
    /// Ask for payment winners, sized by the caller's enabled roster count
    WinnersRequest { count: i32 },
    /// Ask for auxiliary (FDR) data
    GetAuxiliaryData,
    /// Progress report: how many items of `item_id` the sender relayed
    SyncStatusCount { item_id: i32, count: i32 },
}

impl NetworkMessage {
    /// Wire command name
    pub fn command(&self) -> &'static str {
        match self {
            NetworkMessage::GetSporks => "getsporks",
            NetworkMessage::MasternodeListRequest { .. } => "dseg",
            NetworkMessage::WinnersRequest { .. } => "mnget",
            NetworkMessage::GetAuxiliaryData => "getgm",
            NetworkMessage::SyncStatusCount { .. } => "ssc",
        }
    }

    pub fn serialize(&self) -> Result<Vec<u8>, CodecError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn deserialize(data: &[u8]) -> Result<Self, CodecError> {
        Ok(bincode::deserialize(data)?)
    }

    /// Encode as a length-prefixed frame for the given network
    pub fn to_frame(&self, message_start: [u8; 4]) -> Result<Vec<u8>, CodecError> {
        let payload = self.serialize()?;
        if payload.len() > MAX_FRAME_SIZE {
            return Err(CodecError::FrameTooLarge(payload.len()));
        }

        let mut frame = Vec::with_capacity(HEADER_LEN + payload.len());
        frame.extend_from_slice(&message_start);
        frame.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        frame.extend_from_slice(&payload);
        Ok(frame)
    }

    /// Decode a frame produced by [`NetworkMessage::to_frame`]
    pub fn from_frame(message_start: [u8; 4], frame: &[u8]) -> Result<Self, CodecError> {
        if frame.len() < HEADER_LEN {
            return Err(CodecError::Truncated {
                expected: HEADER_LEN,
                actual: frame.len(),
            });
        }

        let (header, payload) = frame.split_at(HEADER_LEN);
        if header[..4] != message_start {
            return Err(CodecError::WrongNetwork);
        }

        let mut len_bytes = [0u8; 4];
        len_bytes.copy_from_slice(&header[4..]);
        let len = u32::from_be_bytes(len_bytes) as usize;
        if len > MAX_FRAME_SIZE {
            return Err(CodecError::FrameTooLarge(len));
        }
        if payload.len() != len {
            return Err(CodecError::Truncated {
                expected: HEADER_LEN + len,
                actual: frame.len(),
            });
        }

        Self::deserialize(payload)
    }
}

/// Per-peer request tokens: "already asked this peer for X"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Sporks,
    MasternodeList,
    MasternodeWinners,
    AuxiliaryData,
}

impl RequestKind {
    pub const ALL: [RequestKind; 4] = [
        RequestKind::Sporks,
        RequestKind::MasternodeList,
        RequestKind::MasternodeWinners,
        RequestKind::AuxiliaryData,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            RequestKind::Sporks => "getspork",
            RequestKind::MasternodeList => "mnsync",
            RequestKind::MasternodeWinners => "mnwsync",
            RequestKind::AuxiliaryData => "getgm",
        }
    }

    pub(crate) fn bit(&self) -> u8 {
        match self {
            RequestKind::Sporks => 1,
            RequestKind::MasternodeList => 1 << 1,
            RequestKind::MasternodeWinners => 1 << 2,
            RequestKind::AuxiliaryData => 1 << 3,
        }
    }
}
