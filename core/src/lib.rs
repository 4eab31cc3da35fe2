//! FDReserve Core Library
//!
//! Shared primitives consumed by the network and masternode crates:
//! read-only chain parameters, 256-bit object hashes, the wall clock and
//! the shared chain-tip view.

pub mod chain;
pub mod chain_params;
pub mod clock;
pub mod hash;

pub use chain::{ChainState, ChainTip, SharedChain};
pub use chain_params::{ChainParams, NetworkType};
pub use clock::{Clock, ManualClock, SystemClock};
pub use hash::{Hash256, HashParseError};
