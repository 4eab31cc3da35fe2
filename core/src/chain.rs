//! Shared view of the active chain tip
//!
//! The validation engine owns the write side. Readers that must never stall
//! block validation use `try_acquire` and back off when the lock is busy.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::hash::Hash256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainTip {
    pub height: u64,
    pub hash: Hash256,
    /// Block timestamp (Unix seconds)
    pub time: i64,
}

/// State guarded by the chain lock
#[derive(Debug, Default)]
pub struct ChainState {
    tip: Option<ChainTip>,
}

impl ChainState {
    pub fn tip(&self) -> Option<&ChainTip> {
        self.tip.as_ref()
    }

    pub fn tip_timestamp(&self) -> Option<i64> {
        self.tip.map(|t| t.time)
    }

    pub fn set_tip(&mut self, tip: ChainTip) {
        self.tip = Some(tip);
    }

    pub fn clear_tip(&mut self) {
        self.tip = None;
    }
}

/// Cloneable handle to the chain state and the import/reindex flags
#[derive(Debug, Clone, Default)]
pub struct SharedChain {
    state: Arc<RwLock<ChainState>>,
    importing: Arc<AtomicBool>,
    reindexing: Arc<AtomicBool>,
}

impl SharedChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-blocking read access. `None` when a writer holds the lock.
    pub fn try_acquire(&self) -> Option<RwLockReadGuard<'_, ChainState>> {
        self.state.try_read().ok()
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, ChainState> {
        self.state.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, ChainState> {
        self.state.write().await
    }

    pub async fn set_tip(&self, tip: ChainTip) {
        self.state.write().await.set_tip(tip);
    }

    pub fn is_importing(&self) -> bool {
        self.importing.load(Ordering::SeqCst)
    }

    pub fn set_importing(&self, importing: bool) {
        self.importing.store(importing, Ordering::SeqCst);
    }

    pub fn is_reindexing(&self) -> bool {
        self.reindexing.load(Ordering::SeqCst)
    }

    pub fn set_reindexing(&self, reindexing: bool) {
        self.reindexing.store(reindexing, Ordering::SeqCst);
    }
}
