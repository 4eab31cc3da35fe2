//! Bounded sighting counters for gossip objects
//!
//! Each masternode or winner broadcast hash is counted at most `threshold`
//! times. Only counted sightings refresh the sync liveness timers, so a
//! flood of repeated announcements cannot keep a phase open forever.
//! Entries are never evicted; the maps are cleared on sync reset.

use fdr_core::Hash256;
use std::collections::HashMap;

/// Outcome of recording one sighting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sighting {
    /// First time this hash was seen
    New,
    /// Seen before, still below the threshold
    Repeat,
    /// Already at the threshold, ignored
    Saturated,
}

impl Sighting {
    /// Whether the sighting was counted (and should refresh liveness)
    pub fn is_counted(&self) -> bool {
        !matches!(self, Sighting::Saturated)
    }

    pub fn is_new(&self) -> bool {
        matches!(self, Sighting::New)
    }
}

#[derive(Debug, Clone)]
pub struct SeenTracker {
    threshold: u8,
    seen: HashMap<Hash256, u8>,
}

impl SeenTracker {
    pub fn new(threshold: u8) -> Self {
        Self {
            threshold,
            seen: HashMap::new(),
        }
    }

    pub fn record_sighting(&mut self, hash: Hash256) -> Sighting {
        match self.seen.get_mut(&hash) {
            None => {
                self.seen.insert(hash, 1);
                Sighting::New
            }
            Some(count) if *count >= self.threshold => Sighting::Saturated,
            Some(count) => {
                *count += 1;
                Sighting::Repeat
            }
        }
    }

    pub fn count(&self, hash: &Hash256) -> u8 {
        self.seen.get(hash).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn clear(&mut self) {
        self.seen.clear();
    }
}
