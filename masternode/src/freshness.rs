//! Blockchain freshness monitor
//!
//! Answers "is the local chain tip recent enough to trust". Once the chain
//! has been seen fresh the answer is latched until the host is detected to
//! have been asleep.

use fdr_core::SharedChain;

#[derive(Debug, Clone)]
pub struct FreshnessMonitor {
    synced: bool,
    last_checked: i64,
    sleep_window: i64,
    max_tip_age: i64,
}

impl FreshnessMonitor {
    pub fn new(now: i64, sleep_window: i64, max_tip_age: i64) -> Self {
        Self {
            synced: false,
            last_checked: now,
            sleep_window,
            max_tip_age,
        }
    }

    /// Record a check at `now`. Returns true when the previous check was
    /// more than the sleep window ago; the latch is cleared in that case.
    pub fn detect_sleep(&mut self, now: i64) -> bool {
        let slept = now - self.last_checked > self.sleep_window;
        if slept {
            self.synced = false;
        }
        self.last_checked = now;
        slept
    }

    /// Note that the node is alive at `now` without evaluating the chain
    pub fn touch(&mut self, now: i64) {
        self.last_checked = now;
    }

    /// Evaluate freshness against the chain. Never blocks on the chain lock.
    pub fn evaluate(&mut self, now: i64, chain: &SharedChain) -> bool {
        if self.synced {
            return true;
        }

        if chain.is_importing() || chain.is_reindexing() {
            return false;
        }

        let Some(state) = chain.try_acquire() else {
            return false;
        };

        let Some(tip_time) = state.tip_timestamp() else {
            return false;
        };

        if tip_time + self.max_tip_age < now {
            return false;
        }

        self.synced = true;
        true
    }

    /// Cached answer without touching the chain
    pub fn is_latched(&self) -> bool {
        self.synced
    }
}
