//! Group tracker
//!
//! Reference counts on boat keys the simulator must be polled for. A key is
//! present exactly while its count is above zero.

use std::collections::HashMap;

use crate::broker::key::BoatKey;

#[derive(Debug, Default)]
pub struct GroupTracker {
    counts: HashMap<BoatKey, usize>,
}

impl GroupTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&mut self, key: &BoatKey) {
        *self.counts.entry(key.clone()).or_insert(0) += 1;
    }

    /// Drop one reference. Releasing an untracked key is a no-op.
    pub fn release(&mut self, key: &BoatKey) {
        if let Some(count) = self.counts.get_mut(key) {
            *count -= 1;
            if *count == 0 {
                self.counts.remove(key);
            }
        }
    }

    pub fn count(&self, key: &BoatKey) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn keys(&self) -> Vec<BoatKey> {
        self.counts.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
