//! Subscription index
//!
//! Maps each boat key to the connections that want its feed, in subscription
//! order. An entry exists only while its connection list is non-empty.

use std::collections::HashMap;

use crate::broker::key::BoatKey;
use crate::client::ConnectionId;

#[derive(Debug, Default)]
pub struct SubscriptionIndex {
    keys: HashMap<BoatKey, Vec<ConnectionId>>,
}

impl SubscriptionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection under `key`. Duplicate adds are ignored.
    pub fn subscribe(&mut self, key: &BoatKey, id: ConnectionId) {
        let conns = self.keys.entry(key.clone()).or_default();
        if !conns.contains(&id) {
            conns.push(id);
        }
    }

    /// Remove a connection from `key`, dropping the entry once it is empty.
    pub fn unsubscribe(&mut self, key: &BoatKey, id: &ConnectionId) {
        if let Some(conns) = self.keys.get_mut(key) {
            conns.retain(|c| c != id);
            if conns.is_empty() {
                self.keys.remove(key);
            }
        }
    }

    pub fn connections(&self, key: &BoatKey) -> &[ConnectionId] {
        self.keys.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn keys(&self) -> impl Iterator<Item = &BoatKey> {
        self.keys.keys()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
