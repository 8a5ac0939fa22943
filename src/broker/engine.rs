//! Registry engine
//!
//! This module contains the subscription registry responsible for:
//! - associating each live connection with exactly one boat key
//! - indexing connections by the boat key whose feed they receive
//! - reference counting every key the simulator must be polled for, whether
//!   it is a subscriber's own boat or a member of a subscribed group
//! - the cumulative counters reported in the periodic statistics
//!
//! Concurrency and usage notes:
//! - The API is synchronous and meant to sit behind [`SharedRegistry`]. The
//!   live loop holds that lock for a whole cycle, including its simulator
//!   round trip; the request handler holds it only to register.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::broker::key::BoatKey;
use crate::broker::message::GroupMember;
use crate::broker::topic::SubscriptionIndex;
use crate::broker::tracker::GroupTracker;
use crate::client::{Client, ConnectionId};
use crate::utils::{GatewayError, Result};

pub type SharedRegistry = Arc<Mutex<Registry>>;

/// Everything the registry knows about one subscribed connection.
#[derive(Debug)]
pub struct Subscription {
    pub client: Client,
    pub key: BoatKey,
    /// Present for `bdl_g` subscriptions. Never refreshed.
    pub roster: Option<Vec<GroupMember>>,
    /// Keys this connection holds a tracker reference on, each once.
    tracked: Vec<BoatKey>,
}

/// Point-in-time counters for the statistics log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegistryStats {
    pub connections: usize,
    pub keys: usize,
    pub tracked: usize,
    pub total_connections: u64,
    /// Frames queued to clients. A queued frame may still be lost if the
    /// connection drops before its writer flushes it.
    pub total_messages: u64,
}

#[derive(Debug, Default)]
pub struct Registry {
    connections: HashMap<ConnectionId, Subscription>,
    index: SubscriptionIndex,
    tracker: GroupTracker,
    total_connections: u64,
    total_messages: u64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedRegistry {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Associate `client` with `key`, optionally with a group roster.
    ///
    /// Fails if the connection is already subscribed; the caller owns closing
    /// the channel in that case.
    pub fn subscribe(
        &mut self,
        client: Client,
        key: BoatKey,
        roster: Option<Vec<GroupMember>>,
    ) -> Result<()> {
        if self.connections.contains_key(&client.id) {
            return Err(GatewayError::AlreadySubscribed(client.id.to_string()));
        }

        let mut tracked = vec![key.clone()];
        for member in roster.iter().flatten() {
            if !tracked.contains(&member.key) {
                tracked.push(member.key.clone());
            }
        }
        for k in &tracked {
            self.tracker.acquire(k);
        }

        self.index.subscribe(&key, client.id);
        self.total_connections += 1;

        debug!(
            conn = %client.id,
            key = %key,
            group = roster.is_some(),
            tracked = tracked.len(),
            "connection subscribed"
        );

        self.connections.insert(
            client.id,
            Subscription {
                client,
                key,
                roster,
                tracked,
            },
        );
        Ok(())
    }

    /// Drop a connection and every reference it held.
    ///
    /// Returns the client so the caller can close its channel. Unknown ids
    /// are a no-op.
    pub fn unsubscribe(&mut self, id: &ConnectionId) -> Option<Client> {
        let sub = self.connections.remove(id)?;

        for k in &sub.tracked {
            self.tracker.release(k);
        }
        self.index.unsubscribe(&sub.key, id);

        debug!(conn = %id, key = %sub.key, "connection unsubscribed");
        Some(sub.client)
    }

    pub fn is_subscribed(&self, id: &ConnectionId) -> bool {
        self.connections.contains_key(id)
    }

    pub fn subscription(&self, id: &ConnectionId) -> Option<&Subscription> {
        self.connections.get(id)
    }

    /// Keys the simulator must be polled for this cycle.
    pub fn tracked_keys(&self) -> Vec<BoatKey> {
        self.tracker.keys()
    }

    /// Current reference count on `key` (zero if untracked).
    pub fn ref_count(&self, key: &BoatKey) -> usize {
        self.tracker.count(key)
    }

    /// Keys that at least one connection receives a feed for.
    pub fn subscribed_keys(&self) -> Vec<BoatKey> {
        self.index.keys().cloned().collect()
    }

    pub fn connection_ids(&self, key: &BoatKey) -> Vec<ConnectionId> {
        self.index.connections(key).to_vec()
    }

    /// Subscriptions receiving the feed for `key`, in subscription order.
    pub fn subscribers<'a>(&'a self, key: &BoatKey) -> impl Iterator<Item = &'a Subscription> {
        self.index
            .connections(key)
            .iter()
            .filter_map(|id| self.connections.get(id))
    }

    pub fn record_messages(&mut self, count: u64) {
        self.total_messages += count;
    }

    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            connections: self.connections.len(),
            keys: self.index.len(),
            tracked: self.tracker.len(),
            total_connections: self.total_connections,
            total_messages: self.total_messages,
        }
    }
}
