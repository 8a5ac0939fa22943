//! Poll-and-broadcast loop
//!
//! Once per cadence the loop locks the registry, polls the simulator for
//! every tracked key, pushes a fresh message to each subscriber and closes
//! the connections that could not be served. The lock is held for the whole
//! cycle so subscriptions never change under a broadcast.

pub mod group;
pub mod stats;

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::broker::{BoatData, BoatKey, Registry, SharedRegistry};
use crate::client::ConnectionId;
use crate::config::LiveSettings;
use crate::simulator::SimulatorClient;

pub use group::build_group_payload;
pub use stats::CycleStats;

/// What one broadcast pass did.
#[derive(Debug, Default)]
pub struct Broadcast {
    pub sent: u64,
    pub doomed: Vec<ConnectionId>,
}

pub struct LiveFeed {
    registry: SharedRegistry,
    simulator: SimulatorClient,
    settings: LiveSettings,
    stats: CycleStats,
}

impl LiveFeed {
    pub fn new(registry: SharedRegistry, simulator: SimulatorClient, settings: LiveSettings) -> Self {
        Self {
            registry,
            simulator,
            settings,
            stats: CycleStats::new(),
        }
    }

    /// Run cycles forever. An overrun cycle is followed immediately by the
    /// next one; missed ticks are not made up.
    pub async fn run(mut self) {
        info!(
            cadence_ms = self.settings.cadence_ms,
            simulator = %self.simulator.addr(),
            "live feed started"
        );

        loop {
            let elapsed = self.run_cycle().await;
            if let Some(pause) = cycle_pause(self.settings.cadence(), elapsed) {
                sleep(pause).await;
            }
        }
    }

    /// One poll-and-broadcast pass. Returns how long it took.
    pub async fn run_cycle(&mut self) -> Duration {
        let started = Instant::now();
        let mut registry = self.registry.lock().await;

        let tracked = registry.tracked_keys();
        let samples = if tracked.is_empty() {
            HashMap::new()
        } else {
            self.simulator.fetch_live_data(&tracked).await
        };

        let outcome = broadcast(&registry, &samples, self.settings.group_radius_nm);
        registry.record_messages(outcome.sent);

        for id in &outcome.doomed {
            if let Some(client) = registry.unsubscribe(id) {
                client.close();
            }
        }

        let elapsed = started.elapsed();
        self.stats.record(elapsed);

        let every = self.settings.stats_every;
        if every > 0 && u64::from(self.stats.samples()) >= every {
            self.log_stats(&registry);
            self.stats.reset();
        }

        elapsed
    }

    pub fn cycle_stats(&self) -> &CycleStats {
        &self.stats
    }

    fn log_stats(&self, registry: &Registry) {
        let snapshot = registry.stats();
        info!(
            conns = snapshot.connections,
            keys = snapshot.keys,
            tracked = snapshot.tracked,
            total_conns = snapshot.total_connections,
            total_msgs = snapshot.total_messages,
            min_us = self.stats.min().as_micros() as u64,
            avg_us = self.stats.avg().as_micros() as u64,
            max_us = self.stats.max().as_micros() as u64,
            "live feed stats"
        );
    }
}

/// Time left in the cadence after a cycle that took `elapsed`. `None` once
/// the cycle has used up the whole cadence.
pub fn cycle_pause(cadence: Duration, elapsed: Duration) -> Option<Duration> {
    Some(cadence.saturating_sub(elapsed)).filter(|pause| !pause.is_zero())
}

/// Send this cycle's messages. Connections whose key has no sample, or whose
/// channel refuses the send, are returned for closing.
pub fn broadcast(
    registry: &Registry,
    samples: &HashMap<BoatKey, BoatData>,
    radius_nm: f64,
) -> Broadcast {
    let mut outcome = Broadcast::default();

    for key in registry.subscribed_keys() {
        let Some(own) = samples.get(&key) else {
            let ids = registry.connection_ids(&key);
            warn!(key = %key, conns = ids.len(), "no sample this cycle, closing subscribers");
            outcome.doomed.extend(ids);
            continue;
        };

        for sub in registry.subscribers(&key) {
            let sent = match &sub.roster {
                Some(roster) => sub.client.send_json(&build_group_payload(
                    &key, own, roster, samples, radius_nm,
                )),
                None => sub.client.send_json(own),
            };

            match sent {
                Ok(()) => outcome.sent += 1,
                Err(e) => {
                    debug!(conn = %sub.client.id, key = %key, error = %e, "send failed, closing");
                    outcome.doomed.push(sub.client.id);
                }
            }
        }
    }

    outcome
}
