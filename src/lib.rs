//! # Boatlive
//!
//! `boatlive` is a WebSocket gateway that streams live boat telemetry from a
//! sailing simulator. Clients subscribe to one boat by key; once per cadence
//! the gateway polls the simulator over its TCP line protocol and pushes the
//! fresh sample to every subscriber, optionally with nearby group members.
//!
//! ## Core Modules
//!
//! - `broker`: Subscription registry, boat keys and outbound payload types.
//! - `client`: Represents a connected WebSocket client.
//! - `config`: Handles loading and managing server configuration.
//! - `geo`: Short-range distance and precision reduction for group members.
//! - `live`: The poll-and-broadcast loop.
//! - `simulator`: TCP client for the simulator's line protocol.
//! - `transport`: Manages the WebSocket server and inbound requests.
//! - `utils`: Error type and logging setup.

pub mod broker;
pub mod client;
pub mod config;
pub mod geo;
pub mod live;
pub mod simulator;
pub mod transport;
pub mod utils;

use crate::broker::Registry;
use crate::config::Settings;
use crate::live::LiveFeed;
use crate::simulator::SimulatorClient;
use crate::transport::{ServerState, start_websocket_server};

/// Start the live loop in the background and serve WebSocket clients until
/// the listener fails.
pub async fn run(settings: Settings) -> utils::Result<()> {
    let registry = Registry::shared();
    let simulator = SimulatorClient::from_settings(&settings.simulator);

    tokio::spawn(LiveFeed::new(registry.clone(), simulator.clone(), settings.live.clone()).run());

    let state = ServerState::new(registry, simulator, settings.server.paths.clone());
    start_websocket_server(&settings.server.addr(), state).await
}

#[cfg(test)]
mod tests;
