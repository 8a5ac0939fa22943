//! Subscription request handling.
//!
//! Turns one parsed client frame into a registry subscription. A rejected
//! request closes the connection; an unknown command leaves it untouched.

use tracing::{debug, info, warn};

use crate::broker::{BoatKey, SharedRegistry};
use crate::client::Client;
use crate::simulator::SimulatorClient;
use crate::transport::message::{ClientRequest, Command};
use crate::utils::{GatewayError, Result};

/// Handle one client request.
///
/// On `Err` the connection has already been closed and the reason logged.
pub async fn handle_request(
    registry: &SharedRegistry,
    simulator: &SimulatorClient,
    client: &Client,
    request: ClientRequest,
) -> Result<()> {
    let with_group = match request.command() {
        Command::BoatDataLive => false,
        Command::BoatDataLiveGroup => true,
        Command::Other(cmd) => {
            warn!(conn = %client.id, cmd = %cmd, "ignoring unknown command");
            return Ok(());
        }
    };

    match subscribe(registry, simulator, client, &request.key, with_group).await {
        Ok(()) => {
            info!(conn = %client.id, key = %request.key, group = with_group, "subscribed");
            Ok(())
        }
        Err(e) => {
            warn!(
                conn = %client.id,
                key = %request.key,
                group = with_group,
                error = %e,
                "subscription rejected, closing"
            );
            client.close();
            Err(e)
        }
    }
}

async fn subscribe(
    registry: &SharedRegistry,
    simulator: &SimulatorClient,
    client: &Client,
    raw_key: &str,
    with_group: bool,
) -> Result<()> {
    let key = BoatKey::parse(raw_key)?;
    if registry.lock().await.is_subscribed(&client.id) {
        return Err(GatewayError::AlreadySubscribed(client.id.to_string()));
    }

    // Roster is resolved outside the registry lock. The insert below
    // re-checks for a subscription made in the meantime.
    let roster = if with_group {
        let members = simulator.fetch_group_members(&key).await?;
        debug!(conn = %client.id, key = %key, members = members.len(), "roster resolved");
        Some(members)
    } else {
        None
    };

    registry.lock().await.subscribe(client.clone(), key, roster)
}
