use serde::{Deserialize, Serialize};

/// Inbound client frame: `{"cmd": "bdl" | "bdl_g", "key": "<32 hex>"}`.
///
/// Both fields default to empty so a frame with a missing field still parses
/// and is handled like an unknown command or a bad key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRequest {
    #[serde(default)]
    pub cmd: String,
    #[serde(default)]
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain live data feed for one boat.
    BoatDataLive,
    /// Live data plus nearby group members.
    BoatDataLiveGroup,
    Other(String),
}

impl ClientRequest {
    pub fn command(&self) -> Command {
        match self.cmd.as_str() {
            "bdl" => Command::BoatDataLive,
            "bdl_g" => Command::BoatDataLiveGroup,
            other => Command::Other(other.to_string()),
        }
    }
}
