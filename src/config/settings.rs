use serde::Deserialize;
use std::time::Duration;

/// Top-level configuration settings for the gateway.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub simulator: SimulatorSettings,
    pub live: LiveSettings,
}

/// Where the WebSocket server listens and which upgrade paths it accepts.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub paths: Vec<String>,
}

impl ServerSettings {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// How to reach the backend simulator.
#[derive(Debug, Deserialize, Clone)]
pub struct SimulatorSettings {
    pub host: String,
    pub port: u16,
    pub connect_timeout_ms: u64,
    pub io_timeout_ms: u64,
}

impl SimulatorSettings {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn io_timeout(&self) -> Duration {
        Duration::from_millis(self.io_timeout_ms)
    }
}

/// Poll-and-broadcast loop tuning.
#[derive(Debug, Deserialize, Clone)]
pub struct LiveSettings {
    pub cadence_ms: u64,
    pub stats_every: u64,
    pub group_radius_nm: f64,
}

impl LiveSettings {
    pub fn cadence(&self) -> Duration {
        Duration::from_millis(self.cadence_ms)
    }
}

/// Partial configuration settings loaded from files or environment.
///
/// Missing values are filled from `Settings::default()`.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub server: Option<PartialServerSettings>,
    pub simulator: Option<PartialSimulatorSettings>,
    pub live: Option<PartialLiveSettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialServerSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub paths: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct PartialSimulatorSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub connect_timeout_ms: Option<u64>,
    pub io_timeout_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct PartialLiveSettings {
    pub cadence_ms: Option<u64>,
    pub stats_every: Option<u64>,
    pub group_radius_nm: Option<f64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 8080,
                paths: vec!["/v1/ws".to_string(), "/v1/ws/".to_string()],
            },
            simulator: SimulatorSettings {
                host: "127.0.0.1".to_string(),
                port: 3100,
                connect_timeout_ms: 1000,
                io_timeout_ms: 3000,
            },
            live: LiveSettings {
                cadence_ms: 1000,
                stats_every: 60,
                group_radius_nm: 15.0,
            },
        }
    }
}
