mod settings;

use crate::config::settings::PartialSettings;
use config::{Config, ConfigError, Environment, File};

pub use settings::{LiveSettings, ServerSettings, Settings, SimulatorSettings};

/// Loads the configuration from the default file and environment variables
/// and merges it over the built-in defaults.
///
/// Environment variables use the `BOATLIVE_` prefix and `__` for nesting,
/// e.g. `BOATLIVE_SIMULATOR__IO_TIMEOUT_MS=500`.
pub fn load_config() -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(
            Environment::with_prefix("BOATLIVE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("server.paths"),
        );

    let config = builder.build()?;
    let partial: PartialSettings = config.try_deserialize()?;
    Ok(merge(partial))
}

fn merge(partial: PartialSettings) -> Settings {
    let default = Settings::default();
    let server = partial.server;
    let simulator = partial.simulator;
    let live = partial.live;

    Settings {
        server: ServerSettings {
            host: server
                .as_ref()
                .and_then(|s| s.host.clone())
                .unwrap_or(default.server.host),
            port: server
                .as_ref()
                .and_then(|s| s.port)
                .unwrap_or(default.server.port),
            paths: server
                .as_ref()
                .and_then(|s| s.paths.clone())
                .unwrap_or(default.server.paths),
        },
        simulator: SimulatorSettings {
            host: simulator
                .as_ref()
                .and_then(|s| s.host.clone())
                .unwrap_or(default.simulator.host),
            port: simulator
                .as_ref()
                .and_then(|s| s.port)
                .unwrap_or(default.simulator.port),
            connect_timeout_ms: simulator
                .as_ref()
                .and_then(|s| s.connect_timeout_ms)
                .unwrap_or(default.simulator.connect_timeout_ms),
            io_timeout_ms: simulator
                .as_ref()
                .and_then(|s| s.io_timeout_ms)
                .unwrap_or(default.simulator.io_timeout_ms),
        },
        live: LiveSettings {
            cadence_ms: live
                .as_ref()
                .and_then(|l| l.cadence_ms)
                .unwrap_or(default.live.cadence_ms),
            stats_every: live
                .as_ref()
                .and_then(|l| l.stats_every)
                .unwrap_or(default.live.stats_every),
            group_radius_nm: live
                .as_ref()
                .and_then(|l| l.group_radius_nm)
                .unwrap_or(default.live.group_radius_nm),
        },
    }
}
