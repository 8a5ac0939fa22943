//! CLI for Boatlive
//!
//! `boatlive [LISTEN_PORT] [CONNECT_PORT]` runs the gateway. Both ports are
//! optional and override the loaded configuration.

use boatlive::config::load_config;
use boatlive::utils::logging;
use clap::Parser;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "boatlive", version)]
struct Args {
    /// Port to accept WebSocket clients on
    listen_port: Option<u16>,

    /// Simulator port to poll
    connect_port: Option<u16>,

    /// Log level used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let args = Args::parse();
    logging::init(&args.log_level);

    info!("Boatlive WebSocket gateway v{}", env!("CARGO_PKG_VERSION"));

    let mut settings = match load_config() {
        Ok(settings) => settings,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(port) = args.listen_port {
        settings.server.port = port;
    }
    if let Some(port) = args.connect_port {
        settings.simulator.port = port;
    }

    info!(
        listen = %settings.server.addr(),
        simulator = %settings.simulator.addr(),
        "starting gateway"
    );

    tokio::select! {
        result = boatlive::run(settings) => {
            match result {
                Ok(()) => error!("WebSocket server exited unexpectedly."),
                Err(e) => error!("Server failed: {}", e),
            }
            std::process::exit(1);
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received. Exiting gracefully.");
        }
    }
}
