//! Parity Grid - game server binary.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use parity_grid::{DisconnectPolicy, GameServer, ServerConfig};
use std::path::PathBuf;
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    initialize_tracing();

    match cli.command {
        Command::Serve {
            config,
            host,
            port,
            disconnect_policy,
        } => run_server(config, host, port, disconnect_policy).await,
    }
}

/// Run the WebSocket game server
#[instrument]
async fn run_server(
    config_path: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
    disconnect_policy: Option<DisconnectPolicy>,
) -> Result<()> {
    let config = match &config_path {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    }
    .with_overrides(host, port, disconnect_policy);

    info!(
        host = %config.host(),
        port = *config.port(),
        disconnect_policy = %config.disconnect_policy(),
        "Starting Parity Grid server"
    );

    GameServer::new(config).run().await
}

fn initialize_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,parity_grid=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
