//! Command-line interface for parity_grid.

use clap::{Parser, Subcommand};
use parity_grid::DisconnectPolicy;

/// Parity Grid - server-authoritative odd/even grid game
#[derive(Parser, Debug)]
#[command(name = "parity_grid")]
#[command(about = "Two-player odd/even grid game server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the WebSocket game server
    Serve {
        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,

        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// What to do when a seated player leaves mid-game (overrides config)
        #[arg(long, value_enum)]
        disconnect_policy: Option<DisconnectPolicy>,
    },
}
