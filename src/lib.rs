//! Parity Grid - server-authoritative sync engine for the odd/even grid game
//!
//! Two players share one 5x5 grid of counters. Either may bump any cell by
//! one; the first row, column or diagonal to hold five odd values wins for
//! the odd seat, five even nonzero values for the even seat. The server is
//! the only writer of the grid and applies requests in the order it
//! receives them.
//!
//! # Architecture
//!
//! - **Rules**: grid, seats and win detection (`parity_grid_rules`)
//! - **Seats**: first-come assignment of the two seats
//! - **Engine**: the state machine; one event in, ordered dispatches out
//! - **Broadcast**: fan-out of dispatches to connection outboxes
//! - **Server**: axum WebSocket endpoint feeding a single engine task
//!
//! # Example
//!
//! ```
//! use parity_grid::{ConnectionEvent, ConnectionId, DisconnectPolicy, GameEngine, Phase};
//!
//! let mut engine = GameEngine::new(DisconnectPolicy::Terminate);
//! engine.handle(ConnectionEvent::Connect(ConnectionId::from(1)));
//! engine.handle(ConnectionEvent::Connect(ConnectionId::from(2)));
//! assert_eq!(engine.phase(), Phase::InProgress);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod broadcast;
mod config;
mod connection;
mod engine;
mod error;
mod protocol;
mod seats;
mod server;

// Crate-level exports - Configuration
pub use config::{ConfigError, DisconnectPolicy, ServerConfig};

// Crate-level exports - Connections and transport
pub use broadcast::{Broadcaster, Outbox, Outgoing};
pub use connection::{ConnectionEvent, ConnectionId, ConnectionIds};
pub use server::GameServer;

// Crate-level exports - Game state machine
pub use engine::{Dispatch, GameEngine, GameState, Phase};
pub use error::GameError;
pub use protocol::{ClientRequest, GAME_START_MESSAGE, OPPONENT_LEFT_MESSAGE, ServerEvent};
pub use seats::{RoomFull, SeatRegistry};

// Crate-level exports - Game rules
pub use parity_grid_rules::{
    CELL_COUNT, CellIndex, Grid, Outcome, Seat, WIN_LINES, WinningLine, evaluate, satisfies,
};
