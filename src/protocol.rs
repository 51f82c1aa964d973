//! JSON wire records exchanged over the socket.
//!
//! Every frame is one JSON object tagged by `"type"`. Field names follow the
//! browser client: cells are `square`, grids are `board`, seats are
//! `player`.

use crate::error::GameError;
use parity_grid_rules::{CellIndex, Grid, Outcome, Seat, WinningLine};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

/// Text sent with `GAME_START`.
pub const GAME_START_MESSAGE: &str = "Both players connected. Game started!";

/// Text sent with `PLAYER_DISCONNECTED`.
pub const OPPONENT_LEFT_MESSAGE: &str = "Opponent disconnected";

/// A request from a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientRequest {
    /// Bump one cell by one. The index is validated by the engine so an
    /// out-of-range value is reported as such rather than as malformed.
    Increment {
        /// Requested cell, row-major.
        #[serde(alias = "cellIndex")]
        square: i64,
    },
    /// Zero the grid and clear the outcome.
    Reset,
}

impl ClientRequest {
    /// Parses one text frame.
    #[instrument(skip(text), fields(len = text.len()))]
    pub fn parse(text: &str) -> Result<Self, GameError> {
        serde_json::from_str(text).map_err(|e| {
            warn!(error = %e, "Rejected malformed request");
            GameError::from(e)
        })
    }
}

/// An event sent from the server to one or all clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerEvent {
    /// Sent once to a connection right after it is seated.
    PlayerAssigned {
        /// The seat the connection now holds.
        #[serde(rename = "player")]
        seat: Seat,
        /// Current grid snapshot.
        #[serde(rename = "board")]
        grid: Grid,
    },
    /// Both seats are filled and play is live.
    GameStart {
        /// Human-readable notice.
        message: String,
    },
    /// A cell changed.
    Update {
        /// The incremented cell.
        #[serde(rename = "square")]
        cell_index: CellIndex,
        /// Its value after the increment.
        #[serde(rename = "value")]
        new_value: u32,
    },
    /// The game ended. Both fields are null when a disconnect ended it.
    GameOver {
        /// Winning seat.
        winner: Option<Seat>,
        /// The completed line.
        #[serde(rename = "winningLine")]
        winning_line: Option<WinningLine>,
    },
    /// The grid was zeroed.
    GameReset {
        /// The (blank) grid.
        #[serde(rename = "board")]
        grid: Grid,
    },
    /// A seated peer went away.
    PlayerDisconnected {
        /// The seat that was vacated.
        #[serde(rename = "player")]
        seat: Seat,
        /// Human-readable notice.
        message: String,
    },
    /// A request from this connection was rejected.
    Error {
        /// What went wrong.
        message: String,
    },
}

impl ServerEvent {
    /// `GAME_START` with the standard notice.
    pub fn game_start() -> Self {
        ServerEvent::GameStart {
            message: GAME_START_MESSAGE.to_string(),
        }
    }

    /// `GAME_OVER` describing a terminal outcome.
    pub fn game_over(outcome: &Outcome) -> Self {
        ServerEvent::GameOver {
            winner: outcome.winner(),
            winning_line: outcome.winning_line(),
        }
    }

    /// `PLAYER_DISCONNECTED` for the seat that was vacated.
    pub fn player_disconnected(seat: Seat) -> Self {
        ServerEvent::PlayerDisconnected {
            seat,
            message: OPPONENT_LEFT_MESSAGE.to_string(),
        }
    }

    /// The wire tag of this event, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            ServerEvent::PlayerAssigned { .. } => "PLAYER_ASSIGNED",
            ServerEvent::GameStart { .. } => "GAME_START",
            ServerEvent::Update { .. } => "UPDATE",
            ServerEvent::GameOver { .. } => "GAME_OVER",
            ServerEvent::GameReset { .. } => "GAME_RESET",
            ServerEvent::PlayerDisconnected { .. } => "PLAYER_DISCONNECTED",
            ServerEvent::Error { .. } => "ERROR",
        }
    }

    /// Encodes the event as a JSON text frame.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<&GameError> for ServerEvent {
    fn from(err: &GameError) -> Self {
        ServerEvent::Error {
            message: err.to_string(),
        }
    }
}
