//! Per-connection protocol errors.

use derive_more::{Display, Error};
use parity_grid_rules::{CellOutOfRange, CellSaturated};

/// Everything that can go wrong while serving a single connection.
///
/// None of these abort the server or touch shared state. The offending
/// connection is told via an `ERROR` event, and only `RoomFull` closes it.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum GameError {
    /// Both seats were taken when the connection arrived.
    #[display("Game is full. Only 2 players allowed.")]
    RoomFull,

    /// The payload was not a recognized request.
    #[display("Invalid message format")]
    MalformedMessage,

    /// The requested cell is not on the grid.
    #[display("Invalid square")]
    InvalidCellIndex(#[error(not(source))] i64),

    /// The cell's counter is already at its ceiling.
    #[display("Square cannot be incremented further")]
    CellSaturated(#[error(not(source))] usize),

    /// An increment arrived after the game ended.
    #[display("Game is over")]
    OperationAfterGameOver,
}

impl GameError {
    /// Whether the connection must be closed after reporting this error.
    pub fn closes_connection(&self) -> bool {
        matches!(self, GameError::RoomFull)
    }
}

impl From<CellOutOfRange> for GameError {
    fn from(err: CellOutOfRange) -> Self {
        GameError::InvalidCellIndex(err.index)
    }
}

impl From<CellSaturated> for GameError {
    fn from(err: CellSaturated) -> Self {
        GameError::CellSaturated(err.index.get())
    }
}

impl From<serde_json::Error> for GameError {
    fn from(_: serde_json::Error) -> Self {
        GameError::MalformedMessage
    }
}
