//! Terminal and non-terminal game outcomes.

use super::rules::WinningLine;
use super::types::Seat;
use serde::{Deserialize, Serialize};

/// Where the shared game currently stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// No line has been completed yet.
    #[default]
    InProgress,
    /// A seat completed a line of its parity.
    Won {
        /// The seat whose parity filled the line.
        seat: Seat,
        /// The first qualifying line in declaration order.
        line: WinningLine,
    },
    /// A seated player left mid-game and the match was called off.
    TerminatedByDisconnect,
}

impl Outcome {
    /// True while increments are still accepted.
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Outcome::InProgress)
    }

    /// The winning seat, if any.
    pub fn winner(&self) -> Option<Seat> {
        match self {
            Outcome::Won { seat, .. } => Some(*seat),
            _ => None,
        }
    }

    /// The winning line, if any.
    pub fn winning_line(&self) -> Option<WinningLine> {
        match self {
            Outcome::Won { line, .. } => Some(*line),
            _ => None,
        }
    }
}
