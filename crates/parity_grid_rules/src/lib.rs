//! Pure rules for the two-seat odd/even grid game.
//!
//! Two seats share one 5x5 grid of counters. Either seat may bump any cell
//! by one. A seat wins when some row, column or diagonal holds five values
//! of its parity: all odd for [`Seat::Odd`], all even and nonzero for
//! [`Seat::Even`].
//!
//! ```
//! use parity_grid_rules::{CellIndex, Grid, Outcome, Seat, evaluate};
//!
//! let mut grid = Grid::new();
//! for i in 0..5_usize {
//!     grid.increment(CellIndex::try_from(i).unwrap()).unwrap();
//! }
//! assert_eq!(evaluate(&grid).winner(), Some(Seat::Odd));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod outcome;
mod rules;
mod types;

pub use outcome::Outcome;
pub use rules::{WIN_LINES, WinningLine, evaluate, satisfies};
pub use types::{CELL_COUNT, CellIndex, CellOutOfRange, CellSaturated, GRID_SIDE, Grid, Seat};
