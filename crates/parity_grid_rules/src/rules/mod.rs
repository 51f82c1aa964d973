//! Game rules for the odd/even grid.
//!
//! Pure functions over a grid snapshot. Nothing here mutates state; the
//! server decides when to evaluate.

pub mod win;

pub use win::{WIN_LINES, WinningLine, evaluate, satisfies};
