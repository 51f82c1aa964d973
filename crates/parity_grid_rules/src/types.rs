//! Core domain types for the odd/even grid.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};

/// Side length of the square grid.
pub const GRID_SIDE: usize = 5;

/// Number of cells on the grid.
pub const CELL_COUNT: usize = GRID_SIDE * GRID_SIDE;

/// One of the two seats a connection can hold.
///
/// The seat decides nothing about which cells a player may touch; it only
/// names the parity the player is trying to complete a line with.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    strum::Display,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Seat {
    /// Seat 1, claims lines of odd values.
    Odd,
    /// Seat 2, claims lines of even, nonzero values.
    Even,
}

impl Seat {
    /// Seats in assignment order (seat 1 first).
    pub fn in_order() -> impl Iterator<Item = Seat> {
        Seat::iter()
    }

    /// Whether a cell holding `value` counts toward this seat's parity.
    ///
    /// Zero is even but means "untouched", so it never counts for `Even`.
    pub fn claims(self, value: u32) -> bool {
        match self {
            Seat::Odd => value % 2 == 1,
            Seat::Even => value != 0 && value % 2 == 0,
        }
    }
}

/// A cell index requested from outside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("Cell index {} is outside 0..{}", index, CELL_COUNT)]
pub struct CellOutOfRange {
    /// The rejected index.
    pub index: i64,
}

/// An increment that would overflow a cell's counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("Cell {} cannot count past {}", index, u32::MAX)]
pub struct CellSaturated {
    /// The saturated cell.
    pub index: CellIndex,
}

/// A validated index into the grid, `0..25`, row-major.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "usize")]
pub struct CellIndex(usize);

impl CellIndex {
    /// Builds an index without range checking. Only for the fixed line table.
    pub(crate) const fn new_unchecked(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw position.
    pub fn get(self) -> usize {
        self.0
    }

    /// Row of this cell on the 5x5 layout.
    pub fn row(self) -> usize {
        self.0 / GRID_SIDE
    }

    /// Column of this cell on the 5x5 layout.
    pub fn column(self) -> usize {
        self.0 % GRID_SIDE
    }
}

impl TryFrom<i64> for CellIndex {
    type Error = CellOutOfRange;

    fn try_from(index: i64) -> Result<Self, Self::Error> {
        usize::try_from(index)
            .ok()
            .filter(|i| *i < CELL_COUNT)
            .map(CellIndex)
            .ok_or(CellOutOfRange { index })
    }
}

impl TryFrom<usize> for CellIndex {
    type Error = CellOutOfRange;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        if index < CELL_COUNT {
            Ok(CellIndex(index))
        } else {
            Err(CellOutOfRange {
                index: i64::try_from(index).unwrap_or(i64::MAX),
            })
        }
    }
}

impl From<CellIndex> for usize {
    fn from(index: CellIndex) -> Self {
        index.0
    }
}

/// The shared 5x5 grid of counters.
///
/// Cells only ever grow by one per accepted increment and only return to
/// zero through [`Grid::reset`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    cells: [u32; CELL_COUNT],
}

impl Grid {
    /// Creates an all-zero grid.
    pub fn new() -> Self {
        Self {
            cells: [0; CELL_COUNT],
        }
    }

    /// Builds a grid from explicit cell values.
    pub fn from_cells(cells: [u32; CELL_COUNT]) -> Self {
        Self { cells }
    }

    /// Value at the given cell.
    pub fn get(&self, index: CellIndex) -> u32 {
        self.cells[index.get()]
    }

    /// Adds exactly one to the cell and returns its new value.
    ///
    /// A cell already at `u32::MAX` is left untouched.
    pub fn increment(&mut self, index: CellIndex) -> Result<u32, CellSaturated> {
        let cell = &mut self.cells[index.get()];
        *cell = cell.checked_add(1).ok_or(CellSaturated { index })?;
        Ok(*cell)
    }

    /// Sets every cell back to zero.
    pub fn reset(&mut self) {
        self.cells = [0; CELL_COUNT];
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[u32; CELL_COUNT] {
        &self.cells
    }

    /// True when no cell has been touched.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|&v| v == 0)
    }

    /// Formats the grid as five rows of right-aligned counters.
    pub fn display(&self) -> String {
        self.cells
            .chunks(GRID_SIDE)
            .map(|row| {
                row.iter()
                    .map(|v| format!("{v:>3}"))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_index_bounds() {
        assert!(CellIndex::try_from(0_i64).is_ok());
        assert!(CellIndex::try_from(24_i64).is_ok());
        assert_eq!(
            CellIndex::try_from(25_i64),
            Err(CellOutOfRange { index: 25 })
        );
        assert_eq!(
            CellIndex::try_from(-1_i64),
            Err(CellOutOfRange { index: -1 })
        );
    }

    #[test]
    fn test_cell_index_row_column() {
        let idx = CellIndex::try_from(13_usize).unwrap();
        assert_eq!(idx.row(), 2);
        assert_eq!(idx.column(), 3);
    }

    #[test]
    fn test_increment_touches_one_cell() {
        let mut grid = Grid::new();
        let idx = CellIndex::try_from(7_usize).unwrap();
        assert_eq!(grid.increment(idx), Ok(1));
        assert_eq!(grid.increment(idx), Ok(2));
        for (i, v) in grid.cells().iter().enumerate() {
            if i == 7 {
                assert_eq!(*v, 2);
            } else {
                assert_eq!(*v, 0);
            }
        }
    }

    #[test]
    fn test_reset_zeroes_grid() {
        let mut grid = Grid::from_cells([3; CELL_COUNT]);
        assert!(!grid.is_blank());
        grid.reset();
        assert!(grid.is_blank());
    }

    #[test]
    fn test_seat_parity_claims() {
        assert!(Seat::Odd.claims(1));
        assert!(!Seat::Odd.claims(0));
        assert!(!Seat::Odd.claims(4));
        assert!(Seat::Even.claims(2));
        assert!(!Seat::Even.claims(0));
        assert!(!Seat::Even.claims(3));
    }

    #[test]
    fn test_seat_order_and_display() {
        let seats: Vec<_> = Seat::in_order().collect();
        assert_eq!(seats, vec![Seat::Odd, Seat::Even]);
        assert_eq!(Seat::Odd.to_string(), "ODD");
        assert_eq!(Seat::Even.to_string(), "EVEN");
    }

    #[test]
    fn test_increment_stops_at_ceiling() {
        let mut cells = [0; CELL_COUNT];
        cells[4] = u32::MAX;
        let mut grid = Grid::from_cells(cells);
        let idx = CellIndex::try_from(4_usize).unwrap();
        assert_eq!(grid.increment(idx), Err(CellSaturated { index: idx }));
        assert_eq!(grid.get(idx), u32::MAX);
    }

    #[test]
    fn test_display_lays_out_rows() {
        let mut grid = Grid::new();
        grid.increment(CellIndex::try_from(6_usize).unwrap()).unwrap();
        let text = grid.display();
        let rows: Vec<_> = text.lines().collect();
        assert_eq!(rows.len(), GRID_SIDE);
        assert_eq!(rows[1], "  0   1   0   0   0");
    }

    #[test]
    fn test_grid_serializes_as_flat_array() {
        let json = serde_json::to_string(&Grid::new()).unwrap();
        assert_eq!(json, format!("[{}]", vec!["0"; CELL_COUNT].join(",")));
    }
}
