//! Win detection for the odd/even grid.

use crate::outcome::Outcome;
use crate::types::{CellIndex, GRID_SIDE, Grid, Seat};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Five cells forming a row, column or diagonal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WinningLine([CellIndex; GRID_SIDE]);

impl WinningLine {
    const fn from_indices(indices: [usize; GRID_SIDE]) -> Self {
        let [a, b, c, d, e] = indices;
        Self([
            CellIndex::new_unchecked(a),
            CellIndex::new_unchecked(b),
            CellIndex::new_unchecked(c),
            CellIndex::new_unchecked(d),
            CellIndex::new_unchecked(e),
        ])
    }

    /// The cells of the line, in order.
    pub fn cells(&self) -> &[CellIndex; GRID_SIDE] {
        &self.0
    }

    /// The cells of the line as raw positions.
    pub fn indices(&self) -> [usize; GRID_SIDE] {
        self.0.map(CellIndex::get)
    }

    /// Whether every cell on this line counts for `seat` on `grid`.
    pub fn is_claimed_by(&self, grid: &Grid, seat: Seat) -> bool {
        self.0.iter().all(|&cell| seat.claims(grid.get(cell)))
    }
}

/// Every winning line in evaluation order: rows, then columns, then the
/// two diagonals.
pub const WIN_LINES: [WinningLine; 12] = [
    // Rows
    WinningLine::from_indices([0, 1, 2, 3, 4]),
    WinningLine::from_indices([5, 6, 7, 8, 9]),
    WinningLine::from_indices([10, 11, 12, 13, 14]),
    WinningLine::from_indices([15, 16, 17, 18, 19]),
    WinningLine::from_indices([20, 21, 22, 23, 24]),
    // Columns
    WinningLine::from_indices([0, 5, 10, 15, 20]),
    WinningLine::from_indices([1, 6, 11, 16, 21]),
    WinningLine::from_indices([2, 7, 12, 17, 22]),
    WinningLine::from_indices([3, 8, 13, 18, 23]),
    WinningLine::from_indices([4, 9, 14, 19, 24]),
    // Diagonals
    WinningLine::from_indices([0, 6, 12, 18, 24]),
    WinningLine::from_indices([4, 8, 12, 16, 20]),
];

/// Evaluates the grid for a completed line.
///
/// Returns `Outcome::Won` for the first line in [`WIN_LINES`] order whose
/// five values are all odd or all even and nonzero, otherwise
/// `Outcome::InProgress`.
#[instrument(skip(grid))]
pub fn evaluate(grid: &Grid) -> Outcome {
    for line in WIN_LINES {
        for seat in Seat::in_order() {
            if line.is_claimed_by(grid, seat) {
                return Outcome::Won { seat, line };
            }
        }
    }
    Outcome::InProgress
}

/// Whether `line` currently satisfies the win predicate for any seat.
pub fn satisfies(grid: &Grid, line: &WinningLine) -> Option<Seat> {
    Seat::in_order().find(|&seat| line.is_claimed_by(grid, seat))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CELL_COUNT;

    fn grid_with(values: &[(usize, u32)]) -> Grid {
        let mut cells = [0; CELL_COUNT];
        for &(i, v) in values {
            cells[i] = v;
        }
        Grid::from_cells(cells)
    }

    #[test]
    fn test_blank_grid_in_progress() {
        assert_eq!(evaluate(&Grid::new()), Outcome::InProgress);
    }

    #[test]
    fn test_odd_top_row_wins() {
        let grid = grid_with(&[(0, 1), (1, 3), (2, 5), (3, 7), (4, 9)]);
        assert_eq!(
            evaluate(&grid),
            Outcome::Won {
                seat: Seat::Odd,
                line: WIN_LINES[0]
            }
        );
    }

    #[test]
    fn test_even_column_wins() {
        let grid = grid_with(&[(2, 2), (7, 4), (12, 6), (17, 8), (22, 10)]);
        let outcome = evaluate(&grid);
        assert_eq!(outcome.winner(), Some(Seat::Even));
        assert_eq!(
            outcome.winning_line().map(|l| l.indices()),
            Some([2, 7, 12, 17, 22])
        );
    }

    #[test]
    fn test_anti_diagonal_wins() {
        let grid = grid_with(&[(4, 1), (8, 1), (12, 1), (16, 1), (20, 1)]);
        assert_eq!(
            evaluate(&grid).winning_line().map(|l| l.indices()),
            Some([4, 8, 12, 16, 20])
        );
    }

    #[test]
    fn test_zero_never_counts_as_even() {
        // Row 0 is 2,2,2,2,0: four evens and an untouched cell.
        let grid = grid_with(&[(0, 2), (1, 2), (2, 2), (3, 2)]);
        assert_eq!(evaluate(&grid), Outcome::InProgress);
    }

    #[test]
    fn test_mixed_parity_line_does_not_win() {
        let grid = grid_with(&[(0, 1), (1, 3), (2, 4), (3, 7), (4, 9)]);
        assert_eq!(evaluate(&grid), Outcome::InProgress);
    }

    #[test]
    fn test_first_line_in_declaration_order_wins() {
        // Every cell odd: row 0 comes before any column or diagonal.
        let grid = Grid::from_cells([1; CELL_COUNT]);
        assert_eq!(evaluate(&grid).winning_line(), Some(WIN_LINES[0]));

        // Row 4 even and column 0 odd except the shared corner: row 4 wins
        // because rows are checked before columns.
        let grid = grid_with(&[
            (20, 2),
            (21, 2),
            (22, 2),
            (23, 2),
            (24, 2),
            (0, 1),
            (5, 1),
            (10, 1),
            (15, 1),
        ]);
        assert_eq!(
            evaluate(&grid),
            Outcome::Won {
                seat: Seat::Even,
                line: WIN_LINES[4]
            }
        );
    }

    #[test]
    fn test_satisfies_matches_evaluate() {
        let grid = grid_with(&[(0, 5), (6, 3), (12, 1), (18, 7), (24, 9)]);
        let line = evaluate(&grid).winning_line().unwrap();
        assert_eq!(line, WIN_LINES[10]);
        assert_eq!(satisfies(&grid, &line), Some(Seat::Odd));
        assert_eq!(satisfies(&grid, &WIN_LINES[0]), None);
    }

    #[test]
    fn test_line_table_shape() {
        for line in WIN_LINES {
            let idx = line.indices();
            assert!(idx.iter().all(|&i| i < CELL_COUNT));
        }
        let rows = WIN_LINES[..5]
            .iter()
            .all(|l| l.cells().iter().all(|c| c.row() == l.cells()[0].row()));
        let cols = WIN_LINES[5..10]
            .iter()
            .all(|l| l.cells().iter().all(|c| c.column() == l.cells()[0].column()));
        assert!(rows && cols);
    }
}
