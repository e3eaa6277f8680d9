//! Backtracking solver.
//!
//! Drives a grid from its initial partial state to either a full legal
//! assignment or a definitive unsolvable verdict. A pre-check pass first
//! computes every empty cell's candidate set and fails fast when any cell
//! has none; the search then walks cells in row-major order, trying each
//! pre-check candidate in ascending order with re-validation against the
//! current grid, and undoes placements chronologically on dead ends.

use crate::{DigitSet, Grid, GridError, Position, SectorMasks};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The built-in default board, used when no puzzle is supplied.
const DEFAULT_PUZZLE: &str =
    "004302100060000020900000007001030200200906001009050400700000003010000040008503900";

/// Tri-state solve outcome. Monotonic for the lifetime of a solve:
/// `InProgress` until the search terminates, then `Solved` or `Unsolvable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    InProgress,
    Solved,
    Unsolvable,
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveStatus::InProgress => write!(f, "in progress"),
            SolveStatus::Solved => write!(f, "solved"),
            SolveStatus::Unsolvable => write!(f, "unsolvable"),
        }
    }
}

/// Owns a grid for the duration of one solve.
pub struct Solver {
    grid: Grid,
    /// Pre-check candidate set per cell, row-major. Supersets of the
    /// truly-legal sets once the search has placed digits above a cell,
    /// which is why the search re-validates each candidate.
    options: Vec<DigitSet>,
    status: SolveStatus,
    pre_checked: bool,
}

impl Solver {
    /// Adopt a grid for solving. Rejects a grid whose givens already
    /// violate row/column/box uniqueness, since the search itself only
    /// detects empty candidate sets, not upstream contradictions.
    pub fn new(grid: Grid) -> Result<Self, GridError> {
        grid.check_givens()?;
        let cell_count = grid.size() * grid.size();
        Ok(Self {
            grid,
            options: vec![DigitSet::empty(); cell_count],
            status: SolveStatus::InProgress,
            pre_checked: false,
        })
    }

    /// A solver loaded with the built-in default board.
    pub fn with_default_puzzle() -> Self {
        let grid = Grid::from_string(DEFAULT_PUZZLE).expect("default puzzle is well-formed");
        Self::new(grid).expect("default puzzle has no conflicting givens")
    }

    pub fn status(&self) -> SolveStatus {
        self.status
    }

    /// The current matrix, solved or not.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Give the grid back to the caller.
    pub fn into_grid(self) -> Grid {
        self.grid
    }

    /// Compute every empty cell's candidate set, row-major. Short-circuits
    /// to `Unsolvable` on the first cell with no candidates. Passing is
    /// necessary but not sufficient for solvability.
    pub fn pre_check(&mut self) -> SolveStatus {
        if self.status != SolveStatus::InProgress {
            return self.status;
        }
        let masks = SectorMasks::from_grid(&self.grid);
        let n = self.grid.size();
        for pos in self.grid.positions() {
            if !self.grid.is_empty_cell(pos) {
                continue;
            }
            let cands = masks.candidates_for(pos);
            if cands.is_empty() {
                self.status = SolveStatus::Unsolvable;
                return self.status;
            }
            self.options[pos.row * n + pos.col] = cands;
        }
        self.pre_checked = true;
        self.status
    }

    /// Run the backtracking search. No-op when the status is already
    /// settled; runs the pre-check first if the caller has not.
    pub fn solve(&mut self) -> SolveStatus {
        if self.status != SolveStatus::InProgress {
            return self.status;
        }
        if !self.pre_checked && self.pre_check() == SolveStatus::Unsolvable {
            return self.status;
        }
        let mut masks = SectorMasks::from_grid(&self.grid);
        self.status = if self.search(0, 0, &mut masks) {
            SolveStatus::Solved
        } else {
            SolveStatus::Unsolvable
        };
        self.status
    }

    /// Depth-first search over positions in row-major order. Returns true
    /// once every cell past this point is legally filled; on false the
    /// grid and masks are exactly as they were at entry.
    fn search(&mut self, row: usize, col: usize, masks: &mut SectorMasks) -> bool {
        let n = self.grid.size();
        if col == n {
            return self.search(row + 1, 0, masks);
        }
        if row == n {
            return true;
        }
        let pos = Position::new(row, col);
        if !self.grid.is_empty_cell(pos) {
            return self.search(row, col + 1, masks);
        }
        let options = self.options[row * n + col];
        for digit in options.iter() {
            // The pre-check set is stale once earlier cells in this branch
            // have been filled; re-validate against the current grid.
            if !masks.is_possible(pos, digit) {
                continue;
            }
            self.grid.set(pos, Some(digit));
            masks.place(pos, digit);
            if self.search(row, col + 1, masks) {
                return true;
            }
            masks.unplace(pos, digit);
            self.grid.set(pos, None);
        }
        false
    }
}
