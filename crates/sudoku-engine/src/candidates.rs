//! Candidate engine: which digits can legally occupy a cell right now?
//!
//! Two equivalent forms are provided. The scan-based predicates on [`Grid`]
//! are pure functions of current grid state, safe to call repeatedly as the
//! grid mutates. [`SectorMasks`] keeps digit-presence bitmasks per row,
//! column, and box for O(1) checks on the solver hot path, updated
//! incrementally as digits are placed and unplaced.

use crate::{DigitSet, Grid, Position};

impl Grid {
    /// Can `digit` legally occupy `pos` in the current grid? False iff the
    /// digit already appears in the row, column, or box of `pos`.
    pub fn is_possible(&self, pos: Position, digit: u8) -> bool {
        !self.row_has_digit(pos.row, digit)
            && !self.col_has_digit(pos.col, digit)
            && !self.box_has_digit(pos, digit)
    }

    /// The set of digits for which [`Grid::is_possible`] holds at `pos`.
    /// Only meaningful on empty cells.
    pub fn candidates_for(&self, pos: Position) -> DigitSet {
        let mut set = DigitSet::empty();
        for digit in 1..=self.size() as u8 {
            if self.is_possible(pos, digit) {
                set.insert(digit);
            }
        }
        set
    }

    fn row_has_digit(&self, row: usize, digit: u8) -> bool {
        (0..self.size()).any(|col| self.get(Position::new(row, col)) == Some(digit))
    }

    fn col_has_digit(&self, col: usize, digit: u8) -> bool {
        (0..self.size()).any(|row| self.get(Position::new(row, col)) == Some(digit))
    }

    fn box_has_digit(&self, pos: Position, digit: u8) -> bool {
        let origin = self.box_origin(pos);
        let b = self.box_size();
        (0..b * b).any(|i| {
            let p = Position::new(origin.row + i / b, origin.col + i % b);
            self.get(p) == Some(digit)
        })
    }
}

/// Digit-presence masks for the three sector kinds (rows, columns, boxes).
///
/// Bit d-1 of a sector mask is set when digit d is placed somewhere in that
/// sector. Built once per solve, then maintained by `place`/`unplace` so
/// legality checks during backtracking stay constant-time and undo is a
/// single bit clear.
#[derive(Debug, Clone)]
pub struct SectorMasks {
    box_size: usize,
    all: DigitSet,
    rows: Vec<u32>,
    cols: Vec<u32>,
    boxes: Vec<u32>,
}

impl SectorMasks {
    /// Build masks from the current contents of a grid.
    pub fn from_grid(grid: &Grid) -> Self {
        let n = grid.size();
        let mut masks = Self {
            box_size: grid.box_size(),
            all: DigitSet::all(n),
            rows: vec![0; n],
            cols: vec![0; n],
            boxes: vec![0; n],
        };
        for pos in grid.positions() {
            if let Some(digit) = grid.get(pos) {
                masks.place(pos, digit);
            }
        }
        masks
    }

    fn box_index(&self, pos: Position) -> usize {
        (pos.row / self.box_size) * self.box_size + pos.col / self.box_size
    }

    /// Mask-based equivalent of [`Grid::is_possible`].
    pub fn is_possible(&self, pos: Position, digit: u8) -> bool {
        let bit = 1u32 << (digit - 1);
        (self.rows[pos.row] | self.cols[pos.col] | self.boxes[self.box_index(pos)]) & bit == 0
    }

    /// Mask-based equivalent of [`Grid::candidates_for`].
    pub fn candidates_for(&self, pos: Position) -> DigitSet {
        let used = self.rows[pos.row] | self.cols[pos.col] | self.boxes[self.box_index(pos)];
        DigitSet::from_mask(self.all.mask() & !used)
    }

    /// Record a digit placed at `pos`.
    pub fn place(&mut self, pos: Position, digit: u8) {
        let bit = 1u32 << (digit - 1);
        self.rows[pos.row] |= bit;
        self.cols[pos.col] |= bit;
        let bx = self.box_index(pos);
        self.boxes[bx] |= bit;
    }

    /// Undo a placement at `pos`.
    pub fn unplace(&mut self, pos: Position, digit: u8) {
        let bit = !(1u32 << (digit - 1));
        self.rows[pos.row] &= bit;
        self.cols[pos.col] &= bit;
        let bx = self.box_index(pos);
        self.boxes[bx] &= bit;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUZZLE: &str =
        "530070000600195000098000060800060003400803001700020006060000280000419005000080079";

    #[test]
    fn test_is_possible_respects_sectors() {
        let grid = Grid::from_string(PUZZLE).unwrap();
        let pos = Position::new(0, 2);
        // 5 is in row 0, 8 is in column 2, 9 is in the top-left box.
        assert!(!grid.is_possible(pos, 5));
        assert!(!grid.is_possible(pos, 8));
        assert!(!grid.is_possible(pos, 9));
        assert!(grid.is_possible(pos, 1));
    }

    #[test]
    fn test_candidates_for_known_cell() {
        let grid = Grid::from_string(PUZZLE).unwrap();
        let cands = grid.candidates_for(Position::new(0, 2));
        assert_eq!(cands.iter().collect::<Vec<_>>(), vec![1, 2, 4]);
    }

    #[test]
    fn test_empty_grid_has_full_candidates() {
        let grid = Grid::new_classic();
        for pos in grid.positions() {
            assert_eq!(grid.candidates_for(pos), DigitSet::all(9));
        }
    }

    #[test]
    fn test_masks_agree_with_scans() {
        let grid = Grid::from_string(PUZZLE).unwrap();
        let masks = SectorMasks::from_grid(&grid);
        for pos in grid.positions() {
            if !grid.is_empty_cell(pos) {
                continue;
            }
            assert_eq!(
                masks.candidates_for(pos),
                grid.candidates_for(pos),
                "mask/scan mismatch at ({},{})",
                pos.row,
                pos.col
            );
            for digit in 1..=9 {
                assert_eq!(masks.is_possible(pos, digit), grid.is_possible(pos, digit));
            }
        }
    }

    #[test]
    fn test_place_unplace_restores_masks() {
        let grid = Grid::from_string(PUZZLE).unwrap();
        let mut masks = SectorMasks::from_grid(&grid);
        let pos = Position::new(0, 2);
        let before = masks.candidates_for(pos);

        masks.place(pos, 4);
        assert!(!masks.is_possible(Position::new(0, 8), 4)); // same row
        assert!(!masks.is_possible(Position::new(8, 2), 4)); // same column
        assert!(!masks.is_possible(Position::new(2, 0), 4)); // same box

        masks.unplace(pos, 4);
        assert_eq!(masks.candidates_for(pos), before);
    }

    #[test]
    fn test_masks_on_small_board() {
        let rows = vec![
            vec![1, 0, 0, 0],
            vec![0, 0, 0, 2],
            vec![0, 3, 0, 0],
            vec![0, 0, 0, 0],
        ];
        let grid = Grid::from_rows(&rows).unwrap();
        let masks = SectorMasks::from_grid(&grid);
        let cands = masks.candidates_for(Position::new(0, 1));
        // Row excludes 1, column excludes 3; box excludes only 1 again.
        assert_eq!(cands.iter().collect::<Vec<_>>(), vec![2, 4]);
    }
}
