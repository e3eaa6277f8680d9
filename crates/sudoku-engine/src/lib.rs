//! Sudoku engine: grid model, candidate engine, and backtracking solver.
//!
//! The grid is size-parameterized: a box dimension `B` gives an `N = B²`
//! board (classic Sudoku is B=3, N=9). Cells hold 0 for empty or a digit
//! in 1..=N. The solver owns its grid for the duration of a solve.

pub mod candidates;
pub mod solver;

pub use candidates::SectorMasks;
pub use solver::{SolveStatus, Solver};

use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell position on the grid (0-indexed row and column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// A set of candidate digits, stored as a bitmask (bit d-1 = digit d).
///
/// Supports boards up to N=32; iteration yields digits in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DigitSet(u32);

impl DigitSet {
    /// The empty set.
    pub fn empty() -> Self {
        Self(0)
    }

    /// The full set of digits 1..=n.
    pub fn all(n: usize) -> Self {
        debug_assert!(n >= 1 && n <= 32);
        Self(if n == 32 { u32::MAX } else { (1u32 << n) - 1 })
    }

    /// Build a set directly from a raw mask.
    pub fn from_mask(mask: u32) -> Self {
        Self(mask)
    }

    /// The raw bitmask.
    pub fn mask(self) -> u32 {
        self.0
    }

    pub fn contains(self, digit: u8) -> bool {
        digit >= 1 && self.0 & (1 << (digit - 1)) != 0
    }

    pub fn insert(&mut self, digit: u8) {
        debug_assert!(digit >= 1);
        self.0 |= 1 << (digit - 1);
    }

    pub fn remove(&mut self, digit: u8) {
        debug_assert!(digit >= 1);
        self.0 &= !(1 << (digit - 1));
    }

    pub fn count(self) -> u32 {
        self.0.count_ones()
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate the digits in the set, ascending.
    pub fn iter(self) -> impl Iterator<Item = u8> {
        (1..=32u8).filter(move |&d| self.contains(d))
    }
}

/// Errors from grid construction and solver configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Box dimension was zero (N = B² must be at least 1).
    ZeroBoxSize,
    /// Board dimension is not a perfect square, so no box partition tiles it.
    NotSquareBoxable { size: usize },
    /// A row had a different length than the number of rows.
    NotSquare { row: usize, len: usize, expected: usize },
    /// Compact string had the wrong length.
    BadLength { expected: usize, found: usize },
    /// Compact string contained something other than a digit or '.'.
    BadCharacter { index: usize, found: char },
    /// A cell value was outside 0..=N.
    ValueOutOfRange { pos: Position, value: u8 },
    /// Two givens with the same digit share a row, column, or box.
    ConflictingGivens { a: Position, b: Position, digit: u8 },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::ZeroBoxSize => write!(f, "box dimension must be at least 1"),
            GridError::NotSquareBoxable { size } => {
                write!(f, "board dimension {} is not a perfect square", size)
            }
            GridError::NotSquare { row, len, expected } => {
                write!(f, "row {} has {} cells, expected {}", row, len, expected)
            }
            GridError::BadLength { expected, found } => {
                write!(f, "puzzle string has {} characters, expected {}", found, expected)
            }
            GridError::BadCharacter { index, found } => {
                write!(f, "unexpected character {:?} at offset {}", found, index)
            }
            GridError::ValueOutOfRange { pos, value } => {
                write!(f, "value {} at ({},{}) is out of range", value, pos.row, pos.col)
            }
            GridError::ConflictingGivens { a, b, digit } => write!(
                f,
                "digit {} given at both ({},{}) and ({},{})",
                digit, a.row, a.col, b.row, b.col
            ),
        }
    }
}

impl std::error::Error for GridError {}

/// The puzzle board: an N×N matrix of cells, 0 = empty, 1..=N = placed digit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    size: usize,
    box_size: usize,
    cells: Vec<u8>,
}

impl Grid {
    /// Create an empty grid for the given box dimension (N = B²).
    pub fn with_box_size(box_size: usize) -> Result<Self, GridError> {
        if box_size == 0 {
            return Err(GridError::ZeroBoxSize);
        }
        let size = box_size * box_size;
        Ok(Self {
            size,
            box_size,
            cells: vec![0; size * size],
        })
    }

    /// Create an empty classic 9x9 grid with 3x3 boxes.
    pub fn new_classic() -> Self {
        Self::with_box_size(3).expect("classic dimensions are valid")
    }

    /// Build a grid from a row-major matrix. The board dimension is the
    /// number of rows and must be a perfect square.
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self, GridError> {
        let size = rows.len();
        let box_size = (1..=size).find(|b| b * b == size).ok_or(
            if size == 0 {
                GridError::ZeroBoxSize
            } else {
                GridError::NotSquareBoxable { size }
            },
        )?;
        let mut grid = Self::with_box_size(box_size)?;
        for (r, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(GridError::NotSquare {
                    row: r,
                    len: row.len(),
                    expected: size,
                });
            }
            for (c, &value) in row.iter().enumerate() {
                if value as usize > size {
                    return Err(GridError::ValueOutOfRange {
                        pos: Position::new(r, c),
                        value,
                    });
                }
                grid.cells[r * size + c] = value;
            }
        }
        Ok(grid)
    }

    /// Parse a classic 9x9 grid from an 81-character string.
    /// '1'..'9' are givens; '0' and '.' are empty.
    pub fn from_string(s: &str) -> Result<Self, GridError> {
        let mut grid = Self::new_classic();
        let chars: Vec<char> = s.trim().chars().collect();
        if chars.len() != 81 {
            return Err(GridError::BadLength {
                expected: 81,
                found: chars.len(),
            });
        }
        for (i, &ch) in chars.iter().enumerate() {
            grid.cells[i] = match ch {
                '.' | '0' => 0,
                '1'..='9' => ch as u8 - b'0',
                _ => return Err(GridError::BadCharacter { index: i, found: ch }),
            };
        }
        Ok(grid)
    }

    /// Board dimension N.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Box dimension B.
    pub fn box_size(&self) -> usize {
        self.box_size
    }

    fn index(&self, pos: Position) -> usize {
        debug_assert!(pos.row < self.size && pos.col < self.size);
        pos.row * self.size + pos.col
    }

    /// Value at a position, or None if the cell is empty.
    pub fn get(&self, pos: Position) -> Option<u8> {
        match self.cells[self.index(pos)] {
            0 => None,
            v => Some(v),
        }
    }

    /// Set or clear a cell. Does not check legality.
    pub fn set(&mut self, pos: Position, value: Option<u8>) {
        let idx = self.index(pos);
        self.cells[idx] = value.unwrap_or(0);
    }

    pub fn is_empty_cell(&self, pos: Position) -> bool {
        self.cells[self.index(pos)] == 0
    }

    /// Top-left corner of the box containing a position.
    pub fn box_origin(&self, pos: Position) -> Position {
        Position::new(
            pos.row - pos.row % self.box_size,
            pos.col - pos.col % self.box_size,
        )
    }

    /// All positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let n = self.size;
        (0..n).flat_map(move |row| (0..n).map(move |col| Position::new(row, col)))
    }

    /// All currently empty positions, row-major.
    pub fn empty_positions(&self) -> Vec<Position> {
        self.positions().filter(|&p| self.is_empty_cell(p)).collect()
    }

    /// True when every cell holds a digit.
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(|&v| v != 0)
    }

    /// The grid as a row-major matrix, row by row, left to right.
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.cells.chunks(self.size).map(<[u8]>::to_vec).collect()
    }

    /// Compact single-line form: one character per cell, '0' for empty.
    /// Only meaningful for N <= 9.
    pub fn to_string_compact(&self) -> String {
        self.cells.iter().map(|&v| (b'0' + v) as char).collect()
    }

    /// Verify that no two givens with the same digit share a row, column,
    /// or box. The candidate engine itself does not detect upstream
    /// contradictions, so this runs once at solver configuration.
    pub fn check_givens(&self) -> Result<(), GridError> {
        for pos in self.positions() {
            let digit = match self.get(pos) {
                Some(d) => d,
                None => continue,
            };
            for other in self.positions() {
                if other == pos {
                    continue;
                }
                let same_sector = other.row == pos.row
                    || other.col == pos.col
                    || self.box_origin(other) == self.box_origin(pos);
                if same_sector && self.get(other) == Some(digit) {
                    // Report the row-major-first position as `a`.
                    let (a, b) = if self.index(other) < self.index(pos) {
                        (other, pos)
                    } else {
                        (pos, other)
                    };
                    return Err(GridError::ConflictingGivens { a, b, digit });
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.size;
        let b = self.box_size;
        let rule_width = n * 3 + b + 1;
        for row in 0..n {
            if row % b == 0 {
                writeln!(f, "{}", "*".repeat(rule_width))?;
            }
            for col in 0..n {
                if col % b == 0 {
                    write!(f, "|")?;
                }
                match self.get(Position::new(row, col)) {
                    Some(v) => write!(f, " {} ", v)?,
                    None => write!(f, " . ")?,
                }
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "{}", "*".repeat(rule_width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_set_basics() {
        let mut set = DigitSet::empty();
        assert!(set.is_empty());
        set.insert(3);
        set.insert(9);
        set.insert(1);
        assert_eq!(set.count(), 3);
        assert!(set.contains(9));
        assert!(!set.contains(2));
        set.remove(9);
        assert!(!set.contains(9));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_digit_set_all() {
        let all = DigitSet::all(9);
        assert_eq!(all.count(), 9);
        assert_eq!(all.iter().collect::<Vec<_>>(), (1..=9).collect::<Vec<_>>());
        assert!(!all.contains(10));
    }

    #[test]
    fn test_grid_dimensions() {
        let grid = Grid::new_classic();
        assert_eq!(grid.size(), 9);
        assert_eq!(grid.box_size(), 3);

        let small = Grid::with_box_size(2).unwrap();
        assert_eq!(small.size(), 4);

        assert_eq!(Grid::with_box_size(0), Err(GridError::ZeroBoxSize));
    }

    #[test]
    fn test_from_string_roundtrip() {
        let puzzle =
            "530070000600195000098000060800060003400803001700020006060000280000419005000080079";
        let grid = Grid::from_string(puzzle).unwrap();
        assert_eq!(grid.to_string_compact(), puzzle);
        assert_eq!(grid.get(Position::new(0, 0)), Some(5));
        assert_eq!(grid.get(Position::new(0, 2)), None);
    }

    #[test]
    fn test_from_string_accepts_dots() {
        let puzzle = ".".repeat(81);
        let grid = Grid::from_string(&puzzle).unwrap();
        assert_eq!(grid.empty_positions().len(), 81);
    }

    #[test]
    fn test_from_string_rejects_bad_input() {
        assert_eq!(
            Grid::from_string("123"),
            Err(GridError::BadLength { expected: 81, found: 3 })
        );
        let mut bad = "0".repeat(81);
        bad.replace_range(5..6, "x");
        assert_eq!(
            Grid::from_string(&bad),
            Err(GridError::BadCharacter { index: 5, found: 'x' })
        );
    }

    #[test]
    fn test_from_rows_validation() {
        // Ragged row
        let rows = vec![vec![0u8; 4], vec![0u8; 4], vec![0u8; 3], vec![0u8; 4]];
        assert_eq!(
            Grid::from_rows(&rows),
            Err(GridError::NotSquare { row: 2, len: 3, expected: 4 })
        );

        // 5x5 has no box partition
        let rows = vec![vec![0u8; 5]; 5];
        assert_eq!(Grid::from_rows(&rows), Err(GridError::NotSquareBoxable { size: 5 }));

        // Value above N
        let mut rows = vec![vec![0u8; 4]; 4];
        rows[1][2] = 5;
        assert_eq!(
            Grid::from_rows(&rows),
            Err(GridError::ValueOutOfRange { pos: Position::new(1, 2), value: 5 })
        );
    }

    #[test]
    fn test_box_origin() {
        let grid = Grid::new_classic();
        assert_eq!(grid.box_origin(Position::new(4, 7)), Position::new(3, 6));
        assert_eq!(grid.box_origin(Position::new(0, 0)), Position::new(0, 0));
        assert_eq!(grid.box_origin(Position::new(8, 8)), Position::new(6, 6));
    }

    #[test]
    fn test_check_givens_detects_row_conflict() {
        let mut grid = Grid::new_classic();
        grid.set(Position::new(0, 0), Some(5));
        grid.set(Position::new(0, 1), Some(5));
        assert_eq!(
            grid.check_givens(),
            Err(GridError::ConflictingGivens {
                a: Position::new(0, 0),
                b: Position::new(0, 1),
                digit: 5,
            })
        );
    }

    #[test]
    fn test_check_givens_detects_box_conflict() {
        let mut grid = Grid::new_classic();
        // Same box, different row and column.
        grid.set(Position::new(3, 3), Some(7));
        grid.set(Position::new(5, 5), Some(7));
        assert!(grid.check_givens().is_err());
    }

    #[test]
    fn test_check_givens_accepts_valid_puzzle() {
        let grid = Grid::from_string(
            "530070000600195000098000060800060003400803001700020006060000280000419005000080079",
        )
        .unwrap();
        assert!(grid.check_givens().is_ok());
    }

    #[test]
    fn test_to_rows_row_major() {
        let mut grid = Grid::with_box_size(2).unwrap();
        grid.set(Position::new(0, 3), Some(4));
        grid.set(Position::new(2, 1), Some(1));
        let rows = grid.to_rows();
        assert_eq!(rows[0], vec![0, 0, 0, 4]);
        assert_eq!(rows[2], vec![0, 1, 0, 0]);
    }

    #[test]
    fn test_grid_serde_roundtrip() {
        let grid = Grid::from_string(
            "530070000600195000098000060800060003400803001700020006060000280000419005000080079",
        )
        .unwrap();
        let json = serde_json::to_string(&grid).unwrap();
        let back: Grid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, grid);
    }

    #[test]
    fn test_display_has_box_rules() {
        let grid = Grid::new_classic();
        let text = format!("{}", grid);
        // 9 cell rows + 4 horizontal rules
        assert_eq!(text.lines().count(), 13);
        assert!(text.lines().next().unwrap().starts_with('*'));
    }
}
