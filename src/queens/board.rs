use crate::error::{QueensError, Result};
use std::fmt;

/// An `n × n` chess board. Only the side length is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Board {
    n: usize,
}

impl Board {
    /// # Errors
    ///
    /// [`QueensError::InvalidBoardSize`] when `n == 0`.
    pub fn new(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(QueensError::InvalidBoardSize { size: n });
        }
        Ok(Self { n })
    }

    #[must_use]
    pub const fn size(self) -> usize {
        self.n
    }

    #[must_use]
    pub const fn num_cells(self) -> usize {
        self.n * self.n
    }

    #[must_use]
    pub const fn contains(self, row: isize, col: isize) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.n && (col as usize) < self.n
    }

    /// Every cell in row-major order.
    pub fn cells(self) -> impl Iterator<Item = Cell> {
        let n = self.n;
        (0..n).flat_map(move |row| (0..n).map(move |col| Cell::new(row, col)))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.n, self.n)
    }
}

/// A square, 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Same row, column or diagonal. A cell does not attack itself.
    #[must_use]
    pub const fn attacks(self, other: Self) -> bool {
        if self.row == other.row && self.col == other.col {
            return false;
        }
        self.row == other.row
            || self.col == other.col
            || self.row.abs_diff(other.row) == self.col.abs_diff(other.col)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
