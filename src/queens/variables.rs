//! Board cells to solver variables and back.
//!
//! Both schemes are pure functions of the board size: encoding the same board
//! twice yields the same ids.

use crate::queens::board::{Board, Cell};
use crate::sat::literal::Variable;

/// One boolean per cell, `id = row * n + col + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BooleanMapping {
    board: Board,
}

impl BooleanMapping {
    #[must_use]
    pub const fn new(board: Board) -> Self {
        Self { board }
    }

    #[must_use]
    pub const fn num_vars(self) -> usize {
        self.board.num_cells()
    }

    /// Id of the variable "a queen stands on `(row, col)`".
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn id(self, row: usize, col: usize) -> Variable {
        (row * self.board.size() + col + 1) as Variable
    }

    #[must_use]
    pub const fn cell_id(self, cell: Cell) -> Variable {
        self.id(cell.row, cell.col)
    }

    /// Inverse of [`Self::id`]. `None` for ids outside the board.
    #[must_use]
    pub const fn cell(self, id: Variable) -> Option<Cell> {
        let id = id as usize;
        if id == 0 || id > self.board.num_cells() {
            return None;
        }
        let n = self.board.size();
        Some(Cell::new((id - 1) / n, (id - 1) % n))
    }

    pub fn row(self, row: usize) -> impl Iterator<Item = Variable> {
        (0..self.board.size()).map(move |col| self.id(row, col))
    }

    pub fn col(self, col: usize) -> impl Iterator<Item = Variable> {
        (0..self.board.size()).map(move |row| self.id(row, col))
    }
}

/// One integer per column holding the row of that column's queen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegerMapping {
    board: Board,
}

impl IntegerMapping {
    #[must_use]
    pub const fn new(board: Board) -> Self {
        Self { board }
    }

    #[must_use]
    pub const fn num_vars(self) -> usize {
        self.board.size()
    }

    /// Inclusive row domain of every column variable.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn domain(self) -> (i64, i64) {
        (0, self.board.size() as i64 - 1)
    }

    #[must_use]
    pub fn name(self, col: usize) -> String {
        format!("q{col}")
    }
}
