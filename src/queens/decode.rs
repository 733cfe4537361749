//! Raw solver assignments to validated queen placements.

use crate::error::{QueensError, Result};
use crate::queens::adapter::Assignment;
use crate::queens::board::{Board, Cell};
use crate::queens::variables::BooleanMapping;
use itertools::Itertools;
use std::fmt;

/// A full placement: `rows[col]` is the row of the queen in column `col`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Placement {
    rows: Vec<usize>,
}

impl Placement {
    /// Wraps `rows` without checking it. See [`Placement::validate`].
    #[must_use]
    pub const fn new(rows: Vec<usize>) -> Self {
        Self { rows }
    }

    #[must_use]
    pub fn board_size(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    #[must_use]
    pub fn row_of(&self, col: usize) -> Option<usize> {
        self.rows.get(col).copied()
    }

    pub fn queens(&self) -> impl Iterator<Item = Cell> + Clone + '_ {
        self.rows
            .iter()
            .enumerate()
            .map(|(col, &row)| Cell::new(row, col))
    }

    /// Checks one queen per row and column and no shared diagonal.
    ///
    /// # Errors
    ///
    /// [`QueensError::MalformedAssignment`] describing the first violation.
    pub fn validate(&self, board: Board) -> Result<()> {
        let n = board.size();
        if self.rows.len() != n {
            return Err(QueensError::malformed(
                n,
                format!("placement has {} columns", self.rows.len()),
            ));
        }
        if let Some(col) = self.rows.iter().position(|&r| r >= n) {
            return Err(QueensError::malformed(
                n,
                format!("row {} of column {col} is off the board", self.rows[col]),
            ));
        }
        if let Some((a, b)) = self
            .queens()
            .tuple_combinations()
            .find(|&(a, b): &(Cell, Cell)| a.attacks(b))
        {
            return Err(QueensError::malformed(
                n,
                format!("queens {a} and {b} attack each other"),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Placement {
    /// One line per board row, `Q` for a queen and `.` for an empty square.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows.len() {
            let line: String = self
                .rows
                .iter()
                .map(|&r| if r == row { 'Q' } else { '.' })
                .collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Decodes and validates an assignment for `board`.
///
/// Boolean assignments must set exactly one variable per column. Integer
/// assignments must hold one in-range row per column.
///
/// # Errors
///
/// [`QueensError::MalformedAssignment`] if the assignment does not describe a
/// valid placement.
pub fn decode(board: Board, assignment: &Assignment) -> Result<Placement> {
    let n = board.size();
    let placement = match assignment {
        Assignment::Boolean(model) => {
            let mapping = BooleanMapping::new(board);
            let mut rows = vec![None; n];
            for id in model.positives() {
                let cell = u32::try_from(id)
                    .ok()
                    .and_then(|id| mapping.cell(id))
                    .ok_or_else(|| {
                        QueensError::malformed(n, format!("variable {id} is off the board"))
                    })?;
                if rows[cell.col].replace(cell.row).is_some() {
                    return Err(QueensError::malformed(
                        n,
                        format!("column {} holds several queens", cell.col),
                    ));
                }
            }
            let rows = rows
                .into_iter()
                .enumerate()
                .map(|(col, row)| {
                    row.ok_or_else(|| {
                        QueensError::malformed(n, format!("column {col} holds no queen"))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Placement::new(rows)
        }
        Assignment::Integer(values) => {
            if values.len() != n {
                return Err(QueensError::malformed(
                    n,
                    format!("expected {n} column values, got {}", values.len()),
                ));
            }
            let rows = values
                .iter()
                .enumerate()
                .map(|(col, &v)| {
                    usize::try_from(v)
                        .ok()
                        .filter(|&r| r < n)
                        .ok_or_else(|| {
                            QueensError::malformed(n, format!("column {col} has row {v}"))
                        })
                })
                .collect::<Result<Vec<_>>>()?;
            Placement::new(rows)
        }
    };

    placement.validate(board)?;
    Ok(placement)
}
