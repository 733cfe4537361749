//! Cells in mutual attack.
//!
//! [`attacked`] computes one cell's attack set directly from the board size.
//! [`AttackTable`] computes every cell's attack list once per board by walking
//! the eight ray directions, and is what the clause builder uses.

use crate::queens::board::{Board, Cell};
use crate::queens::variables::BooleanMapping;
use crate::sat::literal::Variable;
use rustc_hash::FxHashSet;

/// Ids of every cell sharing a row, column or diagonal with `cell`, excluding
/// `cell` itself.
#[must_use]
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
pub fn attacked(board: Board, cell: Cell) -> FxHashSet<Variable> {
    let mapping = BooleanMapping::new(board);
    let mut set: FxHashSet<Variable> = mapping
        .row(cell.row)
        .chain(mapping.col(cell.col))
        .collect();

    let (r, c) = (cell.row as isize, cell.col as isize);
    for i in 0..board.size() as isize {
        for (row, col) in [(r + i, c + i), (r + i, c - i), (r - i, c + i), (r - i, c - i)] {
            if board.contains(row, col) {
                set.insert(mapping.id(row as usize, col as usize));
            }
        }
    }

    set.remove(&mapping.cell_id(cell));
    set
}

const DIRECTIONS: [(isize, isize); 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Precomputed attack lists for every cell of one board, sorted by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackTable {
    board: Board,
    /// Indexed by `id - 1`.
    lists: Vec<Vec<Variable>>,
}

impl AttackTable {
    #[must_use]
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub fn new(board: Board) -> Self {
        let mapping = BooleanMapping::new(board);
        let lists = board
            .cells()
            .map(|cell| {
                let mut list = Vec::with_capacity(4 * board.size());
                let origin = (cell.row as isize, cell.col as isize);
                for (dr, dc) in DIRECTIONS {
                    let (mut row, mut col) = (origin.0 + dr, origin.1 + dc);
                    while board.contains(row, col) {
                        list.push(mapping.id(row as usize, col as usize));
                        row += dr;
                        col += dc;
                    }
                }
                list.sort_unstable();
                list
            })
            .collect();

        Self { board, lists }
    }

    #[must_use]
    pub const fn board(&self) -> Board {
        self.board
    }

    #[must_use]
    pub fn attacks(&self, id: Variable) -> &[Variable] {
        &self.lists[id as usize - 1]
    }

    /// `(id, attack list)` for every cell, in id order.
    pub fn iter(&self) -> impl Iterator<Item = (Variable, &[Variable])> {
        (1..).zip(self.lists.iter().map(Vec::as_slice))
    }

    /// Total number of ordered attacking pairs.
    #[must_use]
    pub fn num_ordered_pairs(&self) -> usize {
        self.lists.iter().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_corner_of_four() {
        let board = Board::new(4).unwrap();
        let set = attacked(board, Cell::new(0, 0));
        let mut ids: Vec<_> = set.into_iter().collect();
        ids.sort_unstable();
        // Row 0, column 0 and the main diagonal.
        assert_eq!(ids, vec![2, 3, 4, 5, 6, 9, 11, 13, 16]);
    }

    #[test]
    fn test_single_cell_board() {
        let board = Board::new(1).unwrap();
        assert!(attacked(board, Cell::new(0, 0)).is_empty());
        assert_eq!(AttackTable::new(board).num_ordered_pairs(), 0);
    }

    #[test]
    fn test_pair_count() {
        // n(n-1)(5n-1)/3 unordered pairs, each seen from both ends.
        for n in 1..=9 {
            let table = AttackTable::new(Board::new(n).unwrap());
            let expected = 2 * n * (n - 1) * (5 * n - 1) / 3;
            assert_eq!(table.num_ordered_pairs(), expected, "n = {n}");
        }
    }

    proptest! {
        #[test]
        fn prop_table_matches_direct_computation(n in 1usize..12, seed in 0usize..144) {
            let board = Board::new(n).unwrap();
            let table = AttackTable::new(board);
            let cell = Cell::new(seed % n, (seed / n) % n);
            let id = BooleanMapping::new(board).cell_id(cell);

            let from_table: FxHashSet<Variable> = table.attacks(id).iter().copied().collect();
            prop_assert_eq!(from_table, attacked(board, cell));
        }

        #[test]
        fn prop_attack_is_symmetric(n in 1usize..12, a in 0usize..144, b in 0usize..144) {
            let board = Board::new(n).unwrap();
            let mapping = BooleanMapping::new(board);
            let x = Cell::new(a % n, (a / n) % n);
            let y = Cell::new(b % n, (b / n) % n);

            let x_hits_y = attacked(board, x).contains(&mapping.cell_id(y));
            let y_hits_x = attacked(board, y).contains(&mapping.cell_id(x));
            prop_assert_eq!(x_hits_y, y_hits_x);
            prop_assert_eq!(x_hits_y, x.attacks(y));
        }
    }
}
