//! Builds the constraint set of a board for each solver family.
//!
//! The SAT encoding is one boolean per cell with
//!
//! * a coverage clause per row and per column (`2n` clauses)
//! * a binary exclusion clause `¬a ∨ ¬b` per attacking pair `{a, b}`
//!
//! The CP encoding is one row variable per column with three all-different
//! constraints over `q[c]`, `q[c] + c` and `q[c] - c`.

use crate::cp::model::{CpModel, IntVar};
use crate::queens::attack::AttackTable;
use crate::queens::board::Board;
use crate::queens::variables::{BooleanMapping, IntegerMapping};
use crate::sat::clause::Clause;
use crate::sat::cnf::Cnf;
use crate::sat::literal::Literal;
use clap::ValueEnum;
use log::debug;
use std::fmt::Display;

/// How attacking pairs turn into exclusion clauses.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Hash, Default, ValueEnum)]
pub enum PairEncoding {
    /// One clause per unordered pair.
    #[default]
    Unique,
    /// One clause per ordered pair, so every exclusion appears twice.
    Symmetric,
}

impl Display for PairEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unique => write!(f, "unique"),
            Self::Symmetric => write!(f, "symmetric"),
        }
    }
}

/// Clause counts of a SAT encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncodingSize {
    pub variables: usize,
    pub coverage_clauses: usize,
    pub exclusion_clauses: usize,
}

impl EncodingSize {
    #[must_use]
    pub const fn total_clauses(&self) -> usize {
        self.coverage_clauses + self.exclusion_clauses
    }
}

#[derive(Debug, Clone)]
pub struct SatEncoding {
    pub board: Board,
    pub mapping: BooleanMapping,
    pub cnf: Cnf,
    pub size: EncodingSize,
}

#[must_use]
pub fn encode_sat(board: Board, pairs: PairEncoding) -> SatEncoding {
    let n = board.size();
    let mapping = BooleanMapping::new(board);
    let table = AttackTable::new(board);
    let mut cnf = Cnf::with_vars(mapping.num_vars());

    for i in 0..n {
        cnf.add_clause(Clause::new(mapping.row(i).map(|v| Literal::new(v, true))));
        cnf.add_clause(Clause::new(mapping.col(i).map(|v| Literal::new(v, true))));
    }
    let coverage_clauses = cnf.len();

    for (a, attacked) in table.iter() {
        for &b in attacked {
            if pairs == PairEncoding::Unique && b < a {
                continue;
            }
            cnf.add_clause(Clause::new([Literal::new(a, false), Literal::new(b, false)]));
        }
    }

    let size = EncodingSize {
        variables: cnf.num_vars,
        coverage_clauses,
        exclusion_clauses: cnf.len() - coverage_clauses,
    };
    debug!(
        "SAT encoding of {board}: {} variables, {} coverage + {} exclusion clauses ({pairs})",
        size.variables, size.coverage_clauses, size.exclusion_clauses
    );

    SatEncoding {
        board,
        mapping,
        cnf,
        size,
    }
}

#[derive(Debug, Clone)]
pub struct CpEncoding {
    pub board: Board,
    pub model: CpModel,
    /// `columns[c]` is the row of the queen in column `c`.
    pub columns: Vec<IntVar>,
}

#[must_use]
pub fn encode_cp(board: Board) -> CpEncoding {
    let mapping = IntegerMapping::new(board);
    let (lb, ub) = mapping.domain();
    let mut model = CpModel::new();

    let columns: Vec<IntVar> = (0..mapping.num_vars())
        .map(|c| model.new_int_var(lb, ub, mapping.name(c)))
        .collect();

    model.add_all_different(columns.iter().copied());
    model.add_all_different(columns.iter().zip(0_i64..).map(|(q, c)| q.offset(c)));
    model.add_all_different(columns.iter().zip(0_i64..).map(|(q, c)| q.offset(-c)));

    debug!(
        "CP encoding of {board}: {} variables, {} all-different constraints",
        model.num_vars(),
        model.constraints().len()
    );

    CpEncoding {
        board,
        model,
        columns,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cp::model::Constraint;

    fn board(n: usize) -> Board {
        Board::new(n).unwrap()
    }

    #[test]
    fn test_sat_clause_counts() {
        let unique = encode_sat(board(4), PairEncoding::Unique);
        assert_eq!(unique.size.variables, 16);
        assert_eq!(unique.size.coverage_clauses, 8);
        assert_eq!(unique.size.exclusion_clauses, 76);
        assert_eq!(unique.cnf.len(), 84);

        let symmetric = encode_sat(board(4), PairEncoding::Symmetric);
        assert_eq!(symmetric.size.exclusion_clauses, 152);
        assert_eq!(symmetric.size.total_clauses(), 160);
    }

    #[test]
    fn test_single_cell() {
        let enc = encode_sat(board(1), PairEncoding::Unique);
        assert_eq!(enc.cnf.canonical(), vec![vec![1], vec![1]]);
    }

    #[test]
    fn test_coverage_clauses_come_first() {
        let enc = encode_sat(board(3), PairEncoding::Unique);
        assert_eq!(enc.cnf.clauses[0].to_dimacs(), vec![1, 2, 3]);
        assert_eq!(enc.cnf.clauses[1].to_dimacs(), vec![1, 4, 7]);
        assert!(enc.cnf.clauses[6..].iter().all(|c| c.len() == 2));
    }

    #[test]
    fn test_reencoding_is_identical() {
        for n in 1..=7 {
            for pairs in [PairEncoding::Unique, PairEncoding::Symmetric] {
                let a = encode_sat(board(n), pairs);
                let b = encode_sat(board(n), pairs);
                assert_eq!(a.cnf, b.cnf);
                assert_eq!(a.cnf.canonical(), b.cnf.canonical());
            }
            assert_eq!(encode_cp(board(n)).model, encode_cp(board(n)).model);
        }
    }

    #[test]
    fn test_cp_model_shape() {
        let enc = encode_cp(board(5));
        assert_eq!(enc.columns.len(), 5);
        assert_eq!(enc.model.constraints().len(), 3);
        let decl = enc.model.var(enc.columns[2]);
        assert_eq!((decl.lb, decl.ub, decl.name.as_str()), (0, 4, "q2"));

        let Constraint::AllDifferent(diag) = &enc.model.constraints()[2];
        assert_eq!(diag[3].offset, -3);
        // Rows 1, 3, 0, 2 is a 4-queens solution.
        assert!(encode_cp(board(4)).model.verify(&[1, 3, 0, 2]));
        assert!(!encode_cp(board(4)).model.verify(&[0, 1, 2, 3]));
    }
}
