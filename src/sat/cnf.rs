#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Formulas in conjunctive normal form.

use crate::sat::assignment::Solutions;
use crate::sat::clause::Clause;
use crate::sat::literal::Literal;
use itertools::Itertools;
use std::fmt;

/// A CNF formula over variables `1..=num_vars`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cnf {
    pub clauses: Vec<Clause>,
    /// Highest variable id in use.
    pub num_vars: usize,
}

impl Cnf {
    /// Builds a formula from DIMACS-style clauses.
    pub fn new<I, C>(clauses: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Clause>,
    {
        let mut cnf = Self::default();
        for clause in clauses {
            cnf.add_clause(clause.into());
        }
        cnf
    }

    /// An empty formula that already declares `num_vars` variables, so that
    /// variables absent from every clause still appear in models.
    #[must_use]
    pub const fn with_vars(num_vars: usize) -> Self {
        Self {
            clauses: Vec::new(),
            num_vars,
        }
    }

    pub fn add_clause(&mut self, clause: Clause) {
        if let Some(max) = clause.iter().map(|l| l.variable() as usize).max() {
            self.num_vars = self.num_vars.max(max);
        }
        self.clauses.push(clause);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter()
    }

    /// Total number of literal occurrences.
    #[must_use]
    pub fn num_literals(&self) -> usize {
        self.clauses.iter().map(Clause::len).sum()
    }

    /// Checks every clause against a model.
    #[must_use]
    pub fn verify(&self, solutions: &Solutions) -> bool {
        self.iter()
            .all(|clause| clause.is_satisfied_by(|l: Literal| solutions.check(l.to_i32())))
    }

    /// The clauses as sorted DIMACS literal lists, sorted themselves; two
    /// formulas with equal canonical forms contain the same clause multiset.
    #[must_use]
    pub fn canonical(&self) -> Vec<Vec<i32>> {
        self.iter()
            .map(|c| c.to_dimacs().into_iter().sorted_unstable().collect_vec())
            .sorted_unstable()
            .collect()
    }
}

impl fmt::Display for Cnf {
    /// DIMACS rendering, including the `p cnf` header.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "p cnf {} {}", self.num_vars, self.clauses.len())?;
        for clause in &self.clauses {
            writeln!(f, "{} 0", clause.iter().join(" "))?;
        }
        Ok(())
    }
}
