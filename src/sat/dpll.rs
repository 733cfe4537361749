//! Model-enumerating DPLL solver.
//!
//! This module provides the `Dpll` struct, a Davis-Putnam-Logemann-Loveland
//! search over a CNF formula that reports *every* model through a callback
//! instead of stopping at the first one.
//!
//! The core logic involves:
//! 1.  **Unit propagation** with two watched literals per clause. When a watched
//!     literal becomes false the clause looks for a replacement watch; if none
//!     exists the other watch is implied (or the clause is in conflict).
//! 2.  **Decision:** once propagation reaches a fixpoint, the configured
//!     [`VariableSelection`] picks an unassigned variable, which is first tried
//!     as `true`.
//! 3.  **Chronological backtracking:** on a conflict, or after reporting a
//!     model, the most recent decision that has not yet been flipped is undone
//!     and retried with the opposite value. Because every decision is flipped
//!     exactly once the search visits each total model exactly once, so no
//!     blocking clauses are needed and memory stays flat during enumeration.
//!
//! Cancellation is cooperative: the loop polls its [`SearchControl`] before
//! every step and after every reported model.

use crate::control::{EngineStats, SearchControl, SearchStatus};
use crate::sat::assignment::{Assignment, Solutions};
use crate::sat::clause::Clause;
use crate::sat::cnf::Cnf;
use crate::sat::literal::Literal;
use crate::sat::variable_selection::{FixedOrder, VariableSelection};
use log::trace;
use std::time::Duration;

/// A DPLL solver over a fixed formula.
#[derive(Debug)]
pub struct Dpll {
    clauses: Vec<Clause>,
    /// Clause indices watching each literal, keyed by [`Literal::index`].
    watches: Vec<Vec<usize>>,
    /// Single-literal clauses, asserted at level 0 on every run.
    units: Vec<Literal>,
    has_empty_clause: bool,

    assignment: Assignment,
    trail: Vec<Literal>,
    /// Trail position of each decision level's decision literal.
    trail_lim: Vec<usize>,
    /// Whether each level's decision is already the flipped branch.
    flipped: Vec<bool>,
    qhead: usize,

    selector: Box<dyn VariableSelection>,
    control: SearchControl,
    time_limit: Option<Duration>,
    stats: EngineStats,
}

impl Dpll {
    /// A solver with [`FixedOrder`] branching that tries `true` first.
    #[must_use]
    pub fn new(cnf: Cnf) -> Self {
        Self::with_selector(cnf, Box::new(FixedOrder))
    }

    #[must_use]
    pub fn with_selector(cnf: Cnf, selector: Box<dyn VariableSelection>) -> Self {
        let num_vars = cnf.num_vars;
        let mut clauses = Vec::with_capacity(cnf.clauses.len());
        let mut watches = vec![Vec::new(); 2 * (num_vars + 1)];
        let mut units = Vec::new();
        let mut has_empty_clause = false;

        for mut clause in cnf.clauses {
            clause.literals.sort_unstable();
            clause.literals.dedup();
            // Sorted packed literals put `x` and `¬x` next to each other.
            if clause
                .literals
                .windows(2)
                .any(|w| w[0].variable() == w[1].variable())
            {
                continue;
            }

            match clause.len() {
                0 => has_empty_clause = true,
                1 => units.push(clause[0]),
                _ => {
                    let idx = clauses.len();
                    watches[clause[0].index()].push(idx);
                    watches[clause[1].index()].push(idx);
                    clauses.push(clause);
                }
            }
        }

        Self {
            clauses,
            watches,
            units,
            has_empty_clause,
            assignment: Assignment::new(num_vars),
            trail: Vec::with_capacity(num_vars),
            trail_lim: Vec::new(),
            flipped: Vec::new(),
            qhead: 0,
            selector,
            control: SearchControl::new(),
            time_limit: None,
            stats: EngineStats::default(),
        }
    }

    /// Deadline applied from the start of every run.
    #[must_use]
    pub const fn with_time_limit(mut self, limit: Option<Duration>) -> Self {
        self.time_limit = limit;
        self
    }

    /// Handle that stops the current or next run when flipped.
    #[must_use]
    pub fn control(&self) -> SearchControl {
        self.control.clone()
    }

    #[must_use]
    pub const fn stats(&self) -> EngineStats {
        self.stats
    }

    /// Calls `on_model` once per model, in search order.
    ///
    /// The stop flag is cleared when the run starts, so a `stop()` issued from
    /// inside `on_model` ends this run and nothing else.
    pub fn enumerate<F: FnMut(&Solutions)>(&mut self, mut on_model: F) -> SearchStatus {
        if !self.reset() {
            return SearchStatus::Exhausted;
        }

        loop {
            if let Some(status) = self.control.poll() {
                return status;
            }

            if let Some(clause_idx) = self.propagate() {
                trace!("conflict on clause {clause_idx}");
                self.stats.conflicts += 1;
                if !self.backtrack() {
                    return SearchStatus::Exhausted;
                }
                continue;
            }

            match self.selector.pick(&self.assignment) {
                Some(var) => self.decide(Literal::new(var, true)),
                None => {
                    self.stats.solutions += 1;
                    on_model(&self.assignment.get_solutions());

                    if let Some(status) = self.control.poll() {
                        return status;
                    }
                    if !self.backtrack() {
                        return SearchStatus::Exhausted;
                    }
                }
            }
        }
    }

    /// Clears the previous run and asserts the unit clauses at level 0.
    /// Returns `false` when the formula is already contradicted there.
    fn reset(&mut self) -> bool {
        self.control.rearm(self.time_limit);
        self.cancel_until(0);
        for lit in self.trail.drain(..) {
            self.assignment.unassign(lit.variable());
        }
        self.qhead = 0;
        self.stats = EngineStats::default();

        if self.has_empty_clause {
            return false;
        }

        for &unit in &self.units {
            match self.assignment.literal_value(unit) {
                None => {
                    self.assignment.assign(unit);
                    self.trail.push(unit);
                }
                Some(true) => {}
                Some(false) => return false,
            }
        }
        true
    }

    fn decide(&mut self, lit: Literal) {
        self.stats.decisions += 1;
        self.trail_lim.push(self.trail.len());
        self.flipped.push(false);
        self.assignment.assign(lit);
        self.trail.push(lit);
    }

    /// Undoes every level at or above `level`.
    fn cancel_until(&mut self, level: usize) {
        if self.trail_lim.len() > level {
            let start = self.trail_lim[level];
            for lit in self.trail.drain(start..) {
                self.assignment.unassign(lit.variable());
            }
            self.trail_lim.truncate(level);
            self.flipped.truncate(level);
        }
        self.qhead = self.trail.len();
    }

    /// Flips the deepest unflipped decision. `false` once the tree is exhausted.
    fn backtrack(&mut self) -> bool {
        while let Some(&was_flipped) = self.flipped.last() {
            let level = self.flipped.len() - 1;
            let decision = self.trail[self.trail_lim[level]];
            self.cancel_until(level);

            if !was_flipped {
                let lit = decision.negated();
                self.trail_lim.push(self.trail.len());
                self.flipped.push(true);
                self.assignment.assign(lit);
                self.trail.push(lit);
                return true;
            }
        }
        false
    }

    /// Propagates the trail from `qhead`. Returns the index of a falsified
    /// clause, if any.
    fn propagate(&mut self) -> Option<usize> {
        while self.qhead < self.trail.len() {
            let false_lit = self.trail[self.qhead].negated();
            self.qhead += 1;

            let mut watchers = std::mem::take(&mut self.watches[false_lit.index()]);
            let mut conflict = None;
            let mut i = 0;

            while i < watchers.len() {
                let clause_idx = watchers[i];
                let clause = &mut self.clauses[clause_idx];
                if clause[0] == false_lit {
                    clause.swap(0, 1);
                }

                let first = clause[0];
                if self.assignment.literal_value(first) == Some(true) {
                    i += 1;
                    continue;
                }

                let replacement = (2..clause.len())
                    .find(|&k| self.assignment.literal_value(clause[k]) != Some(false));
                if let Some(k) = replacement {
                    clause.swap(1, k);
                    self.watches[clause[1].index()].push(clause_idx);
                    watchers.swap_remove(i);
                    continue;
                }

                if self.assignment.literal_value(first) == Some(false) {
                    conflict = Some(clause_idx);
                    break;
                }

                self.stats.propagations += 1;
                self.assignment.assign(first);
                self.trail.push(first);
                i += 1;
            }

            self.watches[false_lit.index()] = watchers;
            if conflict.is_some() {
                return conflict;
            }
        }

        None
    }
}
