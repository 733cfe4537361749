//! Depth-first search with forward checking over a [`CpModel`].
//!
//! Each all-different over views `x + a` and `y + b` is compiled into binary
//! "neighbour" edges: fixing `x = v` removes `v + a - b` from `y`. Values are
//! tried in increasing order and variables in a fixed order (declaration
//! order unless shuffled), so the search is deterministic for a given model.

use crate::control::{EngineStats, SearchControl, SearchStatus};
use crate::cp::domain::Domains;
use crate::cp::model::{Constraint, CpModel};
use log::trace;
use std::time::Duration;

#[derive(Debug)]
pub struct CpSearch {
    model: CpModel,
    domains: Domains,
    /// `neighbors[x]` holds `(y, delta)`: `x = v` forbids `y = v + delta`.
    neighbors: Vec<Vec<(usize, i64)>>,
    /// Some view pair can never differ, e.g. `x` listed twice in one constraint.
    infeasible: bool,
    values: Vec<Option<i64>>,
    /// Branching order over variable indices.
    order: Vec<usize>,
    control: SearchControl,
    time_limit: Option<Duration>,
    stats: EngineStats,
}

impl CpSearch {
    #[must_use]
    pub fn new(model: CpModel) -> Self {
        let n = model.num_vars();
        let mut neighbors = vec![Vec::new(); n];
        let mut infeasible = false;

        for constraint in model.constraints() {
            let Constraint::AllDifferent(views) = constraint;
            for (i, a) in views.iter().enumerate() {
                for b in &views[i + 1..] {
                    let (x, y) = (a.var.index(), b.var.index());
                    if x == y {
                        infeasible |= a.offset == b.offset;
                        continue;
                    }
                    neighbors[x].push((y, a.offset - b.offset));
                    neighbors[y].push((x, b.offset - a.offset));
                }
            }
        }

        Self {
            domains: Domains::new(&model),
            model,
            neighbors,
            infeasible,
            values: vec![None; n],
            order: (0..n).collect(),
            control: SearchControl::new(),
            time_limit: None,
            stats: EngineStats::default(),
        }
    }

    /// Branches in a seeded random permutation of the variables.
    #[must_use]
    pub fn with_random_order(mut self, seed: u64) -> Self {
        fastrand::Rng::with_seed(seed).shuffle(&mut self.order);
        self
    }

    #[must_use]
    pub const fn with_time_limit(mut self, limit: Option<Duration>) -> Self {
        self.time_limit = limit;
        self
    }

    #[must_use]
    pub fn control(&self) -> SearchControl {
        self.control.clone()
    }

    #[must_use]
    pub const fn stats(&self) -> EngineStats {
        self.stats
    }

    #[must_use]
    pub const fn model(&self) -> &CpModel {
        &self.model
    }

    /// Calls `on_solution` with every solution's values, indexed by variable.
    pub fn enumerate<F: FnMut(&[i64])>(&mut self, mut on_solution: F) -> SearchStatus {
        self.control.rearm(self.time_limit);
        self.domains.restore(0);
        self.values.fill(None);
        self.stats = EngineStats::default();

        if self.infeasible || self.domains.any_empty() {
            return SearchStatus::Exhausted;
        }

        self.search(&mut on_solution)
            .unwrap_or(SearchStatus::Exhausted)
    }

    fn select(&self) -> Option<usize> {
        self.order
            .iter()
            .copied()
            .find(|&x| self.values[x].is_none())
    }

    /// `Some(status)` when the whole search must unwind.
    fn search(&mut self, on_solution: &mut dyn FnMut(&[i64])) -> Option<SearchStatus> {
        if let Some(status) = self.control.poll() {
            return Some(status);
        }

        let Some(var) = self.select() else {
            self.stats.solutions += 1;
            let solution: Vec<i64> = self.values.iter().map(|v| v.unwrap_or_default()).collect();
            trace!("solution {solution:?}");
            on_solution(&solution);
            return self.control.poll();
        };

        let candidates: Vec<i64> = self.domains.values(var).collect();
        for value in candidates {
            self.stats.decisions += 1;
            let mark = self.domains.checkpoint();
            self.values[var] = Some(value);

            let outcome = if self.forward_check(var, value) {
                self.search(on_solution)
            } else {
                self.stats.conflicts += 1;
                None
            };

            self.values[var] = None;
            self.domains.restore(mark);
            if outcome.is_some() {
                return outcome;
            }
        }
        None
    }

    /// Prunes the neighbours of `var = value`. `false` on a wipe-out.
    fn forward_check(&mut self, var: usize, value: i64) -> bool {
        let Self {
            neighbors,
            domains,
            values,
            stats,
            ..
        } = self;

        for &(other, delta) in &neighbors[var] {
            if values[other].is_some() {
                continue;
            }
            if domains.remove(other, value + delta) {
                stats.propagations += 1;
                if domains.size(other) == 0 {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queens(n: i64) -> CpModel {
        let mut model = CpModel::new();
        let q: Vec<_> = (0..n)
            .map(|i| model.new_int_var(0, n - 1, format!("q{i}")))
            .collect();
        model.add_all_different(q.iter().copied());
        model.add_all_different(q.iter().zip(0..).map(|(v, i)| v.offset(i)));
        model.add_all_different(q.iter().zip(0..).map(|(v, i)| v.offset(-i)));
        model
    }

    fn count(model: CpModel, seed: Option<u64>) -> usize {
        let mut search = CpSearch::new(model.clone());
        if let Some(seed) = seed {
            search = search.with_random_order(seed);
        }
        let mut found = 0;
        let status = search.enumerate(|values| {
            assert!(model.verify(values), "{values:?}");
            found += 1;
        });
        assert_eq!(status, SearchStatus::Exhausted);
        found
    }

    #[test]
    fn test_queens_counts() {
        for (n, expected) in [(1, 1), (2, 0), (3, 0), (4, 2), (5, 10), (6, 4)] {
            assert_eq!(count(queens(n), None), expected, "n = {n}");
            assert_eq!(count(queens(n), Some(7)), expected, "n = {n}");
        }
    }

    #[test]
    fn test_repeated_variable_in_constraint() {
        let mut model = CpModel::new();
        let x = model.new_int_var(0, 1, "x");
        model.add_all_different([x, x]);
        assert_eq!(count(model, None), 0);

        let mut model = CpModel::new();
        let x = model.new_int_var(0, 1, "x");
        model.add_all_different([x.offset(0), x.offset(1)]);
        assert_eq!(count(model, None), 2);
    }

    #[test]
    fn test_stop_and_rerun() {
        let mut search = CpSearch::new(queens(8));
        let control = search.control();
        let mut first = None;
        let status = search.enumerate(|values| {
            first = Some(values.to_vec());
            control.stop();
        });
        assert_eq!(status, SearchStatus::Stopped);
        assert!(search.model().verify(&first.unwrap()));
        assert_eq!(search.stats().solutions, 1);

        let mut total = 0;
        assert_eq!(search.enumerate(|_| total += 1), SearchStatus::Exhausted);
        assert_eq!(total, 92);
    }

    #[test]
    fn test_time_limit() {
        let mut search = CpSearch::new(queens(10)).with_time_limit(Some(Duration::ZERO));
        assert_eq!(search.enumerate(|_| {}), SearchStatus::TimedOut);
    }
}
