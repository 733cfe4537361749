#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Branching variable order for the DPLL enumerator.

use crate::sat::assignment::Assignment;
use crate::sat::literal::Variable;
use std::fmt::Debug;

pub trait VariableSelection: Debug {
    /// Next unassigned variable, or `None` when the assignment is total.
    fn pick(&self, assignment: &Assignment) -> Option<Variable>;
}

/// Lowest unassigned id first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FixedOrder;

impl VariableSelection for FixedOrder {
    fn pick(&self, assignment: &Assignment) -> Option<Variable> {
        (1..=assignment.num_vars())
            .find(|&i| assignment[i].is_unassigned())
            .and_then(|i| Variable::try_from(i).ok())
    }
}

/// A fixed random permutation of the variables, drawn once from a seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomOrder(Vec<Variable>);

impl RandomOrder {
    #[must_use]
    pub fn new(num_vars: usize, seed: u64) -> Self {
        let mut rng = fastrand::Rng::with_seed(seed);
        #[allow(clippy::cast_possible_truncation)]
        let mut order: Vec<Variable> = (1..=num_vars as Variable).collect();
        rng.shuffle(&mut order);
        Self(order)
    }
}

impl VariableSelection for RandomOrder {
    fn pick(&self, assignment: &Assignment) -> Option<Variable> {
        self.0
            .iter()
            .copied()
            .find(|&v| assignment[v as usize].is_unassigned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::literal::Literal;

    #[test]
    fn test_fixed_order_picks_lowest() {
        let mut a = Assignment::new(3);
        assert_eq!(FixedOrder.pick(&a), Some(1));
        a.assign(Literal::new(1, true));
        assert_eq!(FixedOrder.pick(&a), Some(2));
        a.assign(Literal::new(2, true));
        a.assign(Literal::new(3, false));
        assert_eq!(FixedOrder.pick(&a), None);
    }

    #[test]
    fn test_random_order_is_a_permutation() {
        let order = RandomOrder::new(20, 7);
        let mut seen = order.0.clone();
        seen.sort_unstable();
        assert_eq!(seen, (1..=20).collect::<Vec<_>>());
        assert_eq!(order, RandomOrder::new(20, 7));
    }

    #[test]
    fn test_random_order_skips_assigned() {
        let order = RandomOrder::new(2, 1);
        let mut a = Assignment::new(2);
        let first = order.pick(&a).unwrap();
        a.assign(Literal::new(first, true));
        let second = order.pick(&a).unwrap();
        assert_ne!(first, second);
        a.assign(Literal::new(second, true));
        assert_eq!(order.pick(&a), None);
    }
}
