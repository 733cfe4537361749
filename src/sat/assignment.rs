use crate::sat::literal::{Literal, Variable};
use core::ops::{Index, IndexMut};
use itertools::Itertools;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Copy, Default, Hash, PartialOrd, Ord)]
pub enum VarState {
    #[default]
    Unassigned,
    Assigned(bool),
}

impl VarState {
    #[must_use]
    pub const fn is_assigned(self) -> bool {
        matches!(self, Self::Assigned(_))
    }

    #[must_use]
    pub const fn is_unassigned(self) -> bool {
        !self.is_assigned()
    }

    #[must_use]
    pub const fn is_true(self) -> bool {
        matches!(self, Self::Assigned(true))
    }
}

/// Partial assignment, indexed by variable id. Slot 0 is unused.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assignment(Vec<VarState>);

impl Index<usize> for Assignment {
    type Output = VarState;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IndexMut<usize> for Assignment {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl Assignment {
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self(vec![VarState::Unassigned; num_vars + 1])
    }

    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.0.len() - 1
    }

    pub fn assign(&mut self, lit: Literal) {
        self.0[lit.variable() as usize] = VarState::Assigned(lit.polarity());
    }

    pub fn unassign(&mut self, var: Variable) {
        self.0[var as usize] = VarState::Unassigned;
    }

    #[must_use]
    pub fn var_value(&self, var: Variable) -> Option<bool> {
        match self.0.get(var as usize) {
            Some(VarState::Assigned(b)) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn literal_value(&self, lit: Literal) -> Option<bool> {
        self.var_value(lit.variable())
            .map(|b| if lit.polarity() { b } else { !b })
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.0.iter().skip(1).all(|s| s.is_assigned())
    }

    /// Snapshot of the current (total) assignment as signed DIMACS literals.
    /// Unassigned variables are reported false.
    #[must_use]
    pub fn get_solutions(&self) -> Solutions {
        let model = self
            .0
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, s)| {
                #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
                let var = i as i32;
                if s.is_true() { var } else { -var }
            })
            .collect();
        Solutions(model)
    }
}

/// A model: one signed literal per variable, in variable order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct Solutions(Vec<i32>);

impl Solutions {
    #[must_use]
    pub fn new(literals: &[i32]) -> Self {
        Self(literals.to_vec())
    }

    /// Whether the signed literal `lit` holds in this model.
    #[must_use]
    pub fn check(&self, lit: i32) -> bool {
        let Ok(var) = usize::try_from(lit.unsigned_abs()) else {
            return false;
        };
        var >= 1 && self.0.get(var - 1) == Some(&lit)
    }

    /// Ids of the variables set to true.
    pub fn positives(&self) -> impl Iterator<Item = i32> + '_ {
        self.0.iter().copied().filter(|&l| l > 0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &i32> {
        self.0.iter()
    }
}

impl fmt::Display for Solutions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_and_values() {
        let mut a = Assignment::new(3);
        assert_eq!(a.num_vars(), 3);
        a.assign(Literal::new(2, false));

        assert_eq!(a.var_value(2), Some(false));
        assert_eq!(a.literal_value(Literal::new(2, false)), Some(true));
        assert_eq!(a.literal_value(Literal::new(2, true)), Some(false));
        assert_eq!(a.var_value(1), None);
        assert!(!a.is_complete());

        a.unassign(2);
        assert!(a[2].is_unassigned());
    }

    #[test]
    fn test_get_solutions_is_signed() {
        let mut a = Assignment::new(3);
        a.assign(Literal::new(1, true));
        a.assign(Literal::new(2, false));
        a.assign(Literal::new(3, true));

        let sol = a.get_solutions();
        assert_eq!(sol, Solutions::new(&[1, -2, 3]));
        assert!(sol.check(1));
        assert!(sol.check(-2));
        assert!(!sol.check(2));
        assert!(!sol.check(4));
        assert_eq!(sol.positives().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(sol.to_string(), "1 -2 3");
    }
}
