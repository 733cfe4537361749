use crate::sat::literal::Literal;
use core::ops::{Index, IndexMut};
use smallvec::SmallVec;

/// Inline capacity of a clause; every N-Queens exclusion clause fits.
pub type LiteralStorage = SmallVec<[Literal; 8]>;

/// A disjunction of literals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Clause {
    pub literals: LiteralStorage,
}

impl Clause {
    pub fn new<I: IntoIterator<Item = Literal>>(literals: I) -> Self {
        Self {
            literals: literals.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    #[must_use]
    pub fn is_unit(&self) -> bool {
        self.len() == 1
    }

    pub fn iter(&self) -> impl Iterator<Item = &Literal> {
        self.literals.iter()
    }

    pub fn swap(&mut self, i: usize, j: usize) {
        self.literals.swap(i, j);
    }

    /// Whether the clause is satisfied by the given truth function.
    pub fn is_satisfied_by<F: Fn(Literal) -> bool>(&self, value: F) -> bool {
        self.iter().any(|&l| value(l))
    }

    /// DIMACS literals of the clause, in stored order.
    #[must_use]
    pub fn to_dimacs(&self) -> Vec<i32> {
        self.iter().map(|l| l.to_i32()).collect()
    }
}

impl Index<usize> for Clause {
    type Output = Literal;

    fn index(&self, index: usize) -> &Self::Output {
        &self.literals[index]
    }
}

impl IndexMut<usize> for Clause {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.literals[index]
    }
}

impl From<&[i32]> for Clause {
    /// Zeroes are dropped, mirroring DIMACS clause terminators.
    fn from(literals: &[i32]) -> Self {
        Self::new(literals.iter().filter_map(|&l| Literal::from_i32(l)))
    }
}

impl From<Vec<i32>> for Clause {
    fn from(literals: Vec<i32>) -> Self {
        Self::from(literals.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let clause = Clause::from(vec![1, -2, 3]);
        assert_eq!(clause.len(), 3);
        assert!(!clause.is_unit());
        assert_eq!(clause.to_dimacs(), vec![1, -2, 3]);
    }

    #[test]
    fn test_zero_terminator_dropped() {
        let clause = Clause::from(vec![4, 0]);
        assert!(clause.is_unit());
        assert_eq!(clause[0], Literal::new(4, true));
    }

    #[test]
    fn test_swap() {
        let mut clause = Clause::from(vec![1, 2, 3]);
        clause.swap(0, 2);
        assert_eq!(clause.to_dimacs(), vec![3, 2, 1]);
    }

    #[test]
    fn test_is_satisfied_by() {
        let clause = Clause::from(vec![-1, -2]);
        assert!(clause.is_satisfied_by(|l| l == Literal::new(2, false)));
        assert!(!clause.is_satisfied_by(|l| l.polarity()));
    }
}
