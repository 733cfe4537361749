#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Boolean literals packed as `2 * var + negated`.
//!
//! The packed form doubles as a dense index, which is what the watch lists
//! in [`crate::sat::dpll`] are keyed by.

use core::ops::{Neg, Not};
use std::fmt;

/// A variable id, 1-based as in DIMACS.
pub type Variable = u32;

/// A possibly negated variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Literal(u32);

impl Literal {
    /// Builds the literal `var` (`polarity == true`) or `¬var`.
    #[must_use]
    pub const fn new(var: Variable, polarity: bool) -> Self {
        if polarity {
            Self(var * 2)
        } else {
            Self(var * 2 + 1)
        }
    }

    #[must_use]
    pub const fn variable(self) -> Variable {
        self.0 / 2
    }

    /// `true` for a positive literal.
    #[must_use]
    pub const fn polarity(self) -> bool {
        self.0 % 2 == 0
    }

    #[must_use]
    pub const fn is_negated(self) -> bool {
        !self.polarity()
    }

    #[must_use]
    pub const fn negated(self) -> Self {
        Self(self.0 ^ 1)
    }

    /// Dense index, unique per literal.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Converts a DIMACS literal. `0` is not a literal and is rejected.
    #[must_use]
    pub const fn from_i32(value: i32) -> Option<Self> {
        if value == 0 {
            return None;
        }
        Some(Self::new(value.unsigned_abs(), value > 0))
    }

    /// DIMACS form of the literal. Ids above `i32::MAX` wrap, so formulas
    /// must keep their ids in range.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn to_i32(self) -> i32 {
        let var = self.variable() as i32;
        if self.polarity() { var } else { -var }
    }
}

impl Neg for Literal {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.negated()
    }
}

impl Not for Literal {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.negated()
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.polarity() {
            write!(f, "{}", self.variable())
        } else {
            write!(f, "-{}", self.variable())
        }
    }
}
