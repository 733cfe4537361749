//! Integer variables, affine views and all-different constraints.

use itertools::Itertools;
use std::fmt;

/// Handle to an integer variable declared in a [`CpModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IntVar(usize);

impl IntVar {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }

    /// The view `self + offset`.
    #[must_use]
    pub const fn offset(self, offset: i64) -> IntView {
        IntView { var: self, offset }
    }
}

/// `var + offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntView {
    pub var: IntVar,
    pub offset: i64,
}

impl From<IntVar> for IntView {
    fn from(var: IntVar) -> Self {
        var.offset(0)
    }
}

impl fmt::Display for IntView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.offset {
            0 => write!(f, "x{}", self.var.0),
            o if o > 0 => write!(f, "x{} + {o}", self.var.0),
            o => write!(f, "x{} - {}", self.var.0, o.unsigned_abs()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// Pairwise distinct view values.
    AllDifferent(Vec<IntView>),
}

impl Constraint {
    #[must_use]
    pub fn is_satisfied_by(&self, values: &[i64]) -> bool {
        match self {
            Self::AllDifferent(views) => views
                .iter()
                .map(|v| values[v.var.0] + v.offset)
                .all_unique(),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllDifferent(views) => write!(f, "all_different({})", views.iter().join(", ")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarDecl {
    pub lb: i64,
    pub ub: i64,
    pub name: String,
}

/// A satisfaction model: bounded integer variables and the constraints over them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CpModel {
    vars: Vec<VarDecl>,
    constraints: Vec<Constraint>,
}

impl CpModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a variable with domain `[lb, ub]`. An empty range makes the
    /// model unsatisfiable.
    pub fn new_int_var(&mut self, lb: i64, ub: i64, name: impl Into<String>) -> IntVar {
        self.vars.push(VarDecl {
            lb,
            ub,
            name: name.into(),
        });
        IntVar(self.vars.len() - 1)
    }

    pub fn add_all_different<I, V>(&mut self, views: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<IntView>,
    {
        self.constraints.push(Constraint::AllDifferent(
            views.into_iter().map(Into::into).collect(),
        ));
    }

    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.vars.len()
    }

    #[must_use]
    pub fn var(&self, var: IntVar) -> &VarDecl {
        &self.vars[var.0]
    }

    pub fn vars(&self) -> impl Iterator<Item = (IntVar, &VarDecl)> {
        self.vars.iter().enumerate().map(|(i, d)| (IntVar(i), d))
    }

    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Checks a full assignment (indexed by variable) against every bound and
    /// constraint.
    #[must_use]
    pub fn verify(&self, values: &[i64]) -> bool {
        values.len() == self.vars.len()
            && self
                .vars
                .iter()
                .zip(values)
                .all(|(d, &v)| (d.lb..=d.ub).contains(&v))
            && self.constraints.iter().all(|c| c.is_satisfied_by(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_views_and_display() {
        let mut model = CpModel::new();
        let x = model.new_int_var(0, 3, "q0");
        let y = model.new_int_var(0, 3, "q1");
        model.add_all_different([x.offset(0), y.offset(-1)]);
        model.add_all_different([x, y]);

        assert_eq!(model.num_vars(), 2);
        assert_eq!(model.var(y).name, "q1");
        assert_eq!(
            model.constraints()[0].to_string(),
            "all_different(x0, x1 - 1)"
        );
        assert_eq!(x.offset(2).to_string(), "x0 + 2");
    }

    #[test]
    fn test_verify() {
        let mut model = CpModel::new();
        let x = model.new_int_var(0, 2, "x");
        let y = model.new_int_var(0, 2, "y");
        model.add_all_different([x.offset(0), y.offset(1)]);

        assert!(model.verify(&[0, 0]));
        assert!(!model.verify(&[1, 0]));
        assert!(!model.verify(&[3, 0]), "out of bounds");
        assert!(!model.verify(&[0]), "wrong arity");
    }
}
