#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Boolean formulas and the model-enumerating DPLL engine behind the SAT backend.

pub mod assignment;
pub mod clause;
pub mod cnf;
pub mod dpll;
pub mod literal;
pub mod variable_selection;
