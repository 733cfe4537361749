//! This crate encodes the N-Queens problem for several solving engines,
//! enumerates its solutions and benchmarks how the engines scale with the board.

/// The `benchmark` module repeats timed solves across board sizes and writes the results as CSV.
pub mod benchmark;

/// The `control` module holds the cooperative stop flag and the statistics shared by all engines.
pub mod control;

/// The `cp` module implements a small finite-domain engine with all-different constraints.
pub mod cp;

/// The `error` module defines the crate's error type.
pub mod error;

/// The `queens` module maps boards to variables and constraints and drives the engines.
pub mod queens;

/// The `sat` module implements CNF formulas and a model-enumerating DPLL solver.
pub mod sat;

pub use error::{QueensError, Result};
