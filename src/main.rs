//! # nqueens
//!
//! `nqueens` places `n` non-attacking queens on an `n × n` board with one of
//! three engines and times how each engine scales with the board.
//!
//! ## Engines
//!
//! 1.  **CP**: one row variable per column and three all-different constraints
//!     over `q[c]`, `q[c] + c` and `q[c] - c`, searched with forward checking.
//! 2.  **SAT**: one boolean per cell, row and column coverage clauses plus a
//!     binary exclusion clause per attacking pair, enumerated by DPLL.
//! 3.  **Backtracking**: row-by-row search over column and diagonal bitmasks.
//!
//! ## Usage
//!
//! ```sh
//! # First solution of the 8-queens board with the CP engine
//! nqueens
//!
//! # Print all 92 solutions with the SAT engine
//! nqueens -n 8 --all-solutions --print-solutions --backend sat
//!
//! # Time full enumerations of sizes 1..=12, three trials each
//! nqueens --run-tests all_solutions --max-board-size 12 --trials 3
//!
//! # Write the CNF of a 10x10 board
//! nqueens dimacs -n 10 -o ten.cnf
//! ```
//!
//! Benchmarks write `results_<backend>_<mode>.csv` unless `--output` is given:
//! one `size_<n>` column per board size and one row per trial.
//!
//! Logging goes through `env_logger`. `--debug` lowers the default filter to
//! `debug`, and `RUST_LOG` overrides both.

use clap::Parser;
use command_line::cli::{Cli, dispatch};
use env_logger::Env;

mod command_line;

/// Global allocator using `tikv-jemallocator` for memory usage tracking.
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.common.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    dispatch(cli)
}
