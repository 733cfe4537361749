//! The boundary between an encoded board and the engine that searches it.
//!
//! Every backend implements [`SolverAdapter`] and reports solutions through the
//! same [`Assignment`] type, so the driver and the benchmark harness never
//! depend on a concrete engine. The backend is chosen once, at configuration
//! time, through [`Backend::build`].

use crate::control::{EngineStats, SearchControl, SearchStatus};
use crate::cp::search::CpSearch;
use crate::error::{QueensError, Result};
use crate::queens::backtrack::{BitwiseSearch, MAX_BOARD_SIZE};
use crate::queens::board::Board;
use crate::queens::encoding::{CpEncoding, PairEncoding, SatEncoding, encode_cp, encode_sat};
use crate::sat::assignment::Solutions;
use crate::sat::dpll::Dpll;
use crate::sat::variable_selection::{FixedOrder, RandomOrder, VariableSelection};
use clap::ValueEnum;
use std::fmt::{Debug, Display};
use std::time::{Duration, Instant};

/// A raw satisfying assignment, before decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignment {
    /// A SAT model over the per-cell variables.
    Boolean(Solutions),
    /// The row of each column's queen.
    Integer(Vec<i64>),
}

/// Enum representing the solving engine behind an adapter.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Hash, Default, ValueEnum)]
pub enum Backend {
    /// Integer model with all-different constraints.
    #[default]
    Cp,
    /// CNF over one boolean per cell.
    Sat,
    /// Bitmask backtracking, boards up to 64 wide.
    Backtracking,
}

impl Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cp => write!(f, "cp"),
            Self::Sat => write!(f, "sat"),
            Self::Backtracking => write!(f, "backtracking"),
        }
    }
}

impl Backend {
    /// Encodes `board` and wraps the matching engine.
    ///
    /// # Errors
    ///
    /// [`QueensError::EngineFailure`] when the board exceeds the engine's
    /// capacity.
    pub fn build(self, board: Board, config: &EngineConfig) -> Result<Box<dyn SolverAdapter>> {
        Ok(match self {
            Self::Cp => Box::new(CpAdapter::new(board, config)),
            Self::Sat => Box::new(SatAdapter::new(board, config)?),
            Self::Backtracking => Box::new(BacktrackAdapter::new(board, config)?),
        })
    }
}

/// Enum representing the branching order handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Hash, Default, ValueEnum)]
pub enum VariableSelectionType {
    /// Variables in id order.
    #[default]
    Fixed,
    /// A seeded random permutation of the variables.
    Random,
}

impl Display for VariableSelectionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed => write!(f, "fixed"),
            Self::Random => write!(f, "random"),
        }
    }
}

impl VariableSelectionType {
    /// Converts the `VariableSelectionType` to a concrete selector over
    /// `num_vars` variables.
    #[must_use]
    pub fn to_impl(self, num_vars: usize, seed: u64) -> Box<dyn VariableSelection> {
        match self {
            Self::Fixed => Box::new(FixedOrder),
            Self::Random => Box::new(RandomOrder::new(num_vars, seed)),
        }
    }
}

/// Engine options shared by every backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Wall-clock budget per search. Exceeding it is an engine failure.
    pub time_limit: Option<Duration>,
    /// Ignored by the backtracking backend.
    pub variable_selection: VariableSelectionType,
    /// SAT backend only.
    pub pair_encoding: PairEncoding,
    /// Seed for [`VariableSelectionType::Random`].
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            time_limit: None,
            variable_selection: VariableSelectionType::default(),
            pair_encoding: PairEncoding::default(),
            seed: 42,
        }
    }
}

/// A solving engine loaded with one board's encoding.
pub trait SolverAdapter: Debug {
    fn board(&self) -> Board;

    fn backend(&self) -> Backend;

    /// Delivers every solution to `on_solution`, one at a time, in search
    /// order. Returns [`SearchStatus::Stopped`] if [`Self::stop`] was called
    /// during the run and [`SearchStatus::TimedOut`] if the time limit hit.
    ///
    /// # Errors
    ///
    /// Engine faults surface as [`QueensError::EngineFailure`].
    fn enumerate_all(&mut self, on_solution: &mut dyn FnMut(&Assignment)) -> Result<SearchStatus>;

    /// Shared handle to the engine's stop flag. A run clears the flag when it
    /// starts.
    fn control(&self) -> SearchControl;

    /// Statistics of the most recent run.
    fn stats(&self) -> EngineStats;

    /// Asks the current run to return at its next poll.
    fn stop(&self) {
        self.control().stop();
    }

    /// The first solution in search order. `Ok(None)` means the board has no
    /// solution.
    ///
    /// # Errors
    ///
    /// [`QueensError::EngineFailure`] if the time limit hit first.
    fn solve_one(&mut self) -> Result<Option<Assignment>> {
        let control = self.control();
        let start = Instant::now();
        let mut first = None;
        let status = self.enumerate_all(&mut |assignment| {
            first = Some(assignment.clone());
            control.stop();
        })?;

        if status == SearchStatus::TimedOut {
            return Err(QueensError::engine(
                self.board().size(),
                start.elapsed(),
                "time limit reached before the first solution",
            ));
        }
        Ok(first)
    }
}

/// CNF encoding searched by the DPLL enumerator.
#[derive(Debug)]
pub struct SatAdapter {
    encoding: SatEncoding,
    solver: Dpll,
}

impl SatAdapter {
    /// # Errors
    ///
    /// [`QueensError::EngineFailure`] when the cell ids do not fit DIMACS
    /// (`i32`) literals.
    pub fn new(board: Board, config: &EngineConfig) -> Result<Self> {
        if i32::try_from(board.num_cells()).is_err() {
            return Err(QueensError::engine(
                board.size(),
                Duration::ZERO,
                format!("{} cell variables do not fit 32-bit literals", board.num_cells()),
            ));
        }

        let encoding = encode_sat(board, config.pair_encoding);
        let selector = config
            .variable_selection
            .to_impl(encoding.cnf.num_vars, config.seed);
        let solver = Dpll::with_selector(encoding.cnf.clone(), selector)
            .with_time_limit(config.time_limit);

        Ok(Self { encoding, solver })
    }

    #[must_use]
    pub const fn encoding(&self) -> &SatEncoding {
        &self.encoding
    }
}

impl SolverAdapter for SatAdapter {
    fn board(&self) -> Board {
        self.encoding.board
    }

    fn backend(&self) -> Backend {
        Backend::Sat
    }

    fn enumerate_all(&mut self, on_solution: &mut dyn FnMut(&Assignment)) -> Result<SearchStatus> {
        Ok(self
            .solver
            .enumerate(|model| on_solution(&Assignment::Boolean(model.clone()))))
    }

    fn control(&self) -> SearchControl {
        self.solver.control()
    }

    fn stats(&self) -> EngineStats {
        self.solver.stats()
    }
}

/// Integer model searched with forward checking.
#[derive(Debug)]
pub struct CpAdapter {
    encoding: CpEncoding,
    search: CpSearch,
}

impl CpAdapter {
    #[must_use]
    pub fn new(board: Board, config: &EngineConfig) -> Self {
        let encoding = encode_cp(board);
        let mut search = CpSearch::new(encoding.model.clone()).with_time_limit(config.time_limit);
        if config.variable_selection == VariableSelectionType::Random {
            search = search.with_random_order(config.seed);
        }
        Self { encoding, search }
    }

    #[must_use]
    pub const fn encoding(&self) -> &CpEncoding {
        &self.encoding
    }
}

impl SolverAdapter for CpAdapter {
    fn board(&self) -> Board {
        self.encoding.board
    }

    fn backend(&self) -> Backend {
        Backend::Cp
    }

    fn enumerate_all(&mut self, on_solution: &mut dyn FnMut(&Assignment)) -> Result<SearchStatus> {
        let columns = &self.encoding.columns;
        Ok(self.search.enumerate(|values| {
            let rows = columns.iter().map(|q| values[q.index()]).collect();
            on_solution(&Assignment::Integer(rows));
        }))
    }

    fn control(&self) -> SearchControl {
        self.search.control()
    }

    fn stats(&self) -> EngineStats {
        self.search.stats()
    }
}

/// Bitmask backtracking; needs no encoding.
#[derive(Debug)]
pub struct BacktrackAdapter {
    board: Board,
    search: BitwiseSearch,
}

impl BacktrackAdapter {
    /// # Errors
    ///
    /// [`QueensError::EngineFailure`] for boards wider than 64 columns.
    pub fn new(board: Board, config: &EngineConfig) -> Result<Self> {
        let search = BitwiseSearch::new(board.size()).ok_or_else(|| {
            QueensError::engine(
                board.size(),
                Duration::ZERO,
                format!("bitmask backtracking supports at most {MAX_BOARD_SIZE} columns"),
            )
        })?;
        Ok(Self {
            board,
            search: search.with_time_limit(config.time_limit),
        })
    }
}

impl SolverAdapter for BacktrackAdapter {
    fn board(&self) -> Board {
        self.board
    }

    fn backend(&self) -> Backend {
        Backend::Backtracking
    }

    fn enumerate_all(&mut self, on_solution: &mut dyn FnMut(&Assignment)) -> Result<SearchStatus> {
        Ok(self
            .search
            .enumerate(|rows| on_solution(&Assignment::Integer(rows.to_vec()))))
    }

    fn control(&self) -> SearchControl {
        self.search.control()
    }

    fn stats(&self) -> EngineStats {
        self.search.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queens::decode::decode;

    const BACKENDS: [Backend; 3] = [Backend::Cp, Backend::Sat, Backend::Backtracking];

    fn adapter(backend: Backend, n: usize) -> Box<dyn SolverAdapter> {
        backend
            .build(Board::new(n).unwrap(), &EngineConfig::default())
            .unwrap()
    }

    #[test]
    fn test_solve_one_on_every_backend() {
        for backend in BACKENDS {
            for n in 1..=9 {
                let mut solver = adapter(backend, n);
                let found = solver.solve_one().unwrap();
                if n == 2 || n == 3 {
                    assert!(found.is_none(), "{backend} n = {n}");
                } else {
                    let assignment = found.expect("board is solvable");
                    let placement = decode(solver.board(), &assignment).unwrap();
                    assert_eq!(placement.board_size(), n);
                }
            }
        }
    }

    #[test]
    fn test_enumerate_all_is_rerunnable() {
        for backend in BACKENDS {
            let mut solver = adapter(backend, 6);
            for _ in 0..2 {
                let mut count = 0;
                let status = solver.enumerate_all(&mut |_| count += 1).unwrap();
                assert_eq!(status, SearchStatus::Exhausted);
                assert_eq!(count, 4, "{backend}");
                assert_eq!(solver.stats().solutions, 4);
            }
        }
    }

    #[test]
    fn test_stop_from_callback() {
        for backend in BACKENDS {
            let mut solver = adapter(backend, 8);
            let control = solver.control();
            let mut count = 0;
            let status = solver
                .enumerate_all(&mut |_| {
                    count += 1;
                    if count == 5 {
                        control.stop();
                    }
                })
                .unwrap();
            assert_eq!(status, SearchStatus::Stopped, "{backend}");
            assert_eq!(count, 5);
        }
    }

    #[test]
    fn test_random_order_keeps_counts() {
        let config = EngineConfig {
            variable_selection: VariableSelectionType::Random,
            seed: 3,
            ..EngineConfig::default()
        };
        for backend in BACKENDS {
            let mut solver = backend.build(Board::new(5).unwrap(), &config).unwrap();
            let mut count = 0;
            solver.enumerate_all(&mut |_| count += 1).unwrap();
            assert_eq!(count, 10, "{backend}");
        }
    }

    #[test]
    fn test_symmetric_pairs_keep_counts() {
        let config = EngineConfig {
            pair_encoding: PairEncoding::Symmetric,
            ..EngineConfig::default()
        };
        let mut solver = Backend::Sat.build(Board::new(6).unwrap(), &config).unwrap();
        let mut count = 0;
        solver.enumerate_all(&mut |_| count += 1).unwrap();
        assert_eq!(count, 4);
    }

    #[test]
    fn test_time_limit_fails_solve_one() {
        let config = EngineConfig {
            time_limit: Some(Duration::ZERO),
            ..EngineConfig::default()
        };
        for backend in BACKENDS {
            let mut solver = backend.build(Board::new(10).unwrap(), &config).unwrap();
            let err = solver.solve_one().unwrap_err();
            assert!(
                matches!(err, QueensError::EngineFailure { size: 10, .. }),
                "{backend}: {err}"
            );
        }
    }

    #[test]
    fn test_capacity_limits() {
        let err = Backend::Backtracking
            .build(Board::new(65).unwrap(), &EngineConfig::default())
            .unwrap_err();
        assert!(matches!(err, QueensError::EngineFailure { size: 65, .. }));
    }
}
