//! First-only and all-solutions runs over a [`SolverAdapter`].
//!
//! The driver decodes and validates every solution as it arrives, counts it,
//! keeps the first placement and, in first-only mode, stops the engine right
//! after the first callback.

use crate::control::{EngineStats, SearchStatus};
use crate::error::{QueensError, Result};
use crate::queens::adapter::{Backend, EngineConfig, SolverAdapter};
use crate::queens::board::Board;
use crate::queens::decode::{Placement, decode};
use clap::ValueEnum;
use log::{debug, trace};
use std::fmt::Display;
use std::time::{Duration, Instant};

/// Enum representing how many solutions a run looks for.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Hash, Default, ValueEnum)]
pub enum EnumerationMode {
    /// Stop after the first solution.
    #[default]
    #[value(name = "one_solution")]
    OneSolution,
    /// Count every solution.
    #[value(name = "all_solutions")]
    AllSolutions,
}

impl Display for EnumerationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OneSolution => write!(f, "one_solution"),
            Self::AllSolutions => write!(f, "all_solutions"),
        }
    }
}

/// Driver lifecycle: `Idle → Searching → Found → Exhausted`, with `Found`
/// skipped when the board has no solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DriverState {
    #[default]
    Idle,
    Searching,
    /// At least one solution has been delivered.
    Found,
    Exhausted,
}

/// Outcome of one driver run.
#[derive(Debug, Clone)]
pub struct EnumerationReport {
    pub board: Board,
    pub backend: Backend,
    pub mode: EnumerationMode,
    pub solutions: usize,
    pub first: Option<Placement>,
    /// Search and decoding time, encoding excluded.
    pub elapsed: Duration,
    pub stats: EngineStats,
    pub status: SearchStatus,
}

#[derive(Debug)]
pub struct EnumerationDriver<'a> {
    adapter: &'a mut dyn SolverAdapter,
    mode: EnumerationMode,
    state: DriverState,
    transitions: Vec<DriverState>,
}

impl<'a> EnumerationDriver<'a> {
    pub fn new(adapter: &'a mut dyn SolverAdapter, mode: EnumerationMode) -> Self {
        Self {
            adapter,
            mode,
            state: DriverState::Idle,
            transitions: vec![DriverState::Idle],
        }
    }

    #[must_use]
    pub const fn state(&self) -> DriverState {
        self.state
    }

    /// States passed through by the most recent run, starting with the one it
    /// began in. Before any run this is just `[Idle]`.
    #[must_use]
    pub fn transitions(&self) -> &[DriverState] {
        &self.transitions
    }

    /// Runs without a per-solution hook.
    ///
    /// # Errors
    ///
    /// See [`Self::run_with`].
    pub fn run(&mut self) -> Result<EnumerationReport> {
        self.run_with(|_, _| {})
    }

    /// Runs the search, calling `on_solution(k, placement)` for the `k`-th
    /// solution (1-based).
    ///
    /// # Errors
    ///
    /// * [`QueensError::MalformedAssignment`] if any solution fails to decode.
    ///   The engine is stopped at once.
    /// * [`QueensError::EngineFailure`] if the time limit hit.
    pub fn run_with<F>(&mut self, mut on_solution: F) -> Result<EnumerationReport>
    where
        F: FnMut(usize, &Placement),
    {
        let Self {
            adapter,
            mode,
            state,
            transitions,
        } = self;
        let board = adapter.board();
        let control = adapter.control();
        let first_only = *mode == EnumerationMode::OneSolution;

        transitions.clear();
        transitions.push(*state);
        let mut enter = |next: DriverState| {
            *state = next;
            transitions.push(next);
        };
        enter(DriverState::Searching);

        let mut solutions = 0;
        let mut first = None;
        let mut failure = None;

        let start = Instant::now();
        let status = adapter.enumerate_all(&mut |assignment| {
            if failure.is_some() {
                return;
            }
            match decode(board, assignment) {
                Ok(placement) => {
                    solutions += 1;
                    if solutions == 1 {
                        enter(DriverState::Found);
                    }
                    trace!("solution {solutions}: {:?}", placement.rows());
                    on_solution(solutions, &placement);
                    if first.is_none() {
                        first = Some(placement);
                    }
                    if first_only {
                        control.stop();
                    }
                }
                Err(e) => {
                    failure = Some(e);
                    control.stop();
                }
            }
        });
        let elapsed = start.elapsed();
        enter(DriverState::Exhausted);
        debug!("driver finished after {elapsed:?}: {transitions:?}");

        let status = status?;
        if let Some(e) = failure {
            return Err(e);
        }
        if status == SearchStatus::TimedOut {
            return Err(QueensError::engine(
                board.size(),
                elapsed,
                format!("time limit reached after {solutions} solution(s)"),
            ));
        }

        let stats = adapter.stats();
        debug!(
            "{} on {board}: {solutions} solution(s), {} decisions, {} conflicts, {} propagations",
            adapter.backend(),
            stats.decisions,
            stats.conflicts,
            stats.propagations
        );

        Ok(EnumerationReport {
            board,
            backend: adapter.backend(),
            mode: *mode,
            solutions,
            first,
            elapsed,
            stats,
            status,
        })
    }
}

/// Encodes `n`, builds the `backend` engine and runs it once.
///
/// # Errors
///
/// Any error from [`Board::new`], [`Backend::build`] or
/// [`EnumerationDriver::run_with`].
pub fn solve_board<F>(
    n: usize,
    backend: Backend,
    config: &EngineConfig,
    mode: EnumerationMode,
    on_solution: F,
) -> Result<EnumerationReport>
where
    F: FnMut(usize, &Placement),
{
    let board = Board::new(n)?;
    let mut adapter = backend.build(board, config)?;
    EnumerationDriver::new(adapter.as_mut(), mode).run_with(on_solution)
}
