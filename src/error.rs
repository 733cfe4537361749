//! Error taxonomy shared by the encoders, the engines and the benchmark harness.
//!
//! An unsatisfiable board is *not* an error: `solve_one` reports it as `Ok(None)`
//! and an enumeration simply counts zero solutions.

use std::time::Duration;
use thiserror::Error;

/// Errors raised while encoding, solving, decoding or benchmarking a board.
#[derive(Debug, Error)]
pub enum QueensError {
    /// The requested board has no cells.
    #[error("invalid board size {size}: a board needs at least one row and one column")]
    InvalidBoardSize {
        /// The rejected side length.
        size: usize,
    },

    /// A solver assignment did not decode into a valid placement.
    ///
    /// This always points at an encoding defect and is never corrected silently.
    #[error("malformed assignment for a {size}x{size} board: {detail}")]
    MalformedAssignment {
        /// Side length of the board being decoded.
        size: usize,
        /// What was wrong with the assignment.
        detail: String,
    },

    /// The engine gave up: time limit, capacity limit or an internal fault.
    #[error("engine failure on a {size}x{size} board after {elapsed:?}: {reason}")]
    EngineFailure {
        /// Side length of the board being solved.
        size: usize,
        /// Time spent before the failure was observed.
        elapsed: Duration,
        /// Human readable cause.
        reason: String,
    },

    /// A benchmark or engine configuration that cannot be run.
    #[error("invalid configuration: {detail}")]
    InvalidConfiguration {
        /// What was wrong with the configuration.
        detail: String,
    },

    /// Writing or reading a result file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl QueensError {
    /// Builds a [`QueensError::MalformedAssignment`].
    pub fn malformed(size: usize, detail: impl Into<String>) -> Self {
        Self::MalformedAssignment {
            size,
            detail: detail.into(),
        }
    }

    /// Builds a [`QueensError::EngineFailure`].
    pub fn engine(size: usize, elapsed: Duration, reason: impl Into<String>) -> Self {
        Self::EngineFailure {
            size,
            elapsed,
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = QueensError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_board_size() {
        let err = QueensError::InvalidBoardSize { size: 0 };
        assert!(err.to_string().contains("invalid board size 0"));

        let err = QueensError::malformed(4, "column 2 holds 0 queens");
        assert_eq!(
            err.to_string(),
            "malformed assignment for a 4x4 board: column 2 holds 0 queens"
        );

        let err = QueensError::engine(12, Duration::from_millis(1500), "time limit reached");
        let message = err.to_string();
        assert!(message.contains("12x12"));
        assert!(message.contains("time limit reached"));
    }

    #[test]
    fn test_io_error_converts() {
        fn open() -> Result<std::fs::File> {
            Ok(std::fs::File::open("/definitely/not/here.csv")?)
        }
        assert!(matches!(open(), Err(QueensError::Io(_))));
    }
}
