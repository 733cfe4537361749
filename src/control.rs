//! Cooperative cancellation and per-solve statistics shared by every engine.
//!
//! A [`SearchControl`] is a cheap, cloneable handle around an atomic stop flag
//! and an optional deadline. Engines poll it between search steps; callers
//! (typically a per-solution callback) flip it with [`SearchControl::stop`].

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Why an engine's search loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchStatus {
    /// The whole search space was explored.
    Exhausted,
    /// [`SearchControl::stop`] was called.
    Stopped,
    /// The deadline passed before the search space was exhausted.
    TimedOut,
}

impl fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted => write!(f, "exhausted"),
            Self::Stopped => write!(f, "stopped"),
            Self::TimedOut => write!(f, "timed out"),
        }
    }
}

/// Shared stop flag plus an optional deadline.
#[derive(Debug, Clone, Default)]
pub struct SearchControl {
    stop_flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl SearchControl {
    /// A control with no deadline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A control whose deadline is `limit` from now.
    #[must_use]
    pub fn with_time_limit(limit: Option<Duration>) -> Self {
        Self {
            stop_flag: Arc::default(),
            deadline: limit.map(|l| Instant::now() + l),
        }
    }

    /// Requests the search to halt at its next poll.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }

    /// Whether [`Self::stop`] has been called since the last [`Self::rearm`].
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stop_flag.load(Ordering::Relaxed)
    }

    /// Clears the stop flag and restarts the deadline window.
    pub fn rearm(&mut self, limit: Option<Duration>) {
        self.stop_flag.store(false, Ordering::Relaxed);
        self.deadline = limit.map(|l| Instant::now() + l);
    }

    /// Polled by engines: `Some(status)` means the search must return now.
    #[must_use]
    pub fn poll(&self) -> Option<SearchStatus> {
        if self.is_stopped() {
            return Some(SearchStatus::Stopped);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(SearchStatus::TimedOut),
            _ => None,
        }
    }
}

/// Counters collected by an engine during one solve.
///
/// Not every engine fills every counter: the CP and backtracking engines count
/// branches as decisions and leave `propagations` at the number of domain
/// prunings / zero respectively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    /// Branching decisions (SAT) or value choices (CP, backtracking).
    pub decisions: usize,
    /// Dead ends hit by the search.
    pub conflicts: usize,
    /// Implied assignments (SAT) or domain prunings (CP).
    pub propagations: usize,
    /// Satisfying assignments reported to the caller.
    pub solutions: usize,
}
