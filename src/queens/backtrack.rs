//! Row-by-row backtracking over bitmasks.
//!
//! Each row keeps three masks of forbidden columns: occupied columns and the
//! two diagonal directions. Diagonal masks shift by one column per row. Free
//! columns are tried lowest bit first.

use crate::control::{EngineStats, SearchControl, SearchStatus};
use log::trace;
use std::time::Duration;

/// Widest board the masks can hold.
pub const MAX_BOARD_SIZE: usize = u64::BITS as usize;

#[derive(Debug)]
pub struct BitwiseSearch {
    n: usize,
    mask: u64,
    /// Column of the queen placed in each row so far.
    placed: Vec<usize>,
    control: SearchControl,
    time_limit: Option<Duration>,
    stats: EngineStats,
}

impl BitwiseSearch {
    /// `None` when `n` is zero or wider than [`MAX_BOARD_SIZE`].
    #[must_use]
    pub fn new(n: usize) -> Option<Self> {
        if n == 0 || n > MAX_BOARD_SIZE {
            return None;
        }
        let mask = if n == MAX_BOARD_SIZE {
            u64::MAX
        } else {
            (1 << n) - 1
        };
        Some(Self {
            n,
            mask,
            placed: Vec::with_capacity(n),
            control: SearchControl::new(),
            time_limit: None,
            stats: EngineStats::default(),
        })
    }

    #[must_use]
    pub const fn with_time_limit(mut self, limit: Option<Duration>) -> Self {
        self.time_limit = limit;
        self
    }

    #[must_use]
    pub fn control(&self) -> SearchControl {
        self.control.clone()
    }

    #[must_use]
    pub const fn stats(&self) -> EngineStats {
        self.stats
    }

    /// Calls `on_solution` with the row of each column's queen.
    pub fn enumerate<F: FnMut(&[i64])>(&mut self, mut on_solution: F) -> SearchStatus {
        self.control.rearm(self.time_limit);
        self.placed.clear();
        self.stats = EngineStats::default();

        self.place(0, 0, 0, &mut on_solution)
            .unwrap_or(SearchStatus::Exhausted)
    }

    fn place(
        &mut self,
        cols: u64,
        left: u64,
        right: u64,
        on_solution: &mut dyn FnMut(&[i64]),
    ) -> Option<SearchStatus> {
        if let Some(status) = self.control.poll() {
            return Some(status);
        }

        if cols == self.mask {
            self.stats.solutions += 1;
            let mut rows = vec![0_i64; self.n];
            for (row, &col) in self.placed.iter().enumerate() {
                #[allow(clippy::cast_possible_wrap)]
                let row = row as i64;
                rows[col] = row;
            }
            trace!("solution {rows:?}");
            on_solution(&rows);
            return self.control.poll();
        }

        let mut free = !(cols | left | right) & self.mask;
        if free == 0 {
            self.stats.conflicts += 1;
        }
        while free != 0 {
            let bit = free & free.wrapping_neg();
            free ^= bit;
            self.stats.decisions += 1;

            self.placed.push(bit.trailing_zeros() as usize);
            let outcome = self.place(
                cols | bit,
                (left | bit) >> 1,
                (right | bit) << 1,
                on_solution,
            );
            self.placed.pop();
            if outcome.is_some() {
                return outcome;
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(n: usize) -> usize {
        let mut search = BitwiseSearch::new(n).unwrap();
        let mut found = 0;
        assert_eq!(search.enumerate(|_| found += 1), SearchStatus::Exhausted);
        assert_eq!(search.stats().solutions, found);
        found
    }

    #[test]
    fn test_known_counts() {
        let expected = [1, 0, 0, 2, 10, 4, 40, 92];
        for (n, &want) in (1..).zip(&expected) {
            assert_eq!(count(n), want, "n = {n}");
        }
    }

    #[test]
    fn test_first_solution_is_column_indexed() {
        let mut search = BitwiseSearch::new(4).unwrap();
        let mut first = None;
        let control = search.control();
        let status = search.enumerate(|rows| {
            first = Some(rows.to_vec());
            control.stop();
        });
        assert_eq!(status, SearchStatus::Stopped);
        // Row 0 takes column 1 first: rows by column are 2, 0, 3, 1.
        assert_eq!(first, Some(vec![2, 0, 3, 1]));
    }

    #[test]
    fn test_width_limits() {
        assert!(BitwiseSearch::new(0).is_none());
        assert!(BitwiseSearch::new(MAX_BOARD_SIZE).is_some());
        assert!(BitwiseSearch::new(MAX_BOARD_SIZE + 1).is_none());
    }

    #[test]
    fn test_time_limit() {
        let mut search = BitwiseSearch::new(12)
            .unwrap()
            .with_time_limit(Some(Duration::ZERO));
        assert_eq!(search.enumerate(|_| {}), SearchStatus::TimedOut);
    }
}
