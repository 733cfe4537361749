//! Repeated timing of encode → solve → decode across a range of board sizes.
//!
//! Results go into a [`ResultTable`] keyed by board size, one sample per trial,
//! which can be written as CSV (one `size_<n>` column per board, one row per
//! trial, seconds with six decimals) and summarised per size.

use crate::error::{QueensError, Result};
use crate::queens::{Backend, EngineConfig, EnumerationMode, solve_board};
use itertools::Itertools;
use log::{debug, info};
use ordered_float::OrderedFloat;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

/// What to benchmark and how often.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchmarkConfig {
    pub min_board_size: usize,
    pub max_board_size: usize,
    pub trials_per_size: usize,
    pub mode: EnumerationMode,
    pub backend: Backend,
    pub engine: EngineConfig,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            min_board_size: 1,
            max_board_size: 15,
            trials_per_size: 5,
            mode: EnumerationMode::AllSolutions,
            backend: Backend::default(),
            engine: EngineConfig::default(),
        }
    }
}

impl BenchmarkConfig {
    /// # Errors
    ///
    /// [`QueensError::InvalidConfiguration`] for zero trials, a zero minimum
    /// size or an empty size range.
    pub fn validate(&self) -> Result<()> {
        let detail = if self.trials_per_size == 0 {
            "at least one trial per board size is required".to_string()
        } else if self.min_board_size == 0 {
            "board sizes start at 1".to_string()
        } else if self.min_board_size > self.max_board_size {
            format!(
                "empty size range {}..={}",
                self.min_board_size, self.max_board_size
            )
        } else {
            return Ok(());
        };
        Err(QueensError::InvalidConfiguration { detail })
    }

    /// `results_<backend>_<mode>.csv`
    #[must_use]
    pub fn default_file_name(&self) -> String {
        format!("results_{}_{}.csv", self.backend, self.mode)
    }
}

/// Elapsed seconds per trial, keyed by board size.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultTable {
    samples: BTreeMap<usize, Vec<f64>>,
}

impl ResultTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, size: usize, seconds: f64) {
        self.samples.entry(size).or_default().push(seconds);
    }

    #[must_use]
    pub fn samples(&self, size: usize) -> Option<&[f64]> {
        self.samples.get(&size).map(Vec::as_slice)
    }

    pub fn sizes(&self) -> impl Iterator<Item = usize> + '_ {
        self.samples.keys().copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Column labels, `size_<n>` in increasing size.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.sizes().map(|n| format!("size_{n}")).collect()
    }

    /// CSV text. Columns shorter than the longest one leave their cells empty.
    #[must_use]
    pub fn to_csv(&self) -> String {
        let mut out = self.labels().join(",");
        out.push('\n');

        let rows = self.samples.values().map(Vec::len).max().unwrap_or(0);
        for trial in 0..rows {
            let line = self
                .samples
                .values()
                .map(|column| {
                    column
                        .get(trial)
                        .map_or_else(String::new, |s| format!("{s:.6}"))
                })
                .join(",");
            out.push_str(&line);
            out.push('\n');
        }
        out
    }

    /// # Errors
    ///
    /// [`QueensError::Io`] if the file cannot be created or written.
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        writer.write_all(self.to_csv().as_bytes())?;
        writer.flush()?;
        debug!("results written to {}", path.as_ref().display());
        Ok(())
    }

    /// Per-size aggregates in increasing size.
    #[must_use]
    pub fn summary(&self) -> Vec<SizeSummary> {
        self.samples
            .iter()
            .filter_map(|(&size, samples)| SizeSummary::from_samples(size, samples))
            .collect()
    }
}

/// Aggregates of one board size's samples, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeSummary {
    pub size: usize,
    pub trials: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` with a single sample.
    pub std: Option<f64>,
    pub min: f64,
    pub median: f64,
    pub max: f64,
}

impl SizeSummary {
    /// `None` for an empty sample list.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_samples(size: usize, samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let trials = samples.len();
        let mean = samples.iter().sum::<f64>() / trials as f64;
        let std = (trials > 1).then(|| {
            let squares: f64 = samples.iter().map(|s| (s - mean).powi(2)).sum();
            (squares / (trials - 1) as f64).sqrt()
        });

        let sorted = samples
            .iter()
            .copied()
            .map(OrderedFloat)
            .sorted_unstable()
            .collect_vec();
        let median = if trials % 2 == 1 {
            sorted[trials / 2].0
        } else {
            (sorted[trials / 2 - 1].0 + sorted[trials / 2].0) / 2.0
        };

        Some(Self {
            size,
            trials,
            mean,
            std,
            min: sorted[0].0,
            median,
            max: sorted[trials - 1].0,
        })
    }
}

/// Runs every trial of every size in order and collects the timings.
///
/// A trial is timed from encoding to the last decoded solution.
///
/// # Errors
///
/// [`QueensError::InvalidConfiguration`] for an unusable config. Any trial
/// error aborts the run and is returned as is.
pub fn run(config: &BenchmarkConfig) -> Result<ResultTable> {
    config.validate()?;
    let mut table = ResultTable::new();

    for n in config.min_board_size..=config.max_board_size {
        info!("Starting to run tests for board size {n}");
        for trial in 0..config.trials_per_size {
            let start = Instant::now();
            let report = solve_board(n, config.backend, &config.engine, config.mode, |_, _| {})?;
            let seconds = start.elapsed().as_secs_f64();
            debug!(
                "size {n} trial {trial}: {} solution(s) in {seconds:.6}s",
                report.solutions
            );
            table.push(n, seconds);
        }
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(max: usize, trials: usize) -> BenchmarkConfig {
        BenchmarkConfig {
            max_board_size: max,
            trials_per_size: trials,
            ..BenchmarkConfig::default()
        }
    }

    #[test]
    fn test_run_fills_every_size() {
        for backend in [Backend::Cp, Backend::Sat, Backend::Backtracking] {
            let table = run(&BenchmarkConfig {
                backend,
                ..config(6, 3)
            })
            .unwrap();
            assert_eq!(table.sizes().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5, 6]);
            for n in 1..=6 {
                let samples = table.samples(n).unwrap();
                assert_eq!(samples.len(), 3);
                assert!(samples.iter().all(|&s| s >= 0.0));
            }
        }
    }

    #[test]
    fn test_invalid_configs() {
        assert!(matches!(
            run(&config(5, 0)),
            Err(QueensError::InvalidConfiguration { .. })
        ));
        let empty = BenchmarkConfig {
            min_board_size: 6,
            ..config(5, 1)
        };
        assert!(empty.validate().is_err());
        let zero = BenchmarkConfig {
            min_board_size: 0,
            ..config(5, 1)
        };
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_trial_errors_abort_the_run() {
        let mut cfg = config(70, 1);
        cfg.min_board_size = 65;
        cfg.backend = Backend::Backtracking;
        assert!(matches!(
            run(&cfg),
            Err(QueensError::EngineFailure { size: 65, .. })
        ));
    }

    #[test]
    fn test_csv_layout() {
        let mut table = ResultTable::new();
        table.push(2, 0.5);
        table.push(1, 0.25);
        table.push(1, 1.0 / 3.0);
        table.push(2, 0.000_001_4);

        assert_eq!(table.labels(), vec!["size_1", "size_2"]);
        assert_eq!(
            table.to_csv(),
            "size_1,size_2\n0.250000,0.500000\n0.333333,0.000001\n"
        );
    }

    #[test]
    fn test_csv_ragged_columns() {
        let mut table = ResultTable::new();
        table.push(1, 1.0);
        table.push(1, 2.0);
        table.push(3, 3.0);
        assert_eq!(table.to_csv(), "size_1,size_3\n1.000000,3.000000\n2.000000,\n");
    }

    #[test]
    fn test_write_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(config(3, 2).default_file_name());
        assert!(path.ends_with("results_cp_all_solutions.csv"));

        let table = run(&config(3, 2)).unwrap();
        table.write_csv(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "size_1,size_2,size_3");
        assert!(lines[1..].iter().all(|l| l.split(',').count() == 3));
    }

    #[test]
    fn test_write_csv_to_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = ResultTable::new()
            .write_csv(dir.path().join("missing").join("out.csv"))
            .unwrap_err();
        assert!(matches!(err, QueensError::Io(_)));
    }

    #[test]
    fn test_summary() {
        let mut table = ResultTable::new();
        for s in [4.0, 1.0, 3.0, 2.0] {
            table.push(8, s);
        }
        table.push(9, 5.0);

        let summary = table.summary();
        assert_eq!(summary.len(), 2);

        let eight = summary[0];
        assert_eq!(eight.size, 8);
        assert!((eight.mean - 2.5).abs() < 1e-12);
        // Sample std of 1..=4 is sqrt(5/3).
        assert!((eight.std.unwrap() - (5.0_f64 / 3.0).sqrt()).abs() < 1e-12);
        assert!((eight.median - 2.5).abs() < 1e-12);
        assert_eq!((eight.min, eight.max), (1.0, 4.0));

        assert_eq!(summary[1].std, None);
        assert_eq!(summary[1].median, 5.0);
    }
}
