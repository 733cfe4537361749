#![allow(clippy::cast_precision_loss)]

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use nqueens_bench::benchmark::{self, BenchmarkConfig, SizeSummary};
use nqueens_bench::control::EngineStats;
use nqueens_bench::queens::encoding::encode_sat;
use nqueens_bench::queens::{
    Backend, Board, EngineConfig, EnumerationDriver, EnumerationMode, EnumerationReport,
    PairEncoding, VariableSelectionType,
};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tikv_jemalloc_ctl::{epoch, stats};

/// Defines the command-line interface for the N-Queens solver and benchmark.
///
/// Uses `clap` for parsing arguments.
#[derive(Parser, Debug)]
#[command(
    name = "nqueens",
    version,
    about = "Solve and benchmark N-Queens with CP, SAT and backtracking engines"
)]
pub(crate) struct Cli {
    /// Specifies the subcommand to execute. Without one, a board is solved or,
    /// with `--run-tests`, the benchmark runs.
    #[clap(subcommand)]
    pub command: Option<Commands>,

    /// Common options for solving and benchmarking.
    #[command(flatten)]
    pub common: CommonOptions,
}

/// Enumerates the available subcommands.
#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Export the SAT encoding of a board in DIMACS format.
    Dimacs {
        /// Side length of the board.
        #[arg(short = 'n', long, default_value_t = 8, value_parser = parse_positive)]
        board_size: usize,

        /// How attacking pairs become clauses.
        #[arg(long, default_value_t = PairEncoding::Unique)]
        pair_encoding: PairEncoding,

        /// Write the formula here instead of standard output.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Benchmark selection for `--run-tests`.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Hash, Default, ValueEnum)]
pub(crate) enum RunTests {
    /// Solve the single board given by `--board-size`.
    #[default]
    Off,
    /// Time full enumerations.
    #[value(name = "all_solutions")]
    AllSolutions,
    /// Time first-solution searches.
    #[value(name = "one_solution")]
    OneSolution,
}

impl RunTests {
    const fn mode(self) -> Option<EnumerationMode> {
        match self {
            Self::Off => None,
            Self::AllSolutions => Some(EnumerationMode::AllSolutions),
            Self::OneSolution => Some(EnumerationMode::OneSolution),
        }
    }
}

impl std::fmt::Display for RunTests {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Off => write!(f, "off"),
            Self::AllSolutions => write!(f, "all_solutions"),
            Self::OneSolution => write!(f, "one_solution"),
        }
    }
}

/// Defines the options shared by single solves and benchmarks.
#[derive(Args, Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct CommonOptions {
    /// Side length of the board to solve.
    #[arg(short = 'n', long, default_value_t = 8, value_parser = parse_positive)]
    pub(crate) board_size: usize,

    /// Enumerate every solution instead of stopping at the first.
    #[arg(short, long, default_value_t = false)]
    pub(crate) all_solutions: bool,

    /// Print each solution as it is found.
    #[arg(short, long, default_value_t = false)]
    pub(crate) print_solutions: bool,

    /// Run the timing benchmark over sizes 1..=max-board-size instead of a single solve.
    #[arg(long, default_value_t = RunTests::Off)]
    pub(crate) run_tests: RunTests,

    /// Largest board size timed by the benchmark.
    #[arg(long, default_value_t = 15, value_parser = parse_positive)]
    pub(crate) max_board_size: usize,

    /// Trials per board size.
    #[arg(long, default_value_t = 5, value_parser = parse_positive)]
    pub(crate) trials: usize,

    /// Benchmark CSV path. Defaults to `results_<backend>_<mode>.csv`.
    #[arg(short, long)]
    pub(crate) output: Option<PathBuf>,

    /// Solving engine.
    #[arg(long, default_value_t = Backend::Cp)]
    pub(crate) backend: Backend,

    /// Branching order of the CP and SAT engines.
    #[arg(long, default_value_t = VariableSelectionType::Fixed)]
    pub(crate) variable_selection: VariableSelectionType,

    /// Seed for `--variable-selection random`.
    #[arg(long, default_value_t = 42)]
    pub(crate) seed: u64,

    /// How attacking pairs become clauses (SAT only).
    #[arg(long, default_value_t = PairEncoding::Unique)]
    pub(crate) pair_encoding: PairEncoding,

    /// Give up on a search after this many seconds.
    #[arg(long)]
    pub(crate) time_limit: Option<f64>,

    /// Enable debug logging. `RUST_LOG` takes precedence.
    #[arg(short, long, default_value_t = false)]
    pub(crate) debug: bool,

    /// Skip the statistics tables.
    #[arg(long, default_value_t = false)]
    pub(crate) no_stats: bool,
}

impl CommonOptions {
    pub(crate) fn engine_config(&self) -> Result<EngineConfig> {
        let time_limit = self
            .time_limit
            .map(Duration::try_from_secs_f64)
            .transpose()
            .context("--time-limit must be a non-negative number of seconds")?;

        Ok(EngineConfig {
            time_limit,
            variable_selection: self.variable_selection,
            pair_encoding: self.pair_encoding,
            seed: self.seed,
        })
    }

    const fn mode(&self) -> EnumerationMode {
        if self.all_solutions {
            EnumerationMode::AllSolutions
        } else {
            EnumerationMode::OneSolution
        }
    }
}

fn parse_positive(s: &str) -> std::result::Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

/// Runs the command selected on the command line.
pub(crate) fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Dimacs {
            board_size,
            pair_encoding,
            output,
        }) => export_dimacs(board_size, pair_encoding, output.as_ref()),
        Some(Commands::Completions { shell }) => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "nqueens", &mut std::io::stdout());
            Ok(())
        }
        None => match cli.common.run_tests.mode() {
            Some(mode) => run_benchmark(&cli.common, mode),
            None => solve_and_report(&cli.common),
        },
    }
}

/// Writes the CNF of an `n`-queens board, with a comment header.
pub(crate) fn export_dimacs(n: usize, pairs: PairEncoding, output: Option<&PathBuf>) -> Result<()> {
    let encoding = encode_sat(Board::new(n)?, pairs);
    let dimacs = format!("c {n}-queens, {pairs} pair encoding\n{}", encoding.cnf);

    match output {
        Some(path) => {
            std::fs::write(path, dimacs)
                .with_context(|| format!("Unable to write {}", path.display()))?;
            println!("DIMACS written to: {}", path.display());
        }
        None => print!("{dimacs}"),
    }
    Ok(())
}

/// Solves one board, printing solutions, the first placement and statistics.
pub(crate) fn solve_and_report(common: &CommonOptions) -> Result<()> {
    let config = common.engine_config()?;
    let mode = common.mode();
    let n = common.board_size;

    epoch::advance().map_err(|e| anyhow!("jemalloc epoch: {e}"))?;
    let start = Instant::now();

    let board = Board::new(n)?;
    let mut adapter = common.backend.build(board, &config)?;
    let encode_time = start.elapsed();

    let print = common.print_solutions;
    let report = EnumerationDriver::new(adapter.as_mut(), mode).run_with(|k, placement| {
        if print {
            println!("Solution {k}");
            println!("{placement}");
        }
    })?;
    let total = start.elapsed();

    println!(
        "Found {} solution(s) for a board size of {n}",
        report.solutions
    );
    if !print {
        if let Some(first) = &report.first {
            println!("{first}");
        }
    }

    if !common.no_stats {
        let (allocated, resident) = memory_mib()?;
        print_stats(encode_time, total, &report, allocated, resident);
    }
    Ok(())
}

/// Runs the timing benchmark and writes its CSV.
pub(crate) fn run_benchmark(common: &CommonOptions, mode: EnumerationMode) -> Result<()> {
    let config = BenchmarkConfig {
        min_board_size: 1,
        max_board_size: common.max_board_size,
        trials_per_size: common.trials,
        mode,
        backend: common.backend,
        engine: common.engine_config()?,
    };
    info!(
        "benchmarking {} ({mode}) on sizes 1..={} with {} trial(s) each",
        config.backend, config.max_board_size, config.trials_per_size
    );

    let table = benchmark::run(&config)?;
    let path = common
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(config.default_file_name()));
    table.write_csv(&path)?;
    println!("Results written to: {}", path.display());

    if !common.no_stats {
        print_summary(&table.summary());
    }
    Ok(())
}

fn memory_mib() -> Result<(f64, f64)> {
    epoch::advance().map_err(|e| anyhow!("jemalloc epoch: {e}"))?;
    let allocated = stats::allocated::read().map_err(|e| anyhow!("jemalloc stats: {e}"))?;
    let resident = stats::resident::read().map_err(|e| anyhow!("jemalloc stats: {e}"))?;
    Ok((
        allocated as f64 / (1024.0 * 1024.0),
        resident as f64 / (1024.0 * 1024.0),
    ))
}

/// Helper function to print a single statistic line in a formatted table row.
pub(crate) fn stat_line(label: &str, value: impl std::fmt::Display) {
    println!("|  {label:<28} {value:>18}  |");
}

/// Helper function to print a statistic line that includes a rate (value/second).
pub(crate) fn stat_line_with_rate(label: &str, value: usize, elapsed: f64) {
    let rate = if elapsed > 0.0 {
        value as f64 / elapsed
    } else {
        0.0
    };
    println!("|  {label:<20} {value:>12} ({rate:>9.0}/sec)  |");
}

/// Prints a summary of problem and search statistics.
pub(crate) fn print_stats(
    encode_time: Duration,
    total: Duration,
    report: &EnumerationReport,
    allocated: f64,
    resident: f64,
) {
    let search_secs = report.elapsed.as_secs_f64();
    let EngineStats {
        decisions,
        conflicts,
        propagations,
        solutions,
    } = report.stats;

    println!("\n=======================[ Problem Statistics ]=========================");
    stat_line("Board", report.board);
    stat_line("Backend", report.backend);
    stat_line("Mode", report.mode);
    stat_line("Encoding time (s)", format!("{:.3}", encode_time.as_secs_f64()));

    println!("========================[ Search Statistics ]========================");
    stat_line_with_rate("Conflicts", conflicts, search_secs);
    stat_line_with_rate("Branches", decisions, search_secs);
    stat_line_with_rate("Propagations", propagations, search_secs);
    stat_line("Solutions found", solutions);
    stat_line("Search status", report.status);
    stat_line("Memory usage (MiB)", format!("{allocated:.2}"));
    stat_line("Resident memory (MiB)", format!("{resident:.2}"));
    stat_line("Wall time (s)", format!("{search_secs:.3}"));
    stat_line("Total time (s)", format!("{:.3}", total.as_secs_f64()));
    println!("=====================================================================");
}

/// Prints mean, sample std, min, median and max per board size.
pub(crate) fn print_summary(summary: &[SizeSummary]) {
    println!("\n========================[ Benchmark Summary ]=========================");
    println!(
        "|  {:>4} {:>6} {:>11} {:>11} {:>11} {:>11} {:>11}  |",
        "Size", "Trials", "Mean (s)", "Std (s)", "Min (s)", "Median (s)", "Max (s)"
    );
    for s in summary {
        let std = s.std.map_or_else(|| "-".to_string(), |v| format!("{v:.6}"));
        println!(
            "|  {:>4} {:>6} {:>11.6} {:>11} {:>11.6} {:>11.6} {:>11.6}  |",
            s.size, s.trials, s.mean, std, s.min, s.median, s.max
        );
    }
    println!("=====================================================================");
}
