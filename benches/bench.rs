use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use nqueens_bench::queens::attack::AttackTable;
use nqueens_bench::queens::encoding::{PairEncoding, encode_cp, encode_sat};
use nqueens_bench::queens::{Backend, Board, EngineConfig, EnumerationMode, solve_board};
use std::hint::black_box;
use std::time::Duration;

const BACKENDS: [Backend; 3] = [Backend::Cp, Backend::Sat, Backend::Backtracking];

fn count_all(n: usize, backend: Backend, config: &EngineConfig) -> usize {
    solve_board(n, backend, config, EnumerationMode::AllSolutions, |_, _| {})
        .map(|report| report.solutions)
        .unwrap_or_default()
}

fn bench_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("encoding");
    for n in [8, 16, 32] {
        let Ok(board) = Board::new(n) else { continue };
        group.bench_with_input(BenchmarkId::new("attack table", n), &board, |b, &board| {
            b.iter(|| black_box(AttackTable::new(board)));
        });
        group.bench_with_input(BenchmarkId::new("sat unique", n), &board, |b, &board| {
            b.iter(|| black_box(encode_sat(board, PairEncoding::Unique)));
        });
        group.bench_with_input(BenchmarkId::new("sat symmetric", n), &board, |b, &board| {
            b.iter(|| black_box(encode_sat(board, PairEncoding::Symmetric)));
        });
        group.bench_with_input(BenchmarkId::new("cp", n), &board, |b, &board| {
            b.iter(|| black_box(encode_cp(board)));
        });
    }
    group.finish();
}

fn bench_all_solutions(c: &mut Criterion) {
    let config = EngineConfig::default();
    let mut group = c.benchmark_group("all solutions - backend");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(10));

    for backend in BACKENDS {
        for n in [6, 8] {
            group.bench_with_input(BenchmarkId::new(backend.to_string(), n), &n, |b, &n| {
                b.iter(|| black_box(count_all(n, backend, &config)));
            });
        }
    }
    group.finish();
}

fn bench_first_solution(c: &mut Criterion) {
    let config = EngineConfig::default();
    let mut group = c.benchmark_group("first solution - backend");
    group.sample_size(20);

    for backend in BACKENDS {
        group.bench_function(backend.to_string(), |b| {
            b.iter(|| {
                black_box(solve_board(
                    12,
                    backend,
                    &config,
                    EnumerationMode::OneSolution,
                    |_, _| {},
                ))
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_encoding,
    bench_all_solutions,
    bench_first_solution
);
criterion_main!(benches);
