//! Monte Carlo simulator throughput, sequential against parallel.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use equity_valuation::domain::entities::{Assumptions, DcfInput};
use equity_valuation::domain::services::monte_carlo::{MonteCarloConfig, MonteCarloSimulator};
use std::hint::black_box;

fn input() -> DcfInput {
    DcfInput::new(1_000.0, Assumptions::default(), 100.0)
        .with_debt(500.0)
        .with_cash(200.0)
}

fn simulate(c: &mut Criterion) {
    let input = input();
    let sequential = MonteCarloSimulator::default();
    let parallel = MonteCarloSimulator::new(MonteCarloConfig {
        parallel: true,
        ..MonteCarloConfig::default()
    });

    let mut group = c.benchmark_group("monte_carlo");
    for iterations in [1_000usize, 10_000, 100_000] {
        group.bench_with_input(
            BenchmarkId::new("sequential", iterations),
            &iterations,
            |b, &n| b.iter(|| sequential.run(black_box(&input), n, 42)),
        );
        group.bench_with_input(
            BenchmarkId::new("parallel", iterations),
            &iterations,
            |b, &n| b.iter(|| parallel.run(black_box(&input), n, 42)),
        );
    }
    group.finish();
}

criterion_group!(benches, simulate);
criterion_main!(benches);
