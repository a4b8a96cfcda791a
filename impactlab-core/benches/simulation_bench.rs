//! Criterion benchmarks for ImpactLab hot paths.
//!
//! Benchmarks:
//! 1. Market simulator stepping
//! 2. Trajectory generation
//! 3. Cost decomposition of an executed trajectory
//! 4. One full execution (simulate + price)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use impactlab_core::impact::CostModel;
use impactlab_core::market::{MarketParams, MarketSimulator, Scenario, PERIOD_DT};
use impactlab_core::strategy::ExecutionStrategy;

// ── 1. Simulator ─────────────────────────────────────────────────────

fn bench_simulator(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulator_step");

    for &periods in &[60usize, 120, 390] {
        group.bench_with_input(BenchmarkId::new("quiet", periods), &periods, |b, &n| {
            b.iter(|| {
                let mut sim = MarketSimulator::new(MarketParams::default(), 42);
                for _ in 0..n {
                    black_box(sim.step(PERIOD_DT, black_box(500.0)).ok());
                }
            });
        });
    }

    group.bench_function("flash_crash_120", |b| {
        b.iter(|| {
            let mut sim = MarketSimulator::new(MarketParams::default(), 42);
            sim.inject_scenario(Scenario::FlashCrash);
            for _ in 0..120 {
                black_box(sim.step(PERIOD_DT, 500.0).ok());
            }
        });
    });

    group.finish();
}

// ── 2. Trajectories ──────────────────────────────────────────────────

fn bench_trajectories(c: &mut Criterion) {
    let mut group = c.benchmark_group("trajectory");

    for strategy in ExecutionStrategy::standard_set() {
        group.bench_function(strategy.name(), |b| {
            b.iter(|| strategy.generate_trajectory(black_box(100_000.0), black_box(390)));
        });
    }

    group.finish();
}

// ── 3. Cost Model ────────────────────────────────────────────────────

fn bench_costs(c: &mut Criterion) {
    let mut group = c.benchmark_group("cost_model");

    let trajectory = ExecutionStrategy::Twap.generate_trajectory(100_000.0, 120);
    let mut sim = MarketSimulator::new(MarketParams::default(), 7);
    let states: Vec<_> = trajectory
        .iter()
        .filter_map(|&n| sim.step(PERIOD_DT, n).ok())
        .collect();
    let model = CostModel::default();

    group.bench_function("twap_120", |b| {
        b.iter(|| model.compute_costs(black_box(&trajectory), black_box(&states), 100.0));
    });

    group.finish();
}

// ── 4. Full Execution ────────────────────────────────────────────────

fn bench_execution(c: &mut Criterion) {
    let mut group = c.benchmark_group("execution");
    let model = CostModel::default();

    for strategy in ExecutionStrategy::standard_set() {
        group.bench_function(strategy.name(), |b| {
            b.iter(|| {
                let mut sim = MarketSimulator::new(MarketParams::default(), 42);
                strategy
                    .execute(100_000.0, 120, &mut sim, &model, 0)
                    .map(|r| r.metrics.total_cost_bps)
                    .ok()
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_simulator,
    bench_trajectories,
    bench_costs,
    bench_execution,
);
criterion_main!(benches);
