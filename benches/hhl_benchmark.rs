/// hhlsim Criterion benchmarks
///
/// Covers:
///   - Circuit construction
///   - Ideal state evolution of the solver block
///   - Sampling the full circuit (replay path vs noisy per-shot path)
///   - Raw gate throughput of the underlying simulator
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hhlsim::backend::{statevector, Backend, StateVectorBackend};
use hhlsim::core::{NoiseChannel, Simulator};
use hhlsim::hhl;

// ── Circuit construction ──────────────────────────────────────────────────

fn bench_build_circuit(c: &mut Criterion) {
    c.bench_function("hhl_build_circuit", |b| {
        b.iter(|| black_box(hhl::build_circuit().unwrap()))
    });
}

// ── Ideal evolution ───────────────────────────────────────────────────────

fn bench_solver_statevector(c: &mut Criterion) {
    let solver = hhl::solver().unwrap();
    c.bench_function("hhl_solver_statevector", |b| {
        b.iter(|| black_box(statevector(black_box(&solver)).unwrap()))
    });
}

// ── Sampling ──────────────────────────────────────────────────────────────

fn bench_sampling(c: &mut Criterion) {
    let circuit = hhl::build_circuit().unwrap();
    let mut group = c.benchmark_group("hhl_sampling");
    for shots in [100u64, 1000] {
        let ideal = StateVectorBackend::new().with_seed(1);
        group.bench_with_input(BenchmarkId::new("ideal", shots), &shots, |b, &shots| {
            b.iter(|| ideal.run(&circuit, black_box(shots)).unwrap())
        });
        let noisy = StateVectorBackend::new()
            .with_seed(1)
            .with_noise(NoiseChannel::Depolarizing { prob: 0.01 });
        group.bench_with_input(BenchmarkId::new("depolarizing", shots), &shots, |b, &shots| {
            b.iter(|| noisy.run(&circuit, black_box(shots)).unwrap())
        });
    }
    group.finish();
}

// ── Gate throughput ───────────────────────────────────────────────────────

fn bench_controlled_rotations(c: &mut Criterion) {
    let mut group = c.benchmark_group("controlled_rotations");
    for n in [6usize, 10, 14] {
        group.bench_with_input(BenchmarkId::new("CRY", n), &n, |b, &n| {
            b.iter(|| {
                let mut sim = Simulator::with_seed(n, 0);
                sim.h(0);
                for q in 1..n {
                    sim.cry(black_box(0), black_box(q), 0.3);
                }
            });
        });
        group.bench_with_input(BenchmarkId::new("CSWAP", n), &n, |b, &n| {
            b.iter(|| {
                let mut sim = Simulator::with_seed(n, 0);
                sim.h(0).x(1);
                for q in 2..n {
                    sim.cswap(black_box(0), black_box(1), black_box(q));
                }
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_build_circuit,
    bench_solver_statevector,
    bench_sampling,
    bench_controlled_rotations,
);
criterion_main!(benches);
