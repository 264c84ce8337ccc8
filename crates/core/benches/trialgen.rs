//! Criterion benchmarks for trial generation.
//!
//! Run with:
//!   cargo bench
//!
//! Results are saved to target/criterion/

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use syllogi::config::Config;
use syllogi::modes::Mode;
use syllogi::prng::Prng;
use syllogi::trial::generate_trial;

fn bench_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_trial");

    for mode in Mode::ALL {
        group.bench_with_input(BenchmarkId::new("mode", mode.name()), &mode, |b, &mode| {
            let config = Config {
                modes: vec![mode],
                movement: true,
                deictic: true,
                ..Config::default()
            };
            let mut cipher = None;
            let mut rng = Prng::new(42);
            b.iter(|| black_box(generate_trial(&config, 5, &mut cipher, &mut rng).unwrap()));
        });
    }

    group.finish();
}

fn bench_depths(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_trial_depth");

    for depth in [2u32, 4, 8, 16] {
        group.bench_with_input(BenchmarkId::new("linear", depth), &depth, |b, &depth| {
            let config = Config {
                modes: vec![Mode::Linear],
                cipher: true,
                ..Config::default()
            };
            let mut cipher = None;
            let mut rng = Prng::new(42);
            b.iter(|| black_box(generate_trial(&config, depth, &mut cipher, &mut rng).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_modes, bench_depths);
criterion_main!(benches);
