//! # Animation Manager Benchmark
//!
//! Measures the per-tick cost of a ripple-style manager carrying many
//! overlapping instances, and the query cost a painter pays each frame.

#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use lumen_core::{AnimationConfig, AnimationManager, Direction, Easing};

fn ripple_manager(instances: usize) -> AnimationManager<bool> {
    let config = AnimationConfig::new(Easing::Linear, 0.001)
        .with_secondary_increment(0.001)
        .with_multiple();
    let mut manager = AnimationManager::new(config).unwrap();
    for n in 0..instances {
        manager
            .start_with_data(Direction::InOutIn, vec![n % 2 == 0])
            .unwrap();
    }
    manager
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("manager_tick");

    for instances in [1, 16, 256] {
        group.bench_with_input(
            BenchmarkId::new("in_out_in", instances),
            &instances,
            |b, &instances| {
                let mut manager = ripple_manager(instances);
                b.iter(|| {
                    if !manager.is_animating() {
                        manager = ripple_manager(instances);
                    }
                    black_box(manager.tick());
                });
            },
        );
    }

    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("manager_query");

    for easing in [Easing::Linear, Easing::EaseInOut, Easing::ExponentialOut] {
        let mut manager: AnimationManager =
            AnimationManager::new(AnimationConfig::new(easing, 0.06)).unwrap();
        manager.start(Direction::In).unwrap();
        manager.tick();

        group.bench_function(format!("{easing:?}"), |b| {
            b.iter(|| black_box(manager.progress_at(black_box(0))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_tick, bench_query);
criterion_main!(benches);
