//! Benchmarks for the CPU emitter loop.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use spritefx::prelude::*;
use spritefx::expression::PathExpr;

fn art() -> Vec<ParticleArt> {
    vec![TextureHandle::new(1).into(), TextureHandle::in_atlas(2, 1).into()]
}

fn fountain(max: i64) -> EmitterConfig {
    EmitterConfig::new()
        .with_alpha(1.0, 0.0)
        .with_speed(300.0, 0.0)
        .with_scale(1.0, 0.1, 0.5)
        .with_color("#ffffff", "#3377ff")
        .with_start_rotation(240.0, 300.0)
        .with_rotation_speed(-90.0, 90.0)
        .with_lifetime(0.5, 2.0)
        .with_spawn_circle(0.0, 0.0, 20.0)
        .with_frequency(0.0005)
        .with_max_particles(max)
}

fn bench_steady_state(c: &mut Criterion) {
    let mut group = c.benchmark_group("emitter_update");

    for &max in &[100i64, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::new("fountain", max), &max, |b, &max| {
            let mut emitter = Emitter::new(DisplayList::batched())
                .with_rng(SmallRng::seed_from_u64(42));
            emitter.init(art(), &fountain(max));
            emitter.jump_forward_in_time(2.0);
            b.iter(|| emitter.update(black_box(1.0 / 60.0)))
        });
    }

    group.bench_function("moving_owner", |b| {
        let mut emitter = Emitter::new(DisplayList::new()).with_rng(SmallRng::seed_from_u64(7));
        emitter.init(art(), &fountain(1_000));
        let mut t = 0.0f32;
        b.iter(|| {
            t += 1.0 / 60.0;
            emitter.update_owner_pos(t.cos() * 200.0, t.sin() * 200.0);
            emitter.update(black_box(1.0 / 60.0));
        })
    });

    group.finish();
}

fn bench_instances(c: &mut Criterion) {
    let mut emitter = Emitter::new(DisplayList::batched()).with_rng(SmallRng::seed_from_u64(1));
    emitter.init(art(), &fountain(10_000));
    emitter.jump_forward_in_time(2.0);
    let mut out = Vec::with_capacity(10_000);

    c.bench_function("write_instances_10k", |b| {
        b.iter(|| {
            out.clear();
            emitter.write_instances(&mut out);
            black_box(out.len())
        })
    });
}

fn bench_path_expr(c: &mut Criterion) {
    let mut group = c.benchmark_group("path_expr");

    group.bench_function("parse", |b| {
        b.iter(|| PathExpr::parse(black_box("sin(x / 20) * 30 + pow(x, 0.5)")))
    });

    let expr = PathExpr::parse("sin(x / 20) * 30 + pow(x, 0.5)").unwrap();
    group.bench_function("eval", |b| b.iter(|| expr.eval(black_box(123.4))));

    group.finish();
}

criterion_group!(benches, bench_steady_state, bench_instances, bench_path_expr);
criterion_main!(benches);
