//! Long generation runs over a small branching catalog.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ledge_common::{Aabb, Vec2};
use ledge_levelgen::prelude::*;

fn piece(name: &str, width: f32, exits: &[(f32, f32)]) -> ChunkTemplate {
    ChunkTemplate::boxed(
        name,
        Aabb::new(Vec2::new(0.0, -1.0), Vec2::new(width, 0.0)),
        Vec2::ZERO,
        exits.iter().map(|&(x, y)| Vec2::new(x, y)).collect(),
    )
}

fn catalog() -> Catalog {
    Catalog::from_templates(vec![
        piece("flat", 4.0, &[(4.0, 0.0)]),
        piece("step_up", 3.0, &[(3.0, 1.0)]),
        piece("step_down", 3.0, &[(3.0, -1.0)]),
        piece("fork", 4.0, &[(4.0, 3.0), (4.0, -3.0)]),
        piece("pit", 2.0, &[]),
    ])
    .expect("catalog")
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_level");
    for distance in [100.0f32, 1_000.0, 5_000.0] {
        group.bench_with_input(BenchmarkId::from_parameter(distance), &distance, |b, &distance| {
            b.iter(|| {
                let mut generator = LevelGenerator::from_config(
                    GeneratorConfig::with_seed(0xC0FFEE),
                    catalog(),
                    piece("start", 4.0, &[(4.0, 0.0)]),
                )
                .expect("generator");
                generator.generate_level_start(distance).expect("start");
                black_box(generator.index().len())
            });
        });
    }
    group.finish();
}

fn bench_streaming(c: &mut Criterion) {
    c.bench_function("session_update_per_tick", |b| {
        b.iter(|| {
            let generator = LevelGenerator::from_config(
                GeneratorConfig::with_seed(7),
                catalog(),
                piece("start", 4.0, &[(4.0, 0.0)]),
            )
            .expect("generator");
            let mut session = LevelSession::new(generator);
            let spawn = session.start().expect("start");
            for tick in 0..2_000u16 {
                black_box(session.update(spawn.x + f32::from(tick) * 0.25));
            }
        });
    });
}

criterion_group!(benches, bench_generate, bench_streaming);
criterion_main!(benches);
