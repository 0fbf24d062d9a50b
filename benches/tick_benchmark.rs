//! Benchmarks for the simulation hot path: ticks, claims and draining.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::hint::black_box;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use dots::world::Position;
use dots::{EngineConfig, World};

fn world(groups: usize, size: u16) -> World {
    World::new(&EngineConfig::new(groups, size, size).with_seed(42)).unwrap()
}

fn bench_ticks(c: &mut Criterion) {
    c.bench_function("1000_ticks_8g_64x64", |b| {
        b.iter_batched(
            || world(8, 64),
            |mut world| {
                for _ in 0..1_000 {
                    black_box(world.tick());
                }
                world
            },
            BatchSize::LargeInput,
        );
    });
}

fn bench_full_cycle_grown(c: &mut Criterion) {
    // A world several hundred cycles in has many units to command.
    let mut grown = world(8, 64);
    for _ in 0..400 {
        grown.run_cycle();
    }
    grown.drain_render_changes();
    grown.drain_activities();

    c.bench_function("fresh_world_cycle", |b| {
        b.iter_batched_ref(
            || world(8, 64),
            |fresh| black_box(fresh.run_cycle()),
            BatchSize::LargeInput,
        );
    });
    c.bench_function("grown_world_cycle", |b| {
        b.iter(|| black_box(grown.run_cycle()));
    });
}

fn bench_place_and_remove(c: &mut Criterion) {
    let mut world = World::empty(&EngineConfig::new(2, 64, 64).with_seed(1)).unwrap();
    let a = world.found_group(Position::new(10, 10)).unwrap();
    world.found_group(Position::new(12, 10)).unwrap();

    let unit = world.spawn_unit(a, Position::new(11, 12)).unwrap();
    c.bench_function("place_and_remove_contested", |b| {
        b.iter(|| {
            world.remove_unit(unit);
            world.place_unit(unit, black_box(Position::new(11, 12)))
        });
    });
}

criterion_group!(benches, bench_ticks, bench_full_cycle_grown, bench_place_and_remove);
criterion_main!(benches);
