//! End-to-end scenarios driven through the public API.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::collections::BTreeSet;
use std::thread;
use std::time::{Duration, Instant};

use dots::world::{check_invariants, Activity, Position};
use dots::{Engine, EngineConfig, World};

fn seeded(groups: usize, size: u16, seed: u64) -> EngineConfig {
    EngineConfig::new(groups, size, size).with_seed(seed)
}

#[test]
fn test_lone_city_builds_and_deploys_a_unit() {
    let mut world = World::empty(&seeded(1, 10, 5)).unwrap();
    let group = world.found_group(Position::new(5, 5)).unwrap();
    let city = *world.group(group).unwrap().dots.first().unwrap();

    // Nothing to spend during the first cycle.
    assert_eq!(world.run_cycle(), vec![group]);
    assert_eq!(world.group(group).unwrap().storage, 0);
    assert_eq!(world.dots().count(), 1);

    // Upkeep pays out the 13 tiles of the city's disc, the city builds a
    // unit and releases it onto a neighbouring tile in the same turn.
    assert_eq!(world.run_cycle(), vec![group]);
    assert_eq!(world.cycle(), 1);
    assert_eq!(world.group(group).unwrap().storage, 3);
    assert!(world.dot(city).unwrap().unit_storage.is_none());

    let unit = *world.dots().find(|d| d.is_unit()).unwrap();
    let at = unit.tile.unwrap();
    assert!(Position::new(5, 5).nearby().contains(&at));
    assert_eq!(world.tile_at(at).occupant, Some(unit.id));
    assert!(world.tile_at(at).claimants.contains(&unit.id));
    assert_eq!(world.tile_at(at).owner, Some(group));

    let activities = world.drain_activities();
    assert!(activities.iter().any(|a| matches!(
        a,
        Activity::Move { dot, from: None, to } if *dot == unit.id && *to == at
    )));
    assert!(check_invariants(&world).is_empty());
}

#[test]
fn test_stored_unit_waits_for_room() {
    let mut world = World::empty(&seeded(1, 10, 6)).unwrap();
    let group = world.found_group(Position::new(5, 5)).unwrap();
    let city = *world.group(group).unwrap().dots.first().unwrap();
    for p in Position::new(5, 5).nearby() {
        let unit = world.spawn_unit(group, p).unwrap();
        world.dot_mut(unit).unwrap().movement = 0;
    }
    world.group_mut(group).unwrap().storage = 10;

    assert_eq!(world.tick(), Some(group));
    let stored = world.dot(city).unwrap().unit_storage.unwrap();
    assert!(world.dot(stored).unwrap().tile.is_none());
    assert_eq!(world.group(group).unwrap().storage, 0);
    assert!(check_invariants(&world).is_empty());
}

#[test]
fn test_even_duel_hits_about_half_the_time() {
    let mut world = World::empty(&seeded(2, 20, 77)).unwrap();
    let a = world.found_group(Position::new(0, 0)).unwrap();
    let b = world.found_group(Position::new(10, 0)).unwrap();
    let attacker = world.spawn_unit(a, Position::new(5, 10)).unwrap();
    let defender = world.spawn_unit(b, Position::new(6, 10)).unwrap();

    let trials = 10_000;
    let mut hits = 0;
    for _ in 0..trials {
        world.dot_mut(defender).unwrap().hits = i32::MAX / 2;
        let outcome = world.attack(attacker, Position::new(6, 10)).unwrap();
        if outcome.roll.hit {
            hits += 1;
        }
    }
    let rate = f64::from(hits) / f64::from(trials);
    assert!((rate - 0.5).abs() < 0.03, "hit rate {rate}");
}

#[test]
fn test_long_run_keeps_world_consistent() {
    let mut world = World::new(&seeded(6, 40, 99)).unwrap();
    let area = 40 * 40;
    for i in 0..3_000 {
        world.tick();
        if i % 100 == 0 {
            let violations = check_invariants(&world);
            assert!(violations.is_empty(), "tick {i}: {violations:?}");
            let owned: usize = world.groups().map(|g| g.tiles.len()).sum();
            assert!(owned <= area);
        }
    }
    assert!(check_invariants(&world).is_empty());
}

#[test]
fn test_every_surviving_group_acts_once_per_cycle() {
    let mut world = World::new(&seeded(5, 48, 3)).unwrap();
    for expected_cycle in 0..30 {
        let acted = world.run_cycle();
        assert_eq!(world.cycle(), expected_cycle);
        let surviving: Vec<_> = world.groups().map(|g| g.id).collect();
        assert_eq!(acted, surviving);
        let unique: BTreeSet<_> = acted.iter().collect();
        assert_eq!(unique.len(), acted.len());
    }
}

#[test]
fn test_same_seed_same_run() {
    let run = |seed| {
        let mut world = World::new(&seeded(4, 32, seed)).unwrap();
        let mut changes = Vec::new();
        for _ in 0..400 {
            world.tick();
            changes.extend(world.drain_render_changes());
        }
        (changes, world.summaries())
    };
    assert_eq!(run(2024), run(2024));
}

#[test]
fn test_render_changes_are_coalesced_per_tile() {
    let mut world = World::empty(&seeded(1, 10, 1)).unwrap();
    let group = world.found_group(Position::new(5, 5)).unwrap();
    let unit = world.spawn_unit(group, Position::new(1, 1)).unwrap();
    world.drain_render_changes();

    world.place_unit(unit, Position::new(1, 2));
    world.place_unit(unit, Position::new(1, 3));
    let changes = world.drain_render_changes();
    let positions: BTreeSet<_> = changes.iter().map(|c| c.position).collect();
    assert_eq!(positions.len(), changes.len());

    let at = |p: Position| changes.iter().find(|c| c.position == p).unwrap();
    assert_eq!(at(Position::new(1, 1)).occupant, 0);
    assert_eq!(at(Position::new(1, 2)).occupant, 0);
    assert_eq!(at(Position::new(1, 3)).occupant, group);
    assert!(world.drain_render_changes().is_empty());
}

#[test]
fn test_engine_background_loop() {
    let config = EngineConfig {
        tick_interval_ms: 0,
        ..seeded(4, 32, 8)
    };
    let engine = Engine::new(&config).unwrap();
    let initial = engine.drain_render_changes();
    assert!(!initial.is_empty());

    engine.start();
    let deadline = Instant::now() + Duration::from_secs(10);
    while engine.with_world(World::cycle) < 5 && Instant::now() < deadline {
        let _ = engine.drain_render_changes();
        thread::sleep(Duration::from_millis(1));
    }
    engine.stop();

    assert!(engine.with_world(World::cycle) >= 5);
    assert!(engine.with_world(check_invariants).is_empty());
    assert!(!engine.summaries().is_empty());
}
