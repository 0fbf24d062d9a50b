#![no_main]

//! Whole-simulation fuzzer.
//!
//! Builds a world from fuzzed dimensions and seed, runs it for a bounded
//! number of ticks while draining output like a renderer would, and checks
//! invariants throughout.

use arbitrary::Arbitrary;
use dots::world::check_invariants;
use dots::{EngineConfig, World};
use libfuzzer_sys::fuzz_target;

/// Structured input for tick fuzzing.
#[derive(Arbitrary, Debug)]
struct TickInput {
    /// Requested group count.
    groups: u8,
    /// Grid width.
    width: u8,
    /// Grid height.
    height: u8,
    /// Spawn separation radius.
    spacing: u8,
    /// RNG seed.
    seed: u64,
    /// Number of ticks to simulate.
    ticks: u16,
    /// Drain render changes every this many ticks.
    drain_every: u8,
}

fuzz_target!(|input: TickInput| {
    let config = EngineConfig {
        spawn_spacing: u32::from(input.spacing % 8),
        activity_capacity: 64,
        ..EngineConfig::new(
            usize::from(input.groups % 12),
            u16::from(input.width % 40),
            u16::from(input.height % 40),
        )
        .with_seed(input.seed)
    };
    let Ok(mut world) = World::new(&config) else {
        // Zero groups or zero-sized grids are rejected up front.
        assert!(config.validate().is_err());
        return;
    };

    let drain_every = u16::from(input.drain_every).max(1);
    for tick in 0..input.ticks % 2_000 {
        if world.tick().is_none() {
            break;
        }
        if tick % drain_every == 0 {
            let changes = world.drain_render_changes();
            for change in changes {
                assert!(change.position.x >= 0 && change.position.x < world.width());
                assert!(change.position.y >= 0 && change.position.y < world.height());
            }
            assert!(world.drain_activities().len() <= 64);
        }
    }

    let violations = check_invariants(&world);
    assert!(violations.is_empty(), "Invariants violated: {violations:?}");
});
