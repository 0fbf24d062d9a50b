#![no_main]

//! Claim bookkeeping fuzzer.
//!
//! Spawns, moves and lifts units of three groups on a small torus and checks
//! world invariants after every step. Coordinates are unbounded so wrapping
//! is exercised too.

use arbitrary::Arbitrary;
use dots::world::{DotId, Position, check_invariants};
use dots::{EngineConfig, World};
use libfuzzer_sys::fuzz_target;

/// A fuzzer-generated placement step.
#[derive(Arbitrary, Debug, Clone, Copy)]
enum Step {
    /// Spawn a unit for a group.
    Spawn { group: u8, x: i8, y: i8 },
    /// Move a previously spawned unit.
    Move { pick: u8, x: i8, y: i8 },
    /// Lift a previously spawned unit off the grid.
    Lift { pick: u8 },
}

/// Structured input for claim fuzzing.
#[derive(Arbitrary, Debug)]
struct ClaimsInput {
    /// Grid width and height.
    size: (u8, u8),
    /// Steps to apply.
    steps: Vec<Step>,
}

fuzz_target!(|input: ClaimsInput| {
    let width = u16::from(input.size.0 % 16).max(3);
    let height = u16::from(input.size.1 % 16).max(3);
    let Ok(mut world) = World::empty(&EngineConfig::new(3, width, height).with_seed(0)) else {
        return;
    };
    for (x, y) in [(0, 0), (1, 1), (2, 2)] {
        world.found_group(Position::new(x, y));
    }

    let mut units: Vec<DotId> = Vec::new();
    for step in input.steps.into_iter().take(64) {
        match step {
            Step::Spawn { group, x, y } => {
                let group = u32::from(group % 3) + 1;
                if let Some(id) =
                    world.spawn_unit(group, Position::new(i32::from(x), i32::from(y)))
                {
                    units.push(id);
                }
            }
            Step::Move { pick, x, y } => {
                let Some(&unit) = units.get(usize::from(pick) % units.len().max(1)) else {
                    continue;
                };
                let to = world.torus().wrap(Position::new(i32::from(x), i32::from(y)));
                if world.tile_at(to).is_empty() {
                    world.place_unit(unit, to);
                }
            }
            Step::Lift { pick } => {
                if let Some(&unit) = units.get(usize::from(pick) % units.len().max(1)) {
                    world.remove_unit(unit);
                }
            }
        }
        let violations = check_invariants(&world);
        assert!(violations.is_empty(), "Invariants violated: {violations:?}");
    }
});
