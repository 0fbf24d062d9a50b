#![no_main]

use arbitrary::Arbitrary;
use dots::world::{Position, check_invariants};
use dots::{EngineConfig, World};
use libfuzzer_sys::fuzz_target;

/// Structured input for combat fuzzing.
#[derive(Arbitrary, Debug)]
struct CombatInput {
    /// Attacker stats: strength, strike, dodge.
    attacker: [u8; 3],
    /// Defender stats: strength, strike, dodge.
    defender: [u8; 3],
    /// Defender starting hits.
    defender_hits: i16,
    /// Number of attacks to resolve.
    attacks: u8,
    /// RNG seed.
    seed: u64,
}

fuzz_target!(|input: CombatInput| {
    let config = EngineConfig::new(2, 16, 16).with_seed(input.seed);
    let Ok(mut world) = World::empty(&config) else {
        return;
    };
    let (Some(a), Some(b)) = (
        world.found_group(Position::new(0, 0)),
        world.found_group(Position::new(8, 0)),
    ) else {
        return;
    };
    let (Some(attacker), Some(defender)) = (
        world.spawn_unit(a, Position::new(4, 8)),
        world.spawn_unit(b, Position::new(5, 8)),
    ) else {
        return;
    };

    if let Some(dot) = world.dot_mut(attacker) {
        dot.strength = u32::from(input.attacker[0]);
        dot.strike = u32::from(input.attacker[1]);
        dot.dodge = u32::from(input.attacker[2]);
    }
    if let Some(dot) = world.dot_mut(defender) {
        dot.strength = u32::from(input.defender[0]);
        dot.strike = u32::from(input.defender[1]);
        dot.dodge = u32::from(input.defender[2]);
        dot.hits = i32::from(input.defender_hits).clamp(1, dot.max_hits());
    }

    for _ in 0..input.attacks {
        let before = world.dot(defender).map(|d| d.hits);
        let Some(outcome) = world.attack(attacker, Position::new(5, 8)) else {
            // The defender is gone; nothing left to hit.
            assert!(world.dot(defender).is_none());
            break;
        };
        assert!(outcome.roll.damage <= 2 * u32::from(input.attacker[0]));
        match (outcome.roll.hit, outcome.destroyed) {
            (false, _) => assert_eq!(world.dot(defender).map(|d| d.hits), before),
            (true, false) => {
                let after = world.dot(defender).map(|d| d.hits);
                assert!(after <= before);
            }
            (true, true) => {
                assert!(world.dot(defender).is_none());
                assert!(world.tile_at(Position::new(5, 8)).occupant.is_none());
            }
        }
        let violations = check_invariants(&world);
        assert!(violations.is_empty(), "Invariants violated: {violations:?}");
    }
});
