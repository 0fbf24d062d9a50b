//! Combat resolution.
//!
//! An attack rolls `1..=strike + dodge`; anything above the defender's
//! dodge hits, so the hit chance is `strike / (strike + dodge)`. Damage is
//! the sum of two independent rolls in `0..=strength`.

use rand::Rng;
use tracing::trace;

use crate::world::{Activity, DotId, Position, World};

/// Outcome of a single strike roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrikeRoll {
    /// Whether the strike landed.
    pub hit: bool,
    /// Damage dealt (0 on a miss).
    pub damage: u32,
}

/// Result of an attack against a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackOutcome {
    /// Dot that was attacked.
    pub defender: DotId,
    /// The strike roll.
    pub roll: StrikeRoll,
    /// Whether the defender was destroyed.
    pub destroyed: bool,
    /// Tiers the attacker gained from the kill.
    pub tiers_gained: u32,
}

/// Roll one strike of `strike`/`strength` against `dodge`.
pub fn roll_strike<R: Rng>(rng: &mut R, strike: u32, strength: u32, dodge: u32) -> StrikeRoll {
    let pool = strike.saturating_add(dodge).max(1);
    let roll = rng.random_range(1..=pool);
    if roll <= dodge {
        return StrikeRoll {
            hit: false,
            damage: 0,
        };
    }
    let damage = rng.random_range(0..=strength).saturating_add(rng.random_range(0..=strength));
    StrikeRoll { hit: true, damage }
}

/// Experience awarded for destroying a dot of the given tier.
pub fn kill_reward<R: Rng>(rng: &mut R, defender_tier: u32) -> u32 {
    defender_tier.saturating_add(rng.random_range(0..=defender_tier))
}

impl World {
    /// Attack whatever stands on `target` with `attacker`.
    ///
    /// Returns `None` if either side is missing, the target is empty, or the
    /// occupant is friendly.
    pub fn attack(&mut self, attacker: DotId, target: Position) -> Option<AttackOutcome> {
        let target = self.torus().wrap(target);
        let defender = self.grid.tile(target).occupant?;
        let (from, group, strike, strength) = {
            let a = self.dots.get(&attacker)?;
            (a.tile?, a.group, a.strike, a.strength)
        };
        let (dodge, defender_group) = {
            let d = self.dots.get(&defender)?;
            (d.dodge, d.group)
        };
        if defender_group == group {
            return None;
        }

        let roll = roll_strike(&mut self.rng, strike, strength, dodge);
        self.activity.push(Activity::Strike {
            attacker,
            from,
            to: target,
            damage: roll.hit.then_some(roll.damage),
        });
        trace!(attacker, defender, hit = roll.hit, damage = roll.damage, "strike");

        let mut outcome = AttackOutcome {
            defender,
            roll,
            destroyed: false,
            tiers_gained: 0,
        };
        if !roll.hit {
            return Some(outcome);
        }

        let defender_tier = {
            let d = self.dots.get_mut(&defender)?;
            d.hits = d
                .hits
                .saturating_sub(i32::try_from(roll.damage).unwrap_or(i32::MAX));
            if !d.is_destroyed() {
                return Some(outcome);
            }
            d.tier
        };

        let reward = kill_reward(&mut self.rng, defender_tier);
        if let Some(a) = self.dots.get_mut(&attacker) {
            outcome.tiers_gained = a.add_tier_progress(reward, &mut self.rng);
            if outcome.tiers_gained > 0 {
                self.activity.push(Activity::TierUp {
                    dot: attacker,
                    at: from,
                    tier: a.tier,
                });
            }
        }
        self.destroy_dot(defender);
        outcome.destroyed = true;
        Some(outcome)
    }
}
