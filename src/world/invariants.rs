//! World invariants: sanity checks that detect bugs.
//!
//! These should never trigger on a world driven through its public
//! operations. Tests and the soak harness run them after every tick.

use std::collections::BTreeSet;

use crate::world::World;

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

fn violation(violations: &mut Vec<InvariantViolation>, message: String) {
    violations.push(InvariantViolation { message });
}

/// Check all world invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(world: &World) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let torus = *world.torus();

    for (position, tile) in world.grid().iter() {
        // Claimants must be live, placed, and within their control range.
        for &id in &tile.claimants {
            match world.dot(id) {
                None => violation(
                    &mut violations,
                    format!("Tile {position} is claimed by missing dot {id}"),
                ),
                Some(dot) => {
                    let reaches = dot.tile.is_some_and(|at| {
                        torus
                            .in_range(at, dot.control_range())
                            .any(|p| p == position)
                    });
                    if !reaches {
                        violation(
                            &mut violations,
                            format!("Tile {position} is claimed by dot {id} out of range"),
                        );
                    }
                }
            }
        }

        let claiming = world.claiming_groups(position);
        if let Some(owner) = tile.owner {
            if claiming.len() > 1 {
                violation(
                    &mut violations,
                    format!("Contested tile {position} is owned by group {owner}"),
                );
            }
            if !world.group(owner).is_some_and(|g| g.tiles.contains(&position)) {
                violation(
                    &mut violations,
                    format!("Tile {position} owned by {owner} is missing from its tile set"),
                );
            }
        }
        if claiming.len() == 1 && tile.owner != claiming.first().copied() {
            violation(
                &mut violations,
                format!(
                    "Tile {position} is claimed only by {:?} but owned by {:?}",
                    claiming.first(),
                    tile.owner
                ),
            );
        }

        if let Some(id) = tile.occupant {
            let placed_here = world.dot(id).is_some_and(|d| d.tile == Some(position));
            if !placed_here {
                violation(
                    &mut violations,
                    format!("Occupant {id} of {position} is not placed there"),
                );
            }
            if !tile.claimants.contains(&id) {
                violation(
                    &mut violations,
                    format!("Occupant {id} of {position} does not claim its own tile"),
                );
            }
        }
    }

    let mut seen_tiles = BTreeSet::new();
    for group in world.groups() {
        for &position in &group.tiles {
            if world.tile_at(position).owner != Some(group.id) {
                violation(
                    &mut violations,
                    format!("Group {} lists {position} but does not own it", group.id),
                );
            }
            if !seen_tiles.insert(position) {
                violation(
                    &mut violations,
                    format!("Tile {position} appears in more than one group"),
                );
            }
        }
        for &id in &group.dots {
            if world.dot(id).is_none_or(|d| d.group != group.id) {
                violation(
                    &mut violations,
                    format!("Group {} lists dot {id} it does not hold", group.id),
                );
            }
        }
    }

    for dot in world.dots() {
        if dot.tier_progress >= dot.tier_progress_required() {
            violation(
                &mut violations,
                format!(
                    "Dot {} has tier progress {} at tier {}",
                    dot.id, dot.tier_progress, dot.tier
                ),
            );
        }
        if dot.hits > dot.max_hits() {
            violation(
                &mut violations,
                format!("Dot {} has {} hits over its max {}", dot.id, dot.hits, dot.max_hits()),
            );
        }
        if let Some(at) = dot.tile
            && world.tile_at(at).occupant != Some(dot.id)
        {
            violation(
                &mut violations,
                format!("Dot {} thinks it stands on {at} but is not the occupant", dot.id),
            );
        }
    }

    violations
}

/// Panic in debug builds if any invariant is violated.
///
/// # Panics
///
/// Panics (in debug builds only) with the list of violations.
pub fn assert_invariants(world: &World) {
    if cfg!(debug_assertions) {
        let violations = check_invariants(world);
        assert!(
            violations.is_empty(),
            "World invariants violated:\n{}",
            violations
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n")
        );
    }
}
