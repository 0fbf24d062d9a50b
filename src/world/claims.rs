//! Claim bookkeeping and tile ownership resolution.
//!
//! Every dot claims the disc of tiles within its control range around the
//! tile it stands on. After any change to a tile's claimant set the tile's
//! owner is re-derived from the distinct groups still claiming it:
//!
//! - nobody claims it: the owner is left as it was
//! - the owner no longer claims it, or two or more groups claim it:
//!   ownership is cleared
//! - exactly one group claims an unowned tile: that group takes it
//!
//! A contested tile therefore stays unowned until all but one group has
//! withdrawn, regardless of how many claims each side has.

use std::collections::BTreeSet;

use tracing::trace;

use crate::world::{Activity, DotId, GroupId, Position, World};

impl World {
    /// Put a dot on a tile, lifting it from its current tile first.
    ///
    /// The dot becomes the tile's occupant and claims every tile within its
    /// control range. Returns `false` and changes nothing if the dot does not
    /// exist or another dot already stands on the target.
    pub fn place_unit(&mut self, dot: DotId, to: Position) -> bool {
        let to = self.torus().wrap(to);
        let Some((from, range)) = self.dots.get(&dot).map(|d| (d.tile, d.control_range())) else {
            return false;
        };
        if self.grid.tile(to).occupant.is_some_and(|o| o != dot) {
            return false;
        }

        self.remove_unit(dot);
        if let Some(d) = self.dots.get_mut(&dot) {
            d.tile = Some(to);
        }
        self.grid.tile_mut(to).occupant = Some(dot);
        self.mark_dirty(to);

        let claimed: Vec<Position> = self.torus().in_range(to, range).collect();
        for position in claimed {
            self.claim(position, dot);
        }

        trace!(dot, ?from, %to, "placed");
        self.activity.push(Activity::Move { dot, from, to });
        true
    }

    /// Lift a dot off the grid, releasing all of its claims.
    ///
    /// The dot stays in the arena with no tile. No-op if it is not placed.
    pub fn remove_unit(&mut self, dot: DotId) {
        let Some((at, range)) = self
            .dots
            .get(&dot)
            .and_then(|d| d.tile.map(|t| (t, d.control_range())))
        else {
            return;
        };

        let released: Vec<Position> = self.torus().in_range(at, range).collect();
        for position in released {
            self.release(position, dot);
        }

        let tile = self.grid.tile_mut(at);
        if tile.occupant == Some(dot) {
            tile.occupant = None;
        }
        if let Some(d) = self.dots.get_mut(&dot) {
            d.tile = None;
        }
        self.mark_dirty(at);
    }

    fn claim(&mut self, position: Position, dot: DotId) {
        self.grid.tile_mut(position).claimants.insert(dot);
        self.resolve(position);
    }

    fn release(&mut self, position: Position, dot: DotId) {
        self.grid.tile_mut(position).claimants.remove(&dot);
        self.resolve(position);
    }

    /// Distinct groups among a tile's claimants.
    #[must_use]
    pub fn claiming_groups(&self, position: Position) -> BTreeSet<GroupId> {
        self.grid
            .tile(position)
            .claimants
            .iter()
            .filter_map(|id| self.dots.get(id).map(|d| d.group))
            .collect()
    }

    /// Re-derive a tile's owner from its current claimants.
    ///
    /// Idempotent: resolving twice with the same claimants changes nothing.
    pub(crate) fn resolve(&mut self, position: Position) {
        let position = self.torus().wrap(position);
        let claiming = self.claiming_groups(position);
        if claiming.is_empty() {
            return;
        }

        let current = self.grid.tile(position).owner;
        let mut changed = false;

        if let Some(owner) = current
            && (claiming.len() > 1 || !claiming.contains(&owner))
        {
            self.set_owner(position, None);
            changed = true;
        }

        if self.grid.tile(position).owner.is_none()
            && claiming.len() == 1
            && let Some(&sole) = claiming.first()
        {
            self.set_owner(position, Some(sole));
            changed = true;
        }

        if changed {
            self.mark_dirty(position);
        }
    }

    /// Move a tile between group tile sets, keeping both sides in step.
    pub(crate) fn set_owner(&mut self, position: Position, owner: Option<GroupId>) {
        let tile = self.grid.tile_mut(position);
        let previous = tile.owner;
        tile.owner = owner;
        if let Some(previous) = previous
            && let Some(group) = self.groups.get_mut(&previous)
        {
            group.tiles.remove(&position);
        }
        if let Some(owner) = owner
            && let Some(group) = self.groups.get_mut(&owner)
        {
            group.tiles.insert(position);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::EngineConfig;
    use crate::world::{check_invariants, DotKind, World};

    use super::*;

    fn world() -> World {
        World::empty(&EngineConfig::new(1, 12, 12).with_seed(5)).unwrap()
    }

    fn claims(world: &World) -> Vec<Vec<DotId>> {
        world
            .grid()
            .iter()
            .map(|(_, t)| t.claimants.iter().copied().collect())
            .collect()
    }

    fn snapshot(world: &World) -> Vec<(Position, Option<GroupId>, Vec<DotId>)> {
        world
            .grid()
            .iter()
            .map(|(p, t)| (p, t.owner, t.claimants.iter().copied().collect()))
            .collect()
    }

    #[test]
    fn test_unit_claims_its_disc() {
        let mut world = world();
        let a = world.found_group(Position::new(0, 0)).unwrap();
        let unit = world.spawn_unit(a, Position::new(6, 6)).unwrap();

        for p in [
            Position::new(6, 6),
            Position::new(5, 6),
            Position::new(7, 6),
            Position::new(6, 5),
            Position::new(6, 7),
        ] {
            assert!(world.tile_at(p).claimants.contains(&unit));
            assert_eq!(world.tile_at(p).owner, Some(a));
        }
        assert!(world.tile_at(Position::new(7, 7)).claimants.is_empty());
        assert_eq!(world.tile_at(Position::new(6, 6)).occupant, Some(unit));
    }

    #[test]
    fn test_contested_tile_is_unowned() {
        let mut world = world();
        let a = world.found_group(Position::new(0, 0)).unwrap();
        let b = world.found_group(Position::new(0, 6)).unwrap();
        world.spawn_unit(a, Position::new(6, 6)).unwrap();
        world.spawn_unit(b, Position::new(8, 6)).unwrap();

        // (7, 6) is within range 1 of both units.
        let shared = Position::new(7, 6);
        assert_eq!(world.claiming_groups(shared).len(), 2);
        assert_eq!(world.tile_at(shared).owner, None);
        assert!(!world.group(a).unwrap().tiles.contains(&shared));
        assert!(!world.group(b).unwrap().tiles.contains(&shared));
        assert!(check_invariants(&world).is_empty());
    }

    #[test]
    fn test_sole_remaining_claimant_takes_tile() {
        let mut world = world();
        let a = world.found_group(Position::new(0, 0)).unwrap();
        let b = world.found_group(Position::new(0, 6)).unwrap();
        let ua = world.spawn_unit(a, Position::new(6, 6)).unwrap();
        let ub = world.spawn_unit(b, Position::new(8, 6)).unwrap();
        let shared = Position::new(7, 6);
        assert_eq!(world.tile_at(shared).owner, None);

        // Once A leaves, B is the sole claimant and takes the tile.
        world.remove_unit(ua);
        assert_eq!(world.tile_at(shared).owner, Some(b));

        // B leaving leaves nobody: the tile keeps its last owner.
        world.remove_unit(ub);
        assert!(world.tile_at(shared).claimants.is_empty());
        assert_eq!(world.tile_at(shared).owner, Some(b));
        assert!(world.group(b).unwrap().tiles.contains(&shared));
    }

    #[test]
    fn test_owner_cleared_when_foreign_group_takes_over() {
        let mut world = world();
        let a = world.found_group(Position::new(0, 0)).unwrap();
        let b = world.found_group(Position::new(0, 6)).unwrap();
        let ua = world.spawn_unit(a, Position::new(6, 6)).unwrap();
        world.remove_unit(ua);
        let left_behind = Position::new(6, 6);
        assert_eq!(world.tile_at(left_behind).owner, Some(a));

        world.spawn_unit(b, Position::new(6, 7)).unwrap();
        assert_eq!(world.tile_at(left_behind).owner, Some(b));
        assert!(!world.group(a).unwrap().tiles.contains(&left_behind));
    }

    #[test]
    fn test_place_then_remove_restores_claims() {
        let mut world = world();
        let a = world.found_group(Position::new(0, 0)).unwrap();
        let b = world.found_group(Position::new(0, 6)).unwrap();
        world.spawn_unit(b, Position::new(8, 6)).unwrap();

        let unit = world.create_dot(a, DotKind::Unit);
        world.enlist(unit);
        let before = claims(&world);

        assert!(world.place_unit(unit, Position::new(6, 6)));
        world.remove_unit(unit);
        assert_eq!(claims(&world), before);
    }

    #[test]
    fn test_place_then_remove_restores_ownership_in_claimed_land() {
        let mut world = world();
        let a = world.found_group(Position::new(0, 0)).unwrap();
        let b = world.found_group(Position::new(0, 6)).unwrap();
        let unit = world.create_dot(a, DotKind::Unit);
        world.enlist(unit);
        let before = snapshot(&world);

        // Every tile of the unit's disc lies inside B's city radius, so the
        // intrusion contests them and withdrawing hands them back.
        assert!(world.place_unit(unit, Position::new(0, 7)));
        assert_eq!(world.tile_at(Position::new(0, 8)).owner, None);
        world.remove_unit(unit);
        assert_eq!(snapshot(&world), before);
        assert_eq!(world.tile_at(Position::new(0, 8)).owner, Some(b));
    }

    #[test]
    fn test_move_releases_old_claims() {
        let mut world = world();
        let a = world.found_group(Position::new(0, 0)).unwrap();
        let unit = world.spawn_unit(a, Position::new(6, 6)).unwrap();
        assert!(world.place_unit(unit, Position::new(6, 7)));

        assert_eq!(world.tile_at(Position::new(6, 6)).occupant, None);
        assert!(!world.tile_at(Position::new(6, 5)).claimants.contains(&unit));
        assert!(world.tile_at(Position::new(6, 8)).claimants.contains(&unit));
        assert_eq!(world.dot(unit).unwrap().tile, Some(Position::new(6, 7)));
    }

    #[test]
    fn test_place_onto_occupied_tile_is_refused() {
        let mut world = world();
        let a = world.found_group(Position::new(0, 0)).unwrap();
        let b = world.found_group(Position::new(0, 6)).unwrap();
        let ua = world.spawn_unit(a, Position::new(5, 10)).unwrap();
        let ub = world.spawn_unit(b, Position::new(6, 10)).unwrap();
        let before = snapshot(&world);

        assert!(!world.place_unit(ua, Position::new(6, 10)));
        assert!(!world.place_unit(ua, Position::new(18, 10)));
        assert_eq!(snapshot(&world), before);
        assert_eq!(world.dot(ua).unwrap().tile, Some(Position::new(5, 10)));
        assert_eq!(world.tile_at(Position::new(6, 10)).occupant, Some(ub));
        assert!(check_invariants(&world).is_empty());

        // Standing still is allowed.
        assert!(world.place_unit(ua, Position::new(5, 10)));
        assert!(check_invariants(&world).is_empty());
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let mut world = world();
        let a = world.found_group(Position::new(3, 3)).unwrap();
        let before = snapshot(&world);
        let _ = world.drain_render_changes();
        for (p, _, _) in &before {
            world.resolve(*p);
        }
        assert_eq!(snapshot(&world), before);
        assert!(world.drain_render_changes().is_empty());
        assert_eq!(world.group(a).unwrap().tiles.len(), 13);
    }

    #[test]
    fn test_claims_on_narrow_torus() {
        // A radius 2 disc wraps onto itself on a 3x3 torus.
        let mut world = World::empty(&EngineConfig::new(1, 3, 3).with_seed(1)).unwrap();
        let a = world.found_group(Position::new(1, 1)).unwrap();
        assert_eq!(world.group(a).unwrap().tiles.len(), 9);
        let city = *world.group(a).unwrap().dots.first().unwrap();
        world.remove_unit(city);
        assert!(world.grid().iter().all(|(_, t)| t.claimants.is_empty()));
    }
}
