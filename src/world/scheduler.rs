//! Round-robin turn scheduling and cycle upkeep.

use tracing::debug;

use crate::world::{FIRST_GROUP_ID, GroupId, Position, World};

impl World {
    /// Advance the simulation by one group's turn.
    ///
    /// Groups act in ascending id order, skipping ids that no longer exist.
    /// When the cursor passes the highest id ever assigned, upkeep runs and a
    /// new cycle starts before the next group acts. Returns the group that
    /// acted, or `None` if no groups remain.
    pub fn tick(&mut self) -> Option<GroupId> {
        loop {
            if self.groups.is_empty() {
                return None;
            }
            if self.groups.contains_key(&self.cursor) {
                let group = self.cursor;
                self.cursor += 1;
                self.take_turn(group);
                return Some(group);
            }
            if self.cursor > self.last_group_id {
                self.upkeep();
            } else {
                self.cursor += 1;
            }
        }
    }

    /// Tick through one cycle's worth of turns and return the groups that
    /// acted.
    ///
    /// Starts wherever the cursor is: a fresh world runs every group of the
    /// first cycle, a world whose cycle already finished runs upkeep first.
    pub fn run_cycle(&mut self) -> Vec<GroupId> {
        let mut acted = Vec::new();
        while let Some(group) = self.tick() {
            acted.push(group);
            if self.groups.range(self.cursor..).next().is_none() {
                break;
            }
        }
        acted
    }

    /// End the current cycle: prune dead groups, collect income, restore
    /// movement.
    fn upkeep(&mut self) {
        self.cycle += 1;
        self.cursor = FIRST_GROUP_ID;
        self.prune_eliminated();

        for group in self.groups.values_mut() {
            group.collect_income();
        }
        for dot in self.dots.values_mut().filter(|d| d.tile.is_some()) {
            dot.restore_movement();
        }
        debug!(cycle = self.cycle, groups = self.groups.len(), "cycle upkeep");
    }

    /// Drop groups with no placed dots; tiles they still own become unowned.
    fn prune_eliminated(&mut self) {
        let eliminated: Vec<GroupId> = self
            .groups
            .values()
            .filter(|g| g.is_eliminated())
            .map(|g| g.id)
            .collect();
        for id in eliminated {
            let tiles: Vec<Position> = self
                .groups
                .get(&id)
                .map(|g| g.tiles.iter().copied().collect())
                .unwrap_or_default();
            for position in tiles {
                self.set_owner(position, None);
                self.mark_dirty(position);
            }
            self.groups.remove(&id);
            debug!(group = id, "group eliminated");
        }
    }
}
