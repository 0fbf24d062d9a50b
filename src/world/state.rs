//! World state: the entity arena and spawning.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::ConfigError;
use crate::world::{
    Activity, ActivityLog, Dot, DotId, DotKind, FIRST_GROUP_ID, Grid, Group, GroupId,
    GroupSummary, Position, RenderBuffer, RenderChange, Tile, Torus,
};

/// Complete simulation state.
///
/// Dots, groups and tiles refer to each other by id only; every
/// cross-reference is resolved through the maps held here.
#[derive(Debug)]
pub struct World {
    pub(crate) grid: Grid,
    pub(crate) dots: BTreeMap<DotId, Dot>,
    pub(crate) groups: BTreeMap<GroupId, Group>,
    next_dot_id: DotId,
    /// Highest group id ever handed out (0 before the first spawn).
    pub(crate) last_group_id: GroupId,
    /// Completed full cycles.
    pub(crate) cycle: u64,
    /// Next group id to consider for a turn.
    pub(crate) cursor: GroupId,
    pub(crate) rng: StdRng,
    pub(crate) render: RenderBuffer,
    pub(crate) activity: ActivityLog,
}

impl World {
    /// Build a world and spawn its initial groups.
    ///
    /// Each group starts with one city. Spawn points are drawn uniformly from
    /// the cells not within `spawn_spacing` of an earlier spawn; if the map
    /// runs out of room fewer groups are created.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration is invalid.
    pub fn new(config: &EngineConfig) -> Result<Self, ConfigError> {
        let mut world = Self::empty(config)?;
        let spawned = world.spawn_initial_groups(config.group_count, config.spawn_spacing);
        if spawned < config.group_count {
            warn!(
                requested = config.group_count,
                spawned, "ran out of spawn points"
            );
        }
        info!(
            width = config.width,
            height = config.height,
            groups = spawned,
            "world created"
        );
        Ok(world)
    }

    /// Build a world with no groups.
    ///
    /// `group_count` is ignored. Useful for arranging scenarios by hand with
    /// [`World::found_group`] and [`World::spawn_unit`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the dimensions are invalid.
    pub fn empty(config: &EngineConfig) -> Result<Self, ConfigError> {
        EngineConfig {
            group_count: config.group_count.max(1),
            ..*config
        }
        .validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Ok(Self {
            grid: Grid::new(Torus::new(config.width, config.height)),
            dots: BTreeMap::new(),
            groups: BTreeMap::new(),
            next_dot_id: 1,
            last_group_id: 0,
            cycle: 0,
            cursor: FIRST_GROUP_ID,
            rng,
            render: RenderBuffer::default(),
            activity: ActivityLog::new(config.activity_capacity),
        })
    }

    fn spawn_initial_groups(&mut self, count: usize, spacing: u32) -> usize {
        let torus = *self.torus();
        let mut available = vec![true; torus.area()];
        let mut spawned = 0;

        while spawned < count {
            let candidates: Vec<Position> = torus
                .positions()
                .filter(|&p| available[torus.index(p)])
                .collect();
            let Some(&spawn) = candidates.choose(&mut self.rng) else {
                break;
            };
            for blocked in torus.in_range(spawn, spacing) {
                available[torus.index(blocked)] = false;
            }
            self.found_group(spawn);
            spawned += 1;
        }
        spawned
    }

    /// Create a new group with a single city at `position`.
    ///
    /// Returns `None` if the tile is already occupied.
    pub fn found_group(&mut self, position: Position) -> Option<GroupId> {
        let position = self.torus().wrap(position);
        if !self.grid.tile(position).is_empty() {
            return None;
        }
        let id = self.last_group_id + 1;
        self.last_group_id = id;
        self.groups.insert(id, Group::new(id));
        self.spawn_dot(id, DotKind::City, position);
        debug!(group = id, %position, "group founded");
        Some(id)
    }

    /// Create a tier 1 unit for `group` directly on the grid.
    ///
    /// Returns `None` if the group does not exist or the tile is occupied.
    pub fn spawn_unit(&mut self, group: GroupId, position: Position) -> Option<DotId> {
        let position = self.torus().wrap(position);
        if !self.groups.contains_key(&group) || !self.grid.tile(position).is_empty() {
            return None;
        }
        Some(self.spawn_dot(group, DotKind::Unit, position))
    }

    fn spawn_dot(&mut self, group: GroupId, kind: DotKind, position: Position) -> DotId {
        let id = self.create_dot(group, kind);
        self.enlist(id);
        self.place_unit(id, position);
        id
    }

    /// Allocate a dot in the arena without placing it or enlisting it.
    pub(crate) fn create_dot(&mut self, group: GroupId, kind: DotKind) -> DotId {
        let id = self.next_dot_id;
        self.next_dot_id += 1;
        self.dots.insert(id, Dot::new(id, group, kind));
        id
    }

    /// Add an arena dot to its group's roster.
    pub(crate) fn enlist(&mut self, id: DotId) {
        let Some(group) = self.dots.get(&id).map(|d| d.group) else {
            return;
        };
        if let Some(group) = self.groups.get_mut(&group) {
            group.dots.insert(id);
        }
    }

    /// Remove a dot from the grid, its group and the arena.
    ///
    /// A city's stored unit goes with it.
    pub(crate) fn destroy_dot(&mut self, id: DotId) {
        let Some(at) = self.dots.get(&id).and_then(|d| d.tile) else {
            return;
        };
        self.remove_unit(id);
        let Some(dot) = self.dots.remove(&id) else {
            return;
        };
        if let Some(group) = self.groups.get_mut(&dot.group) {
            group.dots.remove(&id);
        }
        if let Some(stored) = dot.unit_storage {
            self.dots.remove(&stored);
        }
        self.activity.push(Activity::Destroyed {
            dot: id,
            group: dot.group,
            at,
        });
    }

    /// Queue a render record reflecting the tile's current state.
    pub(crate) fn mark_dirty(&mut self, position: Position) {
        let tile = self.grid.tile(position);
        let occupant = tile
            .occupant
            .and_then(|id| self.dots.get(&id))
            .map(|dot| dot.group);
        let owner = tile.owner;
        self.render.record(position, owner, occupant);
    }

    /// The coordinate space.
    #[must_use]
    pub fn torus(&self) -> &Torus {
        self.grid.torus()
    }

    /// Grid width.
    #[must_use]
    pub fn width(&self) -> i32 {
        self.torus().width()
    }

    /// Grid height.
    #[must_use]
    pub fn height(&self) -> i32 {
        self.torus().height()
    }

    /// The tile store.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Tile at any position (wrapped).
    #[must_use]
    pub fn tile_at(&self, position: Position) -> &Tile {
        self.grid.tile(position)
    }

    /// Look up a dot, including units held in city storage.
    #[must_use]
    pub fn dot(&self, id: DotId) -> Option<&Dot> {
        self.dots.get(&id)
    }

    /// Mutable access to a dot's stats, for arranging scenarios.
    ///
    /// Changing `tile`, `group`, `kind` or `unit_storage` through this
    /// reference breaks the world's consistency.
    #[must_use]
    pub fn dot_mut(&mut self, id: DotId) -> Option<&mut Dot> {
        self.dots.get_mut(&id)
    }

    /// Every dot in the arena.
    pub fn dots(&self) -> impl Iterator<Item = &Dot> {
        self.dots.values()
    }

    /// Look up a group.
    #[must_use]
    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(&id)
    }

    /// Mutable access to a group's economy, for arranging scenarios.
    #[must_use]
    pub fn group_mut(&mut self, id: GroupId) -> Option<&mut Group> {
        self.groups.get_mut(&id)
    }

    /// Every surviving group in ascending id order.
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    /// Summaries of every surviving group.
    #[must_use]
    pub fn summaries(&self) -> Vec<GroupSummary> {
        self.groups.values().map(Group::summary).collect()
    }

    /// Completed full cycles.
    #[must_use]
    pub const fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Take all pending render records.
    pub fn drain_render_changes(&mut self) -> Vec<RenderChange> {
        self.render.drain()
    }

    /// Take all pending activity records.
    pub fn drain_activities(&mut self) -> Vec<Activity> {
        self.activity.drain()
    }
}
