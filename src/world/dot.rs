//! Cities and units.

use rand::Rng;
use serde::Serialize;

use crate::world::{GroupId, Position};

/// Unique identifier for a dot. Never reused within a world.
pub type DotId = u32;

/// Resources spent to produce one unit.
pub const UNIT_PRODUCTION_COST: u64 = 10;

/// Tier progress required per tier level.
pub const TIER_PROGRESS_COST: u32 = 10;

/// Hit points granted per tier level.
pub const HITS_PER_TIER: i32 = 10;

/// Claim radius exerted by a city.
pub const CITY_CONTROL_RANGE: u32 = 2;

/// Claim radius exerted by a unit.
pub const UNIT_CONTROL_RANGE: u32 = 1;

/// Default engagement radius.
pub const BASE_RANGE: u32 = 2;

/// Movement points restored each cycle.
pub const MAX_MOVEMENT: u32 = 1;

/// Kind of dot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DotKind {
    /// Stationary production site.
    City,
    /// Mobile combat actor.
    Unit,
}

impl DotKind {
    /// Radius within which this kind claims tiles.
    #[must_use]
    pub const fn control_range(self) -> u32 {
        match self {
            DotKind::City => CITY_CONTROL_RANGE,
            DotKind::Unit => UNIT_CONTROL_RANGE,
        }
    }
}

/// One of the three combat stats a tier-up can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stat {
    /// Damage dice size.
    Strength,
    /// Chance to land a hit.
    Strike,
    /// Chance to avoid a hit.
    Dodge,
}

/// A city or unit belonging to a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dot {
    /// Identifier of this dot.
    pub id: DotId,
    /// Owning group.
    pub group: GroupId,
    /// City or unit.
    pub kind: DotKind,
    /// Tile currently occupied. `None` while held in a city's storage.
    pub tile: Option<Position>,
    /// Growth level, starting at 1.
    pub tier: u32,
    /// Experience towards the next tier.
    pub tier_progress: u32,
    /// Current hit points. Below 1 means destroyed.
    pub hits: i32,
    /// Damage dice size.
    pub strength: u32,
    /// Attack accuracy.
    pub strike: u32,
    /// Evasion.
    pub dodge: u32,
    /// Engagement radius.
    pub range: u32,
    /// Remaining movement points this cycle.
    pub movement: u32,
    /// Produced unit waiting to deploy (cities only).
    pub unit_storage: Option<DotId>,
}

impl Dot {
    /// Create a tier 1 dot with base stats, not yet placed on the grid.
    #[must_use]
    pub fn new(id: DotId, group: GroupId, kind: DotKind) -> Self {
        Self {
            id,
            group,
            kind,
            tile: None,
            tier: 1,
            tier_progress: 0,
            hits: HITS_PER_TIER,
            strength: 1,
            strike: 1,
            dodge: 1,
            range: BASE_RANGE,
            movement: MAX_MOVEMENT,
            unit_storage: None,
        }
    }

    /// Whether this dot is a city.
    #[must_use]
    pub fn is_city(&self) -> bool {
        self.kind == DotKind::City
    }

    /// Whether this dot is a unit.
    #[must_use]
    pub fn is_unit(&self) -> bool {
        self.kind == DotKind::Unit
    }

    /// Claim radius.
    #[must_use]
    pub const fn control_range(&self) -> u32 {
        self.kind.control_range()
    }

    /// Hit points at full health for the current tier.
    #[must_use]
    pub fn max_hits(&self) -> i32 {
        i32::try_from(self.tier)
            .unwrap_or(i32::MAX)
            .saturating_mul(HITS_PER_TIER)
    }

    /// Progress needed to reach the next tier.
    #[must_use]
    pub const fn tier_progress_required(&self) -> u32 {
        self.tier.saturating_mul(TIER_PROGRESS_COST)
    }

    /// Whether hit points have fallen below 1.
    #[must_use]
    pub const fn is_destroyed(&self) -> bool {
        self.hits < 1
    }

    /// Restore movement points to the per-cycle maximum.
    pub fn restore_movement(&mut self) {
        self.movement = MAX_MOVEMENT;
    }

    /// Spend one movement point. Returns `false` if none were left.
    pub fn spend_movement(&mut self) -> bool {
        if self.movement == 0 {
            return false;
        }
        self.movement -= 1;
        true
    }

    /// Raise a stat by one point.
    pub fn raise(&mut self, stat: Stat) {
        match stat {
            Stat::Strength => self.strength = self.strength.saturating_add(1),
            Stat::Strike => self.strike = self.strike.saturating_add(1),
            Stat::Dodge => self.dodge = self.dodge.saturating_add(1),
        }
    }

    /// Add tier progress, levelling up as many times as the gain allows.
    ///
    /// Each level carries the remainder forward, grants `1..=4` stat points
    /// spread over random stats, and fully heals. Returns the number of
    /// levels gained.
    pub fn add_tier_progress<R: Rng>(&mut self, amount: u32, rng: &mut R) -> u32 {
        self.tier_progress = self.tier_progress.saturating_add(amount);
        let mut levels = 0;
        while self.tier_progress >= self.tier_progress_required() {
            self.tier_progress -= self.tier_progress_required();
            self.tier += 1;
            levels += 1;

            let points = 1 + rng.random_range(0..4);
            for _ in 0..points {
                let stat = match rng.random_range(0..3) {
                    0 => Stat::Strength,
                    1 => Stat::Strike,
                    _ => Stat::Dodge,
                };
                self.raise(stat);
            }
            self.hits = self.max_hits();
        }
        levels
    }
}
