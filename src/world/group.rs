//! Factions.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::world::{DotId, Position};

/// Unique identifier for a group. Ids start at 1; 0 means "none".
pub type GroupId = u32;

/// First id handed out to a group.
pub const FIRST_GROUP_ID: GroupId = 1;

/// A faction owning dots and territory.
#[derive(Debug, Clone, Default)]
pub struct Group {
    /// Identifier of this group.
    pub id: GroupId,
    /// Placed dots belonging to this group.
    pub dots: BTreeSet<DotId>,
    /// Tiles this group controls. Maintained by claim resolution only.
    pub tiles: BTreeSet<Position>,
    /// Income collected at the previous upkeep.
    pub last_income: u64,
    /// Income collected at the most recent upkeep.
    pub current_income: u64,
    /// Accumulated resources.
    pub storage: u64,
}

impl Group {
    /// Create an empty group.
    #[must_use]
    pub fn new(id: GroupId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Whether the group has no placed dots left.
    #[must_use]
    pub fn is_eliminated(&self) -> bool {
        self.dots.is_empty()
    }

    /// Collect one cycle of income: one resource per owned tile.
    pub fn collect_income(&mut self) {
        self.last_income = self.current_income;
        self.current_income = self.tiles.len() as u64;
        self.storage = self.storage.saturating_add(self.current_income);
    }

    /// Spend `cost` from storage if affordable.
    pub fn try_spend(&mut self, cost: u64) -> bool {
        if self.storage < cost {
            return false;
        }
        self.storage -= cost;
        true
    }

    /// Read-only summary for presentation layers.
    #[must_use]
    pub fn summary(&self) -> GroupSummary {
        GroupSummary {
            id: self.id,
            dots: self.dots.len(),
            tiles: self.tiles.len(),
            last_income: self.last_income,
            current_income: self.current_income,
            storage: self.storage,
        }
    }
}

/// Snapshot of a group's size and economy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GroupSummary {
    /// Group identifier.
    pub id: GroupId,
    /// Number of placed dots.
    pub dots: usize,
    /// Number of owned tiles.
    pub tiles: usize,
    /// Income collected at the previous upkeep.
    pub last_income: u64,
    /// Income collected at the most recent upkeep.
    pub current_income: u64,
    /// Accumulated resources.
    pub storage: u64,
}
