//! Bounded log of notable actions.

use std::collections::VecDeque;

use serde::Serialize;

use crate::world::{DotId, GroupId, Position};

/// Something that happened on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Activity {
    /// A dot was placed on a tile, optionally leaving another.
    Move {
        /// Dot that moved.
        dot: DotId,
        /// Tile left behind (None when deployed from storage or spawned).
        from: Option<Position>,
        /// Tile arrived at.
        to: Position,
    },
    /// A unit attacked the occupant of a tile.
    Strike {
        /// Attacking dot.
        attacker: DotId,
        /// Attacker's tile.
        from: Position,
        /// Target tile.
        to: Position,
        /// Damage dealt, `None` on a miss.
        damage: Option<u32>,
    },
    /// A dot reached a new tier.
    TierUp {
        /// Dot that levelled.
        dot: DotId,
        /// Where it stands.
        at: Position,
        /// New tier.
        tier: u32,
    },
    /// A dot was destroyed.
    Destroyed {
        /// Destroyed dot.
        dot: DotId,
        /// Group it belonged to.
        group: GroupId,
        /// Tile it was removed from.
        at: Position,
    },
}

/// FIFO of activities; the oldest entries are dropped once full.
#[derive(Debug, Clone)]
pub struct ActivityLog {
    capacity: usize,
    entries: VecDeque<Activity>,
}

impl ActivityLog {
    /// Create a log holding at most `capacity` undrained entries.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity.min(4096)),
        }
    }

    /// Append an activity, evicting the oldest if at capacity.
    pub fn push(&mut self, activity: Activity) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(activity);
    }

    /// Number of undrained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Take every entry in order, leaving the log empty.
    pub fn drain(&mut self) -> Vec<Activity> {
        self.entries.drain(..).collect()
    }
}
