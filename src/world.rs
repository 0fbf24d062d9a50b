//! Simulation world for the dots engine.
//!
//! Everything that changes during a run lives here:
//! - Toroidal coordinates and the tile store
//! - Dots (cities and units) and the groups that own them
//! - Claim bookkeeping and tile ownership resolution
//! - Combat, per-group orders and the turn scheduler
//! - Render change and activity buffers for presentation layers

mod activity;
mod claims;
mod combat;
mod dot;
mod grid;
mod group;
mod invariants;
mod orders;
mod position;
mod render;
mod scheduler;
mod state;

pub use activity::{Activity, ActivityLog};
pub use combat::{AttackOutcome, StrikeRoll, kill_reward, roll_strike};
pub use dot::{
    BASE_RANGE, CITY_CONTROL_RANGE, Dot, DotId, DotKind, HITS_PER_TIER, MAX_MOVEMENT, Stat,
    TIER_PROGRESS_COST, UNIT_CONTROL_RANGE, UNIT_PRODUCTION_COST,
};
pub use grid::{Grid, Tile};
pub use group::{FIRST_GROUP_ID, Group, GroupId, GroupSummary};
pub use invariants::{InvariantViolation, assert_invariants, check_invariants};
pub use orders::{Order, Survey};
pub use position::{Position, Torus};
pub use render::{RenderBuffer, RenderChange};
pub use state::World;
