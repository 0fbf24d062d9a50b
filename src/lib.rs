// Allow unwrap in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Dots: a territorial faction simulation on a toroidal grid.
//!
//! Groups start with a single city each. Cities turn resources into units,
//! units claim the tiles around them, and tile ownership follows whichever
//! group holds the only claim. Units fight over contested ground and grow
//! stronger from kills.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Engine (lock + background loop)   │
//! ├─────────────────────────────────────┤
//! │   Scheduler: turns and upkeep       │
//! ├─────────────────────────────────────┤
//! │   Orders / Combat / Claims          │
//! ├─────────────────────────────────────┤
//! │   Grid, Dots, Groups (id arena)     │
//! └─────────────────────────────────────┘
//! ```
//!
//! Presentation layers poll [`Engine::drain_render_changes`] for the tiles
//! that changed since their last poll.

pub mod config;
pub mod engine;
pub mod error;
pub mod world;

pub use config::EngineConfig;
pub use engine::Engine;
pub use error::ConfigError;

// Re-export key world types at crate root for convenience
pub use world::{
    Activity, Dot, DotId, DotKind, Group, GroupId, GroupSummary, Position, RenderChange, Tile,
    World,
};
