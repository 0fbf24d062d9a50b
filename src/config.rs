//! Engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for a simulation world and its background driver.
///
/// Every field has a default, so a JSON document only needs the values it
/// overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of groups to spawn (fewer spawn if the map runs out of room).
    pub group_count: usize,
    /// Grid width in tiles.
    pub width: u16,
    /// Grid height in tiles.
    pub height: u16,
    /// Radius around each spawn point that no other group may spawn in.
    pub spawn_spacing: u32,
    /// Pause between background ticks, in milliseconds.
    pub tick_interval_ms: u64,
    /// Maximum number of undrained activity records kept.
    pub activity_capacity: usize,
    /// RNG seed. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            group_count: 8,
            width: 64,
            height: 64,
            spawn_spacing: 5,
            tick_interval_ms: 1,
            activity_capacity: 1024,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Create a configuration for `group_count` groups on a `width` x `height` torus.
    #[must_use]
    pub fn new(group_count: usize, width: u16, height: u16) -> Self {
        Self {
            group_count,
            width,
            height,
            ..Self::default()
        }
    }

    /// Return a copy of this configuration using a fixed RNG seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Parse a configuration from JSON and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::InvalidParameter`] for out-of-range values.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration describes a buildable world.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidParameter`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.group_count == 0 {
            return Err(ConfigError::invalid(
                "group_count",
                "at least one group is required",
            ));
        }
        if self.width == 0 {
            return Err(ConfigError::invalid("width", "must be greater than 0"));
        }
        if self.height == 0 {
            return Err(ConfigError::invalid("height", "must be greater than 0"));
        }
        Ok(())
    }

    /// Pause between background ticks.
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}
