//! Data-driven game balance
//!
//! Everything the level director and the collision pass treat as a knob. The defaults
//! reproduce the stock campaign; difficulty presets only stretch the spawn curve.

use serde::{Deserialize, Serialize};

use crate::settings::Difficulty;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    /// Seconds of ordinary waves before the boss appears
    pub level_duration: f32,
    /// Last level of the campaign; clearing its boss wins the game
    pub final_level: u32,
    /// Spawn interval at level 0, before the per-level reduction
    pub base_spawn_interval: f32,
    /// Seconds removed from the spawn interval per level
    pub spawn_interval_step: f32,
    /// Lower bound of the spawn interval
    pub min_spawn_interval: f32,
    /// Chance that a destroyed enemy drops a power-up
    pub powerup_drop_chance: f64,
    /// Damage dealt to the player by enemy body contact
    pub contact_damage: i32,
    /// Seconds between player volleys
    pub player_fire_cooldown: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            level_duration: 120.0,
            final_level: 10,
            base_spawn_interval: 2.0,
            spawn_interval_step: 0.1,
            min_spawn_interval: 0.5,
            powerup_drop_chance: 0.2,
            contact_damage: 10,
            player_fire_cooldown: 0.2,
        }
    }
}

impl Tuning {
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        let base = Self::default();
        Self {
            base_spawn_interval: base.base_spawn_interval * difficulty.spawn_interval_scale(),
            ..base
        }
    }

    /// Ordinary enemy spawn interval for a level (shrinks with level, floored)
    pub fn spawn_interval(&self, level: u32) -> f32 {
        (self.base_spawn_interval - level as f32 * self.spawn_interval_step)
            .max(self.min_spawn_interval)
    }
}
