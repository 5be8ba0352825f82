//! Game state and core simulation types
//!
//! Score/level bookkeeping, the resume snapshot, and the events the simulation
//! hands to the outside world.

use serde::{Deserialize, Serialize};

use crate::audio::SoundEffect;

/// Run-level progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub score: u64,
    /// Current level (1-based)
    pub level: u32,
    is_game_over: bool,
    is_victory: bool,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            score: 0,
            level: 1,
            is_game_over: false,
            is_victory: false,
        }
    }

    pub fn add_score(&mut self, amount: u64) {
        self.score = self.score.saturating_add(amount);
    }

    pub fn next_level(&mut self) {
        self.level += 1;
    }

    pub fn is_game_over(&self) -> bool {
        self.is_game_over
    }

    pub fn is_victory(&self) -> bool {
        self.is_victory
    }

    /// Either terminal flag is set
    pub fn is_finished(&self) -> bool {
        self.is_game_over || self.is_victory
    }

    /// Mark the run lost. Returns false if the run had already ended.
    pub fn set_game_over(&mut self) -> bool {
        if self.is_finished() {
            return false;
        }
        self.is_game_over = true;
        true
    }

    /// Mark the campaign won. Returns false if the run had already ended.
    pub fn set_victory(&mut self) -> bool {
        if self.is_finished() {
            return false;
        }
        self.is_victory = true;
        true
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// State captured when leaving a paused run for the main menu.
/// Level timing is deliberately absent: resuming restarts the level's wave timer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub score: u64,
    pub level: u32,
    pub player_health: i32,
    pub player_gun_level: u8,
    pub player_x: f32,
    pub player_y: f32,
}

/// Things that happened during a tick that collaborators outside the simulation care about
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Fire-and-forget audio cue
    Sound(SoundEffect),
    /// Screen shake request for the rendering surface
    Shake { duration: f32, intensity: f32 },
    BossSpawned { level: u32 },
    LevelCleared { level: u32 },
    Victory { score: u64 },
    PlayerDestroyed { score: u64, level: u32 },
}
