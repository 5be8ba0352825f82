//! Space Shooter - a vertical arcade shooter
//!
//! Core modules:
//! - `game_loop`: Fixed-timestep scheduling against a frame callback
//! - `sim`: Deterministic simulation (entities, collisions, level director)
//! - `game`: Mode state machine (menu, playing, paused, game over, victory)
//! - `renderer`: Drawing surface abstraction and the read-only render pass
//! - `platform`: Input, time and logging bootstrap
//! - `persistence`: Best-effort high score and config storage
//! - `tuning`: Data-driven game balance

pub mod app;
pub mod audio;
pub mod error;
pub mod game;
pub mod game_loop;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use app::App;
pub use error::{GameError, StorageError};
pub use game::{Game, Mode};
pub use game_loop::{FrameHandler, FrameScheduler, GameLoop, LoopConfig};
pub use highscores::HighScores;
pub use settings::{Difficulty, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Fixed simulation timestep in milliseconds
    pub const SIM_DT_MS: f64 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default play field dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Player ship
    pub const PLAYER_SIZE: f32 = 40.0;
    pub const PLAYER_SPEED: f32 = 300.0;
    pub const PLAYER_MAX_HEALTH: i32 = 100;
    pub const MAX_GUN_LEVEL: u8 = 5;
    /// Distance of the player spawn point above the bottom edge
    pub const PLAYER_SPAWN_OFFSET: f32 = 100.0;

    /// Projectiles
    pub const PROJECTILE_WIDTH: f32 = 5.0;
    pub const PROJECTILE_HEIGHT: f32 = 10.0;
    pub const PROJECTILE_SPEED: f32 = 500.0;
    pub const PROJECTILE_DAMAGE: i32 = 1;
    /// Projectiles survive this far outside the field before being culled
    pub const PROJECTILE_MARGIN: f32 = 50.0;

    /// Power-ups
    pub const POWERUP_SIZE: f32 = 20.0;
    pub const POWERUP_SPEED: f32 = 100.0;
    pub const HEALTH_PICKUP_AMOUNT: i32 = 20;

    /// Enemies
    pub const ENEMY_SPAWN_Y: f32 = -50.0;
    /// Time an enemy must be on screen before it may shoot
    pub const ENEMY_FIRE_WARMUP: f32 = 0.5;
    /// Per-tick chance to fire once the fire timer is past the mean interval
    pub const ENEMY_FIRE_CHANCE: f64 = 0.05;

    /// Boss
    pub const BOSS_SIZE: f32 = 100.0;
    pub const FINAL_BOSS_SIZE: f32 = 150.0;
    /// Top of the band the boss patrols in once it has entered the field
    pub const BOSS_PLAY_BAND_Y: f32 = 50.0;
}
