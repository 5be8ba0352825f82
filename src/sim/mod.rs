//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order in the entity pool)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod level;
pub mod manager;
pub mod player;
pub mod state;
pub mod tick;

pub use collision::{collides, resolve_collisions};
pub use entity::{
    Aabb, BossState, Enemy, EnemyArchetype, Entity, EntityKind, Field, Particle, PowerUp,
    PowerUpKind, Projectile, UpdateContext,
};
pub use level::{LevelDirector, LevelOutcome};
pub use manager::{EntityManager, Spawner};
pub use player::Player;
pub use state::{GameEvent, GameState, Snapshot};
pub use tick::{TickInput, TickOutcome, World, autopilot_input, tick};
