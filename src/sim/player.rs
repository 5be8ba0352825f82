//! Player ship
//!
//! Lives outside the entity pool: exactly one exists per run and every system needs it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Aabb, Entity, Field, PowerUpKind};
use super::manager::EntityManager;
use super::tick::TickInput;
use crate::consts::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub health: i32,
    /// 1..=MAX_GUN_LEVEL
    pub gun_level: u8,
    /// Seconds until the next volley is allowed
    pub fire_cooldown: f32,
}

impl Player {
    /// Fresh ship centered near the bottom of the field
    pub fn new(field: &Field) -> Self {
        Self {
            pos: Vec2::new(
                field.width / 2.0 - PLAYER_SIZE / 2.0,
                field.height - PLAYER_SPAWN_OFFSET,
            ),
            size: Vec2::splat(PLAYER_SIZE),
            health: PLAYER_MAX_HEALTH,
            gun_level: 1,
            fire_cooldown: 0.0,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Move, clamp to the field, and fire if allowed. Returns the number of projectiles spawned.
    pub fn update(
        &mut self,
        input: &TickInput,
        dt: f32,
        field: &Field,
        cooldown: f32,
        entities: &mut EntityManager,
    ) -> u32 {
        let mut dir = Vec2::ZERO;
        if input.left {
            dir.x -= 1.0;
        }
        if input.right {
            dir.x += 1.0;
        }
        if input.up {
            dir.y -= 1.0;
        }
        if input.down {
            dir.y += 1.0;
        }
        self.pos += dir * PLAYER_SPEED * dt;

        let max = Vec2::new(
            (field.width - self.size.x).max(0.0),
            (field.height - self.size.y).max(0.0),
        );
        self.pos = self.pos.clamp(Vec2::ZERO, max);

        if self.fire_cooldown > 0.0 {
            self.fire_cooldown -= dt;
        }
        if input.fire && self.fire_cooldown <= 0.0 {
            self.fire_cooldown = cooldown;
            return self.fire(entities);
        }
        0
    }

    fn fire(&self, entities: &mut EntityManager) -> u32 {
        let offsets = muzzle_offsets(self.gun_level, self.size.x);
        for offset in &offsets {
            let at = self.pos + *offset;
            entities.add(Entity::projectile(at.x, at.y, false));
        }
        offsets.len() as u32
    }

    pub fn apply_power_up(&mut self, kind: PowerUpKind) {
        match kind {
            PowerUpKind::GunUpgrade => {
                self.gun_level = self.gun_level.saturating_add(1).min(MAX_GUN_LEVEL);
            }
            PowerUpKind::Health => {
                self.health = (self.health + HEALTH_PICKUP_AMOUNT).min(PLAYER_MAX_HEALTH);
            }
        }
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.health = (self.health - amount).max(0);
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }
}

/// Projectile spawn offsets from the ship's top-left corner for a gun level.
/// Levels above 3 reuse the level 3 layout.
pub fn muzzle_offsets(gun_level: u8, width: f32) -> Vec<Vec2> {
    let center = Vec2::new(width / 2.0 - PROJECTILE_WIDTH / 2.0, 0.0);
    let right = width - PROJECTILE_WIDTH;
    match gun_level {
        0 | 1 => vec![center],
        2 => vec![Vec2::ZERO, Vec2::new(right, 0.0)],
        3 => vec![center, Vec2::new(0.0, 5.0), Vec2::new(right, 5.0)],
        _ => vec![center, Vec2::ZERO, Vec2::new(right, 0.0)],
    }
}
