//! Simulation entities
//!
//! One `Entity` shape (position, size, liveness) with a tagged `EntityKind` carrying the
//! kind-specific state. The player lives outside the pool, see `sim::player`.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::manager::Spawner;
use crate::consts::*;

/// Play field dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

impl Default for Field {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
        }
    }
}

impl Field {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned bounding box (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Strict overlap on both axes; touching edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.pos.x < other.right()
            && self.right() > other.pos.x
            && self.pos.y < other.bottom()
            && self.bottom() > other.pos.y
    }
}

/// Per-tick inputs shared by every entity update
pub struct UpdateContext<'a> {
    pub dt: f32,
    pub field: Field,
    pub rng: &'a mut Pcg32,
}

/// Enemy behavior profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyArchetype {
    Basic,
    Fast,
    Tank,
    Boss,
}

impl EnemyArchetype {
    /// (size, health, speed, score) at level 1
    fn base_stats(&self) -> (f32, i32, f32, u64) {
        match self {
            EnemyArchetype::Basic => (30.0, 1, 100.0, 10),
            EnemyArchetype::Fast => (20.0, 1, 200.0, 20),
            EnemyArchetype::Tank => (50.0, 5, 50.0, 50),
            EnemyArchetype::Boss => (BOSS_SIZE, 50, 50.0, 1000),
        }
    }

    /// Mean seconds between shots for ordinary enemies
    pub fn fire_interval(&self) -> f32 {
        match self {
            EnemyArchetype::Basic => 2.5,
            EnemyArchetype::Fast => 1.8,
            EnemyArchetype::Tank => 1.2,
            EnemyArchetype::Boss => f32::INFINITY,
        }
    }
}

/// Boss-only state
#[derive(Debug, Clone, PartialEq)]
pub struct BossState {
    pub max_health: i32,
    /// Horizontal patrol direction (+1 right, -1 left)
    pub direction: f32,
    pub shoot_timer: f32,
    /// Reached the play band and started patrolling
    pub entered: bool,
    /// Boss of the last level of the campaign
    pub is_final: bool,
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub archetype: EnemyArchetype,
    pub health: i32,
    pub speed: f32,
    pub score_value: u64,
    pub fire_timer: f32,
    /// Seconds spent inside the field
    pub on_screen: f32,
    pub level: u32,
    pub boss: Option<BossState>,
    spawner: Spawner,
}

impl Enemy {
    pub fn is_boss(&self) -> bool {
        self.boss.is_some()
    }

    /// Remaining health as a fraction of the maximum (bosses only)
    pub fn health_fraction(&self) -> Option<f32> {
        self.boss
            .as_ref()
            .map(|b| (self.health.max(0) as f32 / b.max_health.max(1) as f32).clamp(0.0, 1.0))
    }

    /// Apply damage; returns true when this hit destroyed the enemy
    pub fn take_damage(&mut self, amount: i32) -> bool {
        let was_alive = self.health > 0;
        self.health -= amount;
        was_alive && self.health <= 0
    }

    fn update(&mut self, pos: &mut Vec2, size: Vec2, active: &mut bool, ctx: &mut UpdateContext) {
        if self.boss.is_some() {
            self.update_boss(pos, size, ctx);
            return;
        }

        pos.y += self.speed * ctx.dt;
        if pos.y > ctx.field.height {
            *active = false;
            return;
        }
        if pos.y >= 0.0 {
            self.on_screen += ctx.dt;
        }

        self.fire_timer += ctx.dt;
        if self.on_screen >= ENEMY_FIRE_WARMUP
            && self.fire_timer >= self.archetype.fire_interval()
            && ctx.rng.random_bool(ENEMY_FIRE_CHANCE)
        {
            self.fire_timer = 0.0;
            let x = pos.x + size.x / 2.0 - PROJECTILE_WIDTH / 2.0;
            self.spawner.spawn(Entity::projectile(x, pos.y + size.y, true));
        }
    }

    fn update_boss(&mut self, pos: &mut Vec2, size: Vec2, ctx: &mut UpdateContext) {
        let level = self.level;
        let Some(boss) = self.boss.as_mut() else {
            return;
        };

        // Descend into the play band before doing anything else
        if !boss.entered {
            pos.y += self.speed * ctx.dt;
            if pos.y >= BOSS_PLAY_BAND_Y {
                pos.y = BOSS_PLAY_BAND_Y;
                boss.entered = true;
            }
            return;
        }

        pos.x += self.speed * boss.direction * ctx.dt;
        if pos.x <= 0.0 {
            pos.x = 0.0;
            boss.direction = 1.0;
        } else if pos.x + size.x >= ctx.field.width {
            pos.x = (ctx.field.width - size.x).max(0.0);
            boss.direction = -1.0;
        }

        boss.shoot_timer += ctx.dt;
        if boss.shoot_timer > boss_fire_cooldown(level, boss.is_final) {
            boss.shoot_timer = 0.0;
            let bottom = pos.y + size.y;
            for x in boss_volley(level, boss.is_final, pos.x, size.x) {
                self.spawner
                    .spawn(Entity::projectile(x - PROJECTILE_WIDTH / 2.0, bottom, true));
            }
        }
    }
}

/// Seconds between boss volleys
pub fn boss_fire_cooldown(level: u32, is_final: bool) -> f32 {
    if is_final {
        0.3
    } else {
        (1.0 - level as f32 * 0.05).max(0.2)
    }
}

/// Horizontal shot positions of one boss volley
pub fn boss_volley(level: u32, is_final: bool, x: f32, width: f32) -> Vec<f32> {
    let center = x + width / 2.0;
    let mut shots = vec![center];
    if level >= 5 || is_final {
        shots.push(x);
        shots.push(x + width);
    }
    if is_final {
        shots.push(center - 20.0);
        shots.push(center + 20.0);
    }
    shots
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub from_enemy: bool,
    pub damage: i32,
    pub speed: f32,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    GunUpgrade,
    Health,
}

impl PowerUpKind {
    /// Uniform pick
    pub fn random(rng: &mut Pcg32) -> Self {
        if rng.random_bool(0.5) {
            PowerUpKind::GunUpgrade
        } else {
            PowerUpKind::Health
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PowerUp {
    pub kind: PowerUpKind,
}

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub vel: Vec2,
    /// Seconds left
    pub life: f32,
    /// 0xRRGGBB
    pub color: u32,
}

#[derive(Debug, Clone)]
pub enum EntityKind {
    Enemy(Enemy),
    Projectile(Projectile),
    PowerUp(PowerUp),
    Particle(Particle),
}

#[derive(Debug, Clone)]
pub struct Entity {
    /// Assigned by the entity manager on insertion
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub active: bool,
    pub kind: EntityKind,
}

impl Entity {
    fn new(pos: Vec2, size: Vec2, kind: EntityKind) -> Self {
        Self {
            id: 0,
            pos,
            size,
            active: true,
            kind,
        }
    }

    /// Ordinary enemy scaled to `level`
    pub fn enemy(archetype: EnemyArchetype, x: f32, y: f32, level: u32, spawner: Spawner) -> Self {
        let (size, health, speed, score) = archetype.base_stats();
        let level = level.max(1);
        let enemy = Enemy {
            archetype,
            health: health * level as i32,
            // Slight speed increase per level
            speed: speed * (1.0 + (level - 1) as f32 * 0.1),
            score_value: score * u64::from(level),
            fire_timer: 0.0,
            on_screen: 0.0,
            level,
            boss: None,
            spawner,
        };
        Self::new(Vec2::new(x, y), Vec2::splat(size), EntityKind::Enemy(enemy))
    }

    /// Boss for `level`, placed centered just above the field
    pub fn boss(level: u32, final_level: u32, field: &Field, spawner: Spawner) -> Self {
        let level = level.max(1);
        let is_final = level >= final_level;
        let (size, health) = if is_final {
            (FINAL_BOSS_SIZE, 5000)
        } else {
            (BOSS_SIZE, 50 * level as i32)
        };
        let enemy = Enemy {
            archetype: EnemyArchetype::Boss,
            health,
            speed: 50.0 + level as f32 * 5.0,
            score_value: 1000 * u64::from(level),
            fire_timer: 0.0,
            on_screen: 0.0,
            level,
            boss: Some(BossState {
                max_health: health,
                direction: 1.0,
                shoot_timer: 0.0,
                entered: false,
                is_final,
            }),
            spawner,
        };
        let pos = Vec2::new(field.width / 2.0 - size / 2.0, -size);
        Self::new(pos, Vec2::splat(size), EntityKind::Enemy(enemy))
    }

    pub fn projectile(x: f32, y: f32, from_enemy: bool) -> Self {
        let projectile = Projectile {
            from_enemy,
            damage: PROJECTILE_DAMAGE,
            speed: PROJECTILE_SPEED,
        };
        Self::new(
            Vec2::new(x, y),
            Vec2::new(PROJECTILE_WIDTH, PROJECTILE_HEIGHT),
            EntityKind::Projectile(projectile),
        )
    }

    pub fn power_up(x: f32, y: f32, kind: PowerUpKind) -> Self {
        Self::new(
            Vec2::new(x, y),
            Vec2::splat(POWERUP_SIZE),
            EntityKind::PowerUp(PowerUp { kind }),
        )
    }

    /// Particle flying off in a random direction from `origin`
    pub fn particle(origin: Vec2, color: u32, rng: &mut Pcg32) -> Self {
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let speed: f32 = rng.random_range(50.0..150.0);
        let life: f32 = rng.random_range(0.2..0.7);
        let size: f32 = rng.random_range(1.0..4.0);
        let particle = Particle {
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            life,
            color,
        };
        Self::new(origin, Vec2::splat(size), EntityKind::Particle(particle))
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    pub fn as_enemy(&self) -> Option<&Enemy> {
        match &self.kind {
            EntityKind::Enemy(enemy) => Some(enemy),
            _ => None,
        }
    }

    pub fn is_boss(&self) -> bool {
        self.as_enemy().is_some_and(Enemy::is_boss)
    }

    /// Advance one fixed step
    pub fn update(&mut self, ctx: &mut UpdateContext) {
        let Entity {
            pos,
            size,
            active,
            kind,
            ..
        } = self;

        match kind {
            EntityKind::Enemy(enemy) => enemy.update(pos, *size, active, ctx),
            EntityKind::Projectile(projectile) => {
                let direction = if projectile.from_enemy { 1.0 } else { -1.0 };
                pos.y += projectile.speed * direction * ctx.dt;
                if pos.y < -PROJECTILE_MARGIN || pos.y > ctx.field.height + PROJECTILE_MARGIN {
                    *active = false;
                }
            }
            EntityKind::PowerUp(_) => {
                pos.y += POWERUP_SPEED * ctx.dt;
                if pos.y > ctx.field.height {
                    *active = false;
                }
            }
            EntityKind::Particle(particle) => {
                *pos += particle.vel * ctx.dt;
                particle.life -= ctx.dt;
                if particle.life <= 0.0 {
                    *active = false;
                }
            }
        }
    }
}
