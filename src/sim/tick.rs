//! Fixed timestep simulation tick
//!
//! Playing-mode orchestration: level director, player, entity pool, collisions, then the
//! death check. Everything here is driven by the fixed step and the world's seeded RNG.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::{burst, resolve_collisions};
use super::entity::{EntityKind, Field, UpdateContext};
use super::level::{LevelDirector, LevelOutcome};
use super::manager::EntityManager;
use super::player::Player;
use super::state::{GameEvent, GameState, Snapshot};
use crate::audio::SoundEffect;
use crate::tuning::Tuning;

const PLAYER_DEATH_COLOR: u32 = 0x00ff00;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Fire held
    pub fire: bool,
}

/// How the run stands after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    /// Player destroyed
    Defeat,
    /// Final level cleared
    Victory,
}

/// Everything the playing mode simulates
#[derive(Debug)]
pub struct World {
    pub state: GameState,
    pub player: Player,
    pub entities: EntityManager,
    pub level: LevelDirector,
    pub field: Field,
    pub tuning: Tuning,
    /// Emit particle bursts
    pub particles: bool,
    pub rng: Pcg32,
}

impl World {
    pub fn new(seed: u64, field: Field, tuning: Tuning) -> Self {
        Self {
            state: GameState::new(),
            player: Player::new(&field),
            entities: EntityManager::new(),
            level: LevelDirector::new(),
            field,
            tuning,
            particles: true,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Capture the resumable subset of the run
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            score: self.state.score,
            level: self.state.level,
            player_health: self.player.health,
            player_gun_level: self.player.gun_level,
            player_x: self.player.pos.x,
            player_y: self.player.pos.y,
        }
    }

    /// Resume from a snapshot. The pool is emptied and the level restarts its wave timer.
    pub fn restore(&mut self, snapshot: &Snapshot) {
        self.state.reset();
        self.state.score = snapshot.score;
        self.state.level = snapshot.level.max(1);

        self.player = Player::new(&self.field);
        self.player.health = snapshot.player_health;
        self.player.gun_level = snapshot.player_gun_level.max(1);
        self.player.pos = Vec2::new(snapshot.player_x, snapshot.player_y);

        self.entities.clear();
        self.level.reset();
    }
}

/// Advance the world by one fixed timestep
pub fn tick(
    world: &mut World,
    input: &TickInput,
    dt: f32,
    events: &mut Vec<GameEvent>,
) -> TickOutcome {
    if world.state.is_game_over() {
        return TickOutcome::Defeat;
    }
    if world.state.is_victory() {
        return TickOutcome::Victory;
    }

    let level = world.state.level;
    match world.level.update(
        dt,
        &mut world.state,
        &mut world.entities,
        &world.field,
        &world.tuning,
        &mut world.rng,
    ) {
        LevelOutcome::BossSpawned => events.push(GameEvent::BossSpawned { level }),
        LevelOutcome::LevelCleared { .. } => events.push(GameEvent::LevelCleared { level }),
        LevelOutcome::CampaignComplete => {
            events.push(GameEvent::Victory {
                score: world.state.score,
            });
            return TickOutcome::Victory;
        }
        LevelOutcome::Idle | LevelOutcome::Running => {}
    }

    let shots = world.player.update(
        input,
        dt,
        &world.field,
        world.tuning.player_fire_cooldown,
        &mut world.entities,
    );
    if shots > 0 {
        events.push(GameEvent::Sound(SoundEffect::Shoot));
    }

    let mut ctx = UpdateContext {
        dt,
        field: world.field,
        rng: &mut world.rng,
    };
    world.entities.update(&mut ctx);

    resolve_collisions(world, events);

    if world.player.is_dead() && world.state.set_game_over() {
        let mut debris = Vec::new();
        burst(
            &mut debris,
            world.particles,
            world.player.bounds().center(),
            50,
            PLAYER_DEATH_COLOR,
            &mut world.rng,
        );
        for entity in debris {
            world.entities.add(entity);
        }
        events.push(GameEvent::Shake {
            duration: 0.5,
            intensity: 20.0,
        });
        events.push(GameEvent::Sound(SoundEffect::GameOver));
        events.push(GameEvent::PlayerDestroyed {
            score: world.state.score,
            level: world.state.level,
        });
        log::info!(
            "Player destroyed on level {} with score {}",
            world.state.level,
            world.state.score
        );
        return TickOutcome::Defeat;
    }

    TickOutcome::Continue
}

/// Demo pilot: line up under the lowest threat above the ship and keep firing,
/// sidestepping anything about to ram it
pub fn autopilot_input(world: &World) -> TickInput {
    let ship = world.player.bounds();
    let ship_center = ship.center().x;

    let mut input = TickInput {
        fire: true,
        ..Default::default()
    };

    // Dodge enemy bodies and enemy shots that are close and on a collision course
    let threat = world.entities.live().find(|e| {
        let incoming = match &e.kind {
            EntityKind::Enemy(enemy) => !enemy.is_boss(),
            EntityKind::Projectile(p) => p.from_enemy,
            _ => false,
        };
        let b = e.bounds();
        incoming
            && b.bottom() > ship.pos.y - 80.0
            && b.pos.y < ship.bottom()
            && b.right() > ship.pos.x - 5.0
            && b.pos.x < ship.right() + 5.0
    });
    if let Some(threat) = threat {
        if threat.bounds().center().x > ship_center {
            input.left = true;
        } else {
            input.right = true;
        }
        return input;
    }

    // Prefer nearby pickups, otherwise chase the lowest enemy
    let target = world
        .entities
        .live()
        .filter(|e| matches!(e.kind, EntityKind::PowerUp(_)) && e.pos.y > ship.pos.y - 200.0)
        .chain(
            world
                .entities
                .enemies()
                .map(|(e, _)| e)
                .filter(|e| e.bounds().bottom() < ship.pos.y),
        )
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

    if let Some(target) = target {
        let dx = target.bounds().center().x - ship_center;
        if dx < -4.0 {
            input.left = true;
        } else if dx > 4.0 {
            input.right = true;
        }
    }
    input
}
