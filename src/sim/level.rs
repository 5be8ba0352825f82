//! Level director
//!
//! Time-driven waves: ordinary enemies on a shrinking interval until the level duration
//! elapses, then a single boss. Killing the boss clears the level (or wins the campaign
//! on the final level).

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{EnemyArchetype, Entity, Field};
use super::manager::EntityManager;
use super::state::GameState;
use crate::consts::ENEMY_SPAWN_Y;
use crate::tuning::Tuning;

/// Widest ordinary enemy; keeps spawns fully inside the field horizontally
const SPAWN_MARGIN: f32 = 50.0;

/// What the director did this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelOutcome {
    /// Run already over, nothing happened
    Idle,
    /// Waves or boss fight in progress
    Running,
    BossSpawned,
    LevelCleared { next_level: u32 },
    /// Final boss down
    CampaignComplete,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelDirector {
    elapsed: f32,
    spawn_timer: f32,
    boss_spawned: bool,
}

impl LevelDirector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds spent in the current level
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn spawn_timer(&self) -> f32 {
        self.spawn_timer
    }

    pub fn boss_spawned(&self) -> bool {
        self.boss_spawned
    }

    /// Seconds of ordinary waves left before the boss, never negative
    pub fn time_remaining(&self, tuning: &Tuning) -> f32 {
        (tuning.level_duration - self.elapsed).max(0.0)
    }

    /// Restart the level-local timers
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn update(
        &mut self,
        dt: f32,
        state: &mut GameState,
        entities: &mut EntityManager,
        field: &Field,
        tuning: &Tuning,
        rng: &mut Pcg32,
    ) -> LevelOutcome {
        if state.is_finished() {
            return LevelOutcome::Idle;
        }

        self.elapsed += dt;

        if self.elapsed >= tuning.level_duration && !self.boss_spawned {
            let boss = Entity::boss(state.level, tuning.final_level, field, entities.spawner());
            entities.add(boss);
            self.boss_spawned = true;
            log::info!("Level {}: boss incoming", state.level);
            return LevelOutcome::BossSpawned;
        }

        if !self.boss_spawned {
            self.spawn_timer += dt;
            if self.spawn_timer > tuning.spawn_interval(state.level) {
                self.spawn_timer = 0.0;
                self.spawn_enemy(state.level, entities, field, rng);
            }
            return LevelOutcome::Running;
        }

        if entities.has_active_boss() {
            return LevelOutcome::Running;
        }

        if state.level >= tuning.final_level {
            state.set_victory();
            log::info!("Final boss defeated with score {}", state.score);
            return LevelOutcome::CampaignComplete;
        }

        state.next_level();
        self.reset();
        log::info!("Level cleared, starting level {}", state.level);
        LevelOutcome::LevelCleared {
            next_level: state.level,
        }
    }

    fn spawn_enemy(
        &self,
        level: u32,
        entities: &mut EntityManager,
        field: &Field,
        rng: &mut Pcg32,
    ) {
        let archetype = choose_archetype(level, rng.random::<f32>());
        let x = rng.random::<f32>() * (field.width - SPAWN_MARGIN).max(0.0);
        let enemy = Entity::enemy(archetype, x, ENEMY_SPAWN_Y, level, entities.spawner());
        entities.add(enemy);
    }
}

/// Weighted archetype pick for a uniform roll in [0, 1); tougher mixes unlock with level
pub fn choose_archetype(level: u32, roll: f32) -> EnemyArchetype {
    if level > 5 && roll > 0.9 {
        EnemyArchetype::Tank
    } else if level > 3 && roll > 0.7 {
        EnemyArchetype::Fast
    } else {
        EnemyArchetype::Basic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::EntityKind;
    use rand::SeedableRng;

    struct Harness {
        director: LevelDirector,
        state: GameState,
        entities: EntityManager,
        field: Field,
        tuning: Tuning,
        rng: Pcg32,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                director: LevelDirector::new(),
                state: GameState::new(),
                entities: EntityManager::new(),
                field: Field::default(),
                tuning: Tuning::default(),
                rng: Pcg32::seed_from_u64(42),
            }
        }

        fn step(&mut self, dt: f32) -> LevelOutcome {
            self.director.update(
                dt,
                &mut self.state,
                &mut self.entities,
                &self.field,
                &self.tuning,
                &mut self.rng,
            )
        }

        fn ordinary_enemies(&self) -> usize {
            self.entities.enemies().filter(|(_, e)| !e.is_boss()).count()
        }

        fn kill_boss(&mut self) {
            for entity in self.entities.entities_mut() {
                if entity.is_boss() {
                    entity.active = false;
                }
            }
        }
    }

    #[test]
    fn test_archetype_mix() {
        assert_eq!(choose_archetype(1, 0.99), EnemyArchetype::Basic);
        assert_eq!(choose_archetype(4, 0.75), EnemyArchetype::Fast);
        assert_eq!(choose_archetype(4, 0.95), EnemyArchetype::Fast);
        assert_eq!(choose_archetype(6, 0.95), EnemyArchetype::Tank);
        assert_eq!(choose_archetype(6, 0.5), EnemyArchetype::Basic);
    }

    #[test]
    fn test_spawns_on_interval() {
        let mut h = Harness::new();
        // Level 1 interval is 1.9s
        for _ in 0..10 {
            h.step(1.0);
        }
        assert_eq!(h.ordinary_enemies(), 5);
        for (entity, _) in h.entities.enemies() {
            assert_eq!(entity.pos.y, ENEMY_SPAWN_Y);
            assert!(entity.pos.x >= 0.0 && entity.pos.x <= h.field.width - SPAWN_MARGIN);
        }
    }

    #[test]
    fn test_boss_spawns_once_and_freezes_waves() {
        let mut h = Harness::new();
        for _ in 0..119 {
            assert_ne!(h.step(1.0), LevelOutcome::BossSpawned);
        }
        assert!(!h.entities.has_active_boss());

        assert_eq!(h.step(1.0), LevelOutcome::BossSpawned);
        let (boss, enemy) = h.entities.boss().unwrap();
        assert_eq!(enemy.level, 1);
        assert_eq!(enemy.health, 50);
        assert_eq!(boss.size.x, crate::consts::BOSS_SIZE);

        let timer = h.director.spawn_timer();
        let ordinary = h.ordinary_enemies();
        for _ in 0..30 {
            assert_eq!(h.step(1.0), LevelOutcome::Running);
        }
        assert_eq!(h.director.spawn_timer(), timer);
        assert_eq!(h.ordinary_enemies(), ordinary);
        let bosses = h
            .entities
            .iter()
            .filter(|e| matches!(&e.kind, EntityKind::Enemy(enemy) if enemy.is_boss()))
            .count();
        assert_eq!(bosses, 1);
    }

    #[test]
    fn test_no_completion_without_boss() {
        let mut h = Harness::new();
        for _ in 0..100 {
            h.step(1.0);
            // Clear every ordinary enemy: the level must not complete
            h.entities.clear();
        }
        assert_eq!(h.state.level, 1);
        assert!(!h.director.boss_spawned());
    }

    #[test]
    fn test_boss_kill_advances_level() {
        let mut h = Harness::new();
        h.tuning.level_duration = 5.0;
        while h.step(1.0) != LevelOutcome::BossSpawned {}
        h.kill_boss();
        assert_eq!(h.step(1.0), LevelOutcome::LevelCleared { next_level: 2 });
        assert_eq!(h.state.level, 2);
        assert_eq!(h.director, LevelDirector::default());
    }

    #[test]
    fn test_final_boss_wins() {
        let mut h = Harness::new();
        h.tuning.level_duration = 5.0;
        h.state.level = h.tuning.final_level;
        while h.step(1.0) != LevelOutcome::BossSpawned {}
        let (_, enemy) = h.entities.boss().unwrap();
        assert_eq!(enemy.health, 5000);
        h.kill_boss();
        assert_eq!(h.step(1.0), LevelOutcome::CampaignComplete);
        assert!(h.state.is_victory());
        assert_eq!(h.step(1.0), LevelOutcome::Idle);
    }

    #[test]
    fn test_time_remaining_counts_down_to_zero() {
        let mut h = Harness::new();
        assert_eq!(h.director.time_remaining(&h.tuning), 120.0);
        for _ in 0..30 {
            h.step(1.0);
        }
        assert_eq!(h.director.time_remaining(&h.tuning), 90.0);
        for _ in 0..100 {
            h.step(1.0);
        }
        assert_eq!(h.director.time_remaining(&h.tuning), 0.0);
    }

    #[test]
    fn test_idle_after_game_over() {
        let mut h = Harness::new();
        h.state.set_game_over();
        for _ in 0..10 {
            assert_eq!(h.step(1.0), LevelOutcome::Idle);
        }
        assert!(h.entities.is_empty());
        assert_eq!(h.director.elapsed(), 0.0);
    }
}
