//! Collision detection and response
//!
//! AABB overlap plus the per-pair resolution rules. Runs once per tick after all motion.
//! Anything deactivated during the pass takes part in no further pair checks; new
//! entities (particles, drops) are added after the pass so they never collide on the tick
//! they appear.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::entity::{Aabb, Entity, EntityKind, PowerUpKind};
use super::state::GameEvent;
use super::tick::World;
use crate::audio::SoundEffect;

const RED: u32 = 0xff0000;
const YELLOW: u32 = 0xffff00;
const ORANGE: u32 = 0xff6600;
const WHITE: u32 = 0xffffff;

/// Strict AABB overlap
#[inline]
pub fn collides(a: Aabb, b: Aabb) -> bool {
    a.overlaps(&b)
}

/// Resolve every colliding pair for this tick
pub fn resolve_collisions(world: &mut World, events: &mut Vec<GameEvent>) {
    let World {
        state,
        player,
        entities,
        tuning,
        rng,
        particles,
        ..
    } = world;
    let particles = *particles;
    let mut spawned = Vec::new();
    let list = entities.entities_mut();

    // Projectiles first: enemy shots against the player, player shots against enemies
    for i in 0..list.len() {
        let (bounds, damage, from_enemy) = match &list[i].kind {
            EntityKind::Projectile(p) if list[i].active => {
                (list[i].bounds(), p.damage, p.from_enemy)
            }
            _ => continue,
        };

        if from_enemy {
            if collides(bounds, player.bounds()) {
                player.take_damage(damage);
                list[i].active = false;
                burst(&mut spawned, particles, bounds.center(), 5, RED, rng);
                events.push(shake(0.1, 5.0));
                events.push(GameEvent::Sound(SoundEffect::Hit));
            }
            continue;
        }

        for j in 0..list.len() {
            let target = &mut list[j];
            if !target.active || !collides(bounds, target.bounds()) {
                continue;
            }
            let center = target.bounds().center();
            let EntityKind::Enemy(enemy) = &mut target.kind else {
                continue;
            };

            let killed = enemy.take_damage(damage);
            let score = enemy.score_value;
            burst(&mut spawned, particles, bounds.center(), 3, YELLOW, rng);

            if killed {
                target.active = false;
                state.add_score(score);
                burst(&mut spawned, particles, center, 20, ORANGE, rng);
                events.push(shake(0.2, 10.0));
                events.push(GameEvent::Sound(SoundEffect::Explosion));
                if rng.random_bool(tuning.powerup_drop_chance.clamp(0.0, 1.0)) {
                    let kind = PowerUpKind::random(rng);
                    spawned.push(Entity::power_up(target.pos.x, target.pos.y, kind));
                }
            }

            list[i].active = false;
            break;
        }
    }

    // Body contact
    let player_bounds = player.bounds();
    for entity in list.iter_mut() {
        if !entity.active
            || !matches!(entity.kind, EntityKind::Enemy(_))
            || !collides(entity.bounds(), player_bounds)
        {
            continue;
        }
        player.take_damage(tuning.contact_damage);
        entity.active = false;
        burst(&mut spawned, particles, entity.bounds().center(), 20, RED, rng);
        events.push(shake(0.3, 15.0));
        events.push(GameEvent::Sound(SoundEffect::Hit));
    }

    // Pickups
    for entity in list.iter_mut() {
        let EntityKind::PowerUp(power_up) = &entity.kind else {
            continue;
        };
        if !entity.active || !collides(entity.bounds(), player_bounds) {
            continue;
        }
        player.apply_power_up(power_up.kind);
        entity.active = false;
        burst(&mut spawned, particles, entity.bounds().center(), 10, WHITE, rng);
        events.push(GameEvent::Sound(SoundEffect::PowerUp));
    }

    for entity in spawned {
        entities.add(entity);
    }
}

/// Particle burst for a death, impact, or pickup
pub fn burst(
    out: &mut Vec<Entity>,
    enabled: bool,
    origin: Vec2,
    count: usize,
    color: u32,
    rng: &mut Pcg32,
) {
    if !enabled {
        return;
    }
    out.extend((0..count).map(|_| Entity::particle(origin, color, rng)));
}

fn shake(duration: f32, intensity: f32) -> GameEvent {
    GameEvent::Shake {
        duration,
        intensity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{EnemyArchetype, Field};
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn world() -> World {
        World::new(5, Field::default(), Tuning::default())
    }

    fn add_enemy(world: &mut World, archetype: EnemyArchetype, x: f32, y: f32) -> u32 {
        let enemy = Entity::enemy(archetype, x, y, 1, world.entities.spawner());
        world.entities.add(enemy)
    }

    fn count_kind(world: &World, pred: impl Fn(&EntityKind) -> bool) -> usize {
        world.entities.count_where(pred)
    }

    #[test]
    fn test_player_shot_kills_basic_enemy() {
        let mut w = world();
        let enemy = add_enemy(&mut w, EnemyArchetype::Basic, 100.0, 100.0);
        let shot = w.entities.add(Entity::projectile(110.0, 110.0, false));
        let mut events = Vec::new();

        resolve_collisions(&mut w, &mut events);

        assert!(!w.entities.get(enemy).unwrap().active);
        assert!(!w.entities.get(shot).unwrap().active);
        assert_eq!(w.state.score, 10);
        assert!(events.contains(&GameEvent::Sound(SoundEffect::Explosion)));
        // Impact (3) + death (20)
        assert_eq!(count_kind(&w, |k| matches!(k, EntityKind::Particle(_))), 23);
    }

    #[test]
    fn test_tank_survives_single_hit() {
        let mut w = world();
        let enemy = add_enemy(&mut w, EnemyArchetype::Tank, 100.0, 100.0);
        w.entities.add(Entity::projectile(110.0, 110.0, false));
        let mut events = Vec::new();

        resolve_collisions(&mut w, &mut events);

        let tank = w.entities.get(enemy).unwrap();
        assert!(tank.active);
        assert_eq!(tank.as_enemy().unwrap().health, 4);
        assert_eq!(w.state.score, 0);
        assert!(!events.contains(&GameEvent::Sound(SoundEffect::Explosion)));
    }

    #[test]
    fn test_dead_enemy_absorbs_only_one_shot() {
        let mut w = world();
        add_enemy(&mut w, EnemyArchetype::Basic, 100.0, 100.0);
        let first = w.entities.add(Entity::projectile(105.0, 110.0, false));
        let second = w.entities.add(Entity::projectile(115.0, 110.0, false));
        resolve_collisions(&mut w, &mut Vec::new());

        assert!(!w.entities.get(first).unwrap().active);
        assert!(w.entities.get(second).unwrap().active);
        assert_eq!(w.state.score, 10);
    }

    #[test]
    fn test_enemy_shot_hits_player() {
        let mut w = world();
        let p = w.player.pos;
        let shot = w.entities.add(Entity::projectile(p.x + 10.0, p.y + 10.0, true));
        let mut events = Vec::new();

        resolve_collisions(&mut w, &mut events);

        assert_eq!(w.player.health, 99);
        assert!(!w.entities.get(shot).unwrap().active);
        assert!(events.contains(&GameEvent::Sound(SoundEffect::Hit)));
        assert!(events.contains(&GameEvent::Shake {
            duration: 0.1,
            intensity: 5.0
        }));
    }

    #[test]
    fn test_player_shot_ignores_player_and_power_ups() {
        let mut w = world();
        let p = w.player.pos;
        let shot = w.entities.add(Entity::projectile(p.x + 10.0, p.y + 10.0, false));
        w.entities.add(Entity::power_up(200.0, 200.0, PowerUpKind::Health));
        w.entities.add(Entity::projectile(205.0, 205.0, false));
        resolve_collisions(&mut w, &mut Vec::new());
        assert_eq!(w.player.health, 100);
        assert!(w.entities.get(shot).unwrap().active);
    }

    #[test]
    fn test_body_contact() {
        let mut w = world();
        let p = w.player.pos;
        let enemy = add_enemy(&mut w, EnemyArchetype::Basic, p.x, p.y);
        let mut events = Vec::new();

        resolve_collisions(&mut w, &mut events);

        assert_eq!(w.player.health, 90);
        assert!(!w.entities.get(enemy).unwrap().active);
        // Contact is not a kill: no score
        assert_eq!(w.state.score, 0);
        assert!(events.contains(&GameEvent::Shake {
            duration: 0.3,
            intensity: 15.0
        }));
    }

    #[test]
    fn test_enemy_shot_down_while_ramming_deals_no_contact_damage() {
        let mut w = world();
        let p = w.player.pos;
        let enemy = add_enemy(&mut w, EnemyArchetype::Basic, p.x, p.y);
        let shot = w.entities.add(Entity::projectile(p.x + 10.0, p.y + 10.0, false));
        let mut events = Vec::new();

        resolve_collisions(&mut w, &mut events);

        assert_eq!(w.player.health, 100);
        assert!(!w.entities.get(enemy).unwrap().active);
        assert!(!w.entities.get(shot).unwrap().active);
        assert_eq!(w.state.score, 10);
        assert!(!events.contains(&GameEvent::Sound(SoundEffect::Hit)));
        assert!(!events.contains(&GameEvent::Shake {
            duration: 0.3,
            intensity: 15.0
        }));
    }

    #[test]
    fn test_power_up_pickup() {
        let mut w = world();
        let p = w.player.pos;
        let id = w.entities.add(Entity::power_up(p.x + 5.0, p.y + 5.0, PowerUpKind::GunUpgrade));
        let mut events = Vec::new();

        resolve_collisions(&mut w, &mut events);

        assert_eq!(w.player.gun_level, 2);
        assert!(!w.entities.get(id).unwrap().active);
        assert_eq!(events, vec![GameEvent::Sound(SoundEffect::PowerUp)]);
    }

    #[test]
    fn test_particles_toggle() {
        let mut w = world();
        w.particles = false;
        let p = w.player.pos;
        add_enemy(&mut w, EnemyArchetype::Basic, p.x, p.y);
        resolve_collisions(&mut w, &mut Vec::new());
        assert_eq!(count_kind(&w, |k| matches!(k, EntityKind::Particle(_))), 0);
    }

    #[test]
    fn test_touching_edges_do_not_collide() {
        let a = Aabb::new(Vec2::ZERO, Vec2::splat(10.0));
        let b = Aabb::new(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        assert!(!collides(a, b));
    }

    proptest! {
        #[test]
        fn prop_collides_is_symmetric(
            ax in -100.0f32..900.0, ay in -100.0f32..700.0, aw in 1.0f32..150.0, ah in 1.0f32..150.0,
            bx in -100.0f32..900.0, by in -100.0f32..700.0, bw in 1.0f32..150.0, bh in 1.0f32..150.0,
        ) {
            let a = Aabb::new(Vec2::new(ax, ay), Vec2::new(aw, ah));
            let b = Aabb::new(Vec2::new(bx, by), Vec2::new(bw, bh));
            prop_assert_eq!(collides(a, b), collides(b, a));
            prop_assert!(collides(a, a));
        }
    }
}
