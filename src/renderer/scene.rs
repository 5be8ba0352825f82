//! Render pass
//!
//! Reads the settled game state and issues draw calls. Never mutates anything.

use super::{Color, Font, RenderSurface, color_from_hex, colors, with_alpha};
use crate::game::{Game, Mode, PauseMenu};
use crate::highscores::HighScoreEntry;
use crate::sim::{EnemyArchetype, EntityKind, PowerUpKind, World};

const BOSS_BAR_WIDTH: f32 = 400.0;
const BOSS_BAR_HEIGHT: f32 = 20.0;

/// Draw the current frame
pub fn draw<S: RenderSurface + ?Sized>(game: &Game, surface: &mut S) {
    match game.mode() {
        Mode::MainMenu => draw_main_menu(game.high_scores(), game.snapshot().is_some(), surface),
        Mode::Playing => {
            draw_world(game.world(), surface);
            draw_hud(game.world(), surface);
        }
        Mode::Paused => {
            draw_world(game.world(), surface);
            draw_hud(game.world(), surface);
            draw_pause_menu(game.pause_menu(), surface);
        }
        Mode::GameOver => {
            draw_world(game.world(), surface);
            draw_end_screen("GAME OVER", colors::ENEMY_BASIC, game.world(), surface);
        }
        Mode::Victory => {
            draw_world(game.world(), surface);
            draw_end_screen("VICTORY!", colors::HIGHLIGHT, game.world(), surface);
        }
    }
}

/// One leaderboard row as shown on the main menu
pub fn format_score_line(rank: usize, entry: &HighScoreEntry) -> String {
    format!("{}. Score: {} - Level: {}", rank, entry.score, entry.level)
}

/// Whole seconds as `m:ss`
pub fn format_countdown(seconds: f32) -> String {
    let total = seconds.max(0.0).floor() as u32;
    format!("{}:{:02}", total / 60, total % 60)
}

fn draw_main_menu<S: RenderSurface + ?Sized>(
    scores: &[HighScoreEntry],
    can_resume: bool,
    surface: &mut S,
) {
    let cx = surface.width() / 2.0;
    let h = surface.height();

    surface.draw_text("SPACE SHOOTER", cx, h * 0.2, colors::TEXT, Font::TITLE);
    let prompt = if can_resume {
        "Press ENTER to resume"
    } else {
        "Press ENTER to start"
    };
    surface.draw_text(prompt, cx, h * 0.35, colors::HIGHLIGHT, Font::MENU);

    surface.draw_text("High Scores", cx, h * 0.5, colors::TEXT, Font::HEADING);
    if scores.is_empty() {
        surface.draw_text("No scores yet", cx, h * 0.5 + 40.0, colors::TEXT_DIM, Font::BODY);
    }
    for (i, entry) in scores.iter().enumerate() {
        let y = h * 0.5 + 40.0 + i as f32 * 28.0;
        surface.draw_text(&format_score_line(i + 1, entry), cx, y, colors::TEXT, Font::BODY);
    }

    surface.draw_text(
        "Arrows/WASD move - Space fire - Esc pause",
        cx,
        h - 30.0,
        colors::TEXT_DIM,
        Font::BODY,
    );
}

fn draw_world<S: RenderSurface + ?Sized>(world: &World, surface: &mut S) {
    for entity in world.entities.live() {
        let color = entity_color(&entity.kind);
        surface.draw_rect(entity.pos.x, entity.pos.y, entity.size.x, entity.size.y, color);
    }

    if !world.player.is_dead() {
        let p = &world.player;
        surface.draw_rect(p.pos.x, p.pos.y, p.size.x, p.size.y, colors::PLAYER);
    }
}

fn entity_color(kind: &EntityKind) -> Color {
    match kind {
        EntityKind::Enemy(enemy) => match enemy.archetype {
            EnemyArchetype::Basic => colors::ENEMY_BASIC,
            EnemyArchetype::Fast => colors::ENEMY_FAST,
            EnemyArchetype::Tank => colors::ENEMY_TANK,
            EnemyArchetype::Boss => colors::BOSS,
        },
        EntityKind::Projectile(p) if p.from_enemy => colors::ENEMY_SHOT,
        EntityKind::Projectile(_) => colors::PLAYER_SHOT,
        EntityKind::PowerUp(p) => match p.kind {
            PowerUpKind::GunUpgrade => colors::GUN_UPGRADE,
            PowerUpKind::Health => colors::HEALTH_PICKUP,
        },
        EntityKind::Particle(p) => {
            // Fade out over the last half second
            with_alpha(color_from_hex(p.color), (p.life * 2.0).clamp(0.0, 1.0))
        }
    }
}

fn draw_hud<S: RenderSurface + ?Sized>(world: &World, surface: &mut S) {
    let state = &world.state;
    surface.draw_text(&format!("Score: {}", state.score), 10.0, 30.0, colors::TEXT, Font::HUD);
    surface.draw_text(&format!("Level: {}", state.level), 10.0, 60.0, colors::TEXT, Font::HUD);
    surface.draw_text(
        &format!("Health: {}", world.player.health),
        10.0,
        90.0,
        colors::TEXT,
        Font::HUD,
    );
    let time_left = format_countdown(world.level.time_remaining(&world.tuning));
    surface.draw_text(
        &format!("Time: {}", time_left),
        10.0,
        120.0,
        colors::TEXT,
        Font::HUD,
    );

    if let Some(fraction) = world.entities.boss().and_then(|(_, b)| b.health_fraction()) {
        let cx = surface.width() / 2.0;
        let x = cx - BOSS_BAR_WIDTH / 2.0;
        let y = 20.0;
        surface.draw_rect(x, y, BOSS_BAR_WIDTH, BOSS_BAR_HEIGHT, colors::BAR_BACK);
        surface.draw_rect(x, y, BOSS_BAR_WIDTH * fraction, BOSS_BAR_HEIGHT, colors::BAR_FILL);
        surface.draw_text("BOSS", cx, y + 40.0, colors::TEXT, Font::BODY);
    }
}

fn draw_overlay<S: RenderSurface + ?Sized>(surface: &mut S) {
    let (w, h) = (surface.width(), surface.height());
    surface.draw_rect(0.0, 0.0, w, h, colors::OVERLAY);
}

fn draw_pause_menu<S: RenderSurface + ?Sized>(menu: &PauseMenu, surface: &mut S) {
    draw_overlay(surface);
    let cx = surface.width() / 2.0;
    let h = surface.height();
    surface.draw_text("PAUSED", cx, h * 0.3, colors::TEXT, Font::TITLE);
    for (i, option) in PauseMenu::OPTIONS.iter().enumerate() {
        let selected = i == menu.selected_index();
        let (label, color) = if selected {
            (format!("> {} <", option.label()), colors::HIGHLIGHT)
        } else {
            (option.label().to_string(), colors::TEXT)
        };
        surface.draw_text(&label, cx, h * 0.5 + i as f32 * 40.0, color, Font::MENU);
    }
}

fn draw_end_screen<S: RenderSurface + ?Sized>(
    title: &str,
    color: Color,
    world: &World,
    surface: &mut S,
) {
    draw_overlay(surface);
    let cx = surface.width() / 2.0;
    let h = surface.height();
    surface.draw_text(title, cx, h * 0.35, color, Font::TITLE);
    surface.draw_text(
        &format!("Final Score: {}", world.state.score),
        cx,
        h * 0.5,
        colors::TEXT,
        Font::MENU,
    );
    surface.draw_text(
        &format!("Level: {}", world.state.level),
        cx,
        h * 0.5 + 36.0,
        colors::TEXT,
        Font::MENU,
    );
    surface.draw_text(
        "Press ENTER to return to menu",
        cx,
        h * 0.7,
        colors::HIGHLIGHT,
        Font::BODY,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::persistence::{MemoryStore, Persistence, Storage};
    use crate::platform::KeyCode;
    use crate::renderer::{DrawCommand, HeadlessSurface};
    use crate::sim::{Entity, Field};

    fn game_with_scores(scores: &[(u64, u32)]) -> Game {
        let mut storage = Storage::new(MemoryStore::new()).with_clock(|| 0.0);
        for &(score, level) in scores {
            storage.save_score(score, level);
        }
        Game::new(Box::new(storage), Field::default(), 1)
    }

    fn render(game: &Game) -> HeadlessSurface {
        let mut surface = HeadlessSurface::new(800.0, 600.0).unwrap();
        surface.clear();
        draw(game, &mut surface);
        surface
    }

    fn press(game: &mut Game, key: KeyCode) {
        game.input_mut().key_down(key);
        game.update(SIM_DT);
        game.input_mut().key_up(key);
    }

    #[test]
    fn test_main_menu_lists_top_five() {
        let game = game_with_scores(&[(10, 1), (70, 3), (20, 1), (60, 2), (30, 1), (50, 2)]);
        let surface = render(&game);
        assert!(surface.has_text("SPACE SHOOTER"));
        assert!(surface.has_text("1. Score: 70 - Level: 3"));
        assert!(surface.has_text("5. Score: 20 - Level: 1"));
        assert!(!surface.has_text("Score: 10 "));
        assert!(!surface.has_text("6."));
    }

    #[test]
    fn test_empty_leaderboard() {
        let surface = render(&game_with_scores(&[]));
        assert!(surface.has_text("No scores yet"));
    }

    #[test]
    fn test_hud_and_boss_bar() {
        let mut game = game_with_scores(&[]);
        press(&mut game, KeyCode::Enter);
        let surface = render(&game);
        assert!(surface.has_text("Score: 0"));
        assert!(surface.has_text("Level: 1"));
        assert!(surface.has_text("Health: 100"));
        assert!(!surface.has_text("BOSS"));

        let world = game.world_mut();
        let boss = Entity::boss(1, 10, &world.field, world.entities.spawner());
        world.entities.add(boss);
        let surface = render(&game);
        assert!(surface.has_text("BOSS"));
        let bars = surface
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Rect { w, .. } if *w == BOSS_BAR_WIDTH))
            .count();
        assert_eq!(bars, 2);
    }

    #[test]
    fn test_countdown_format() {
        assert_eq!(format_countdown(120.0), "2:00");
        assert_eq!(format_countdown(65.9), "1:05");
        assert_eq!(format_countdown(9.5), "0:09");
        assert_eq!(format_countdown(-3.0), "0:00");
    }

    #[test]
    fn test_hud_timer_counts_down() {
        let mut game = game_with_scores(&[]);
        press(&mut game, KeyCode::Enter);
        assert!(render(&game).has_text("Time: 2:00"));
        for _ in 0..61 {
            game.update(SIM_DT);
        }
        assert!(render(&game).has_text("Time: 1:58"));
    }

    #[test]
    fn test_pause_menu_highlights_selection() {
        let mut game = game_with_scores(&[]);
        press(&mut game, KeyCode::Enter);
        press(&mut game, KeyCode::Escape);
        let surface = render(&game);
        assert!(surface.has_text("PAUSED"));
        assert!(surface.has_text("> Resume <"));
        press(&mut game, KeyCode::ArrowDown);
        assert!(render(&game).has_text("> Main Menu <"));
    }

    #[test]
    fn test_render_does_not_touch_state() {
        let mut game = game_with_scores(&[]);
        press(&mut game, KeyCode::Enter);
        for _ in 0..200 {
            game.update(SIM_DT);
        }
        let before = game.world().snapshot();
        let entities = game.world().entities.len();
        render(&game);
        assert_eq!(game.world().snapshot(), before);
        assert_eq!(game.world().entities.len(), entities);
    }
}
