//! Game mode state machine
//!
//! Decides which subsystem sees input each tick: main menu, gameplay, pause menu, or
//! the terminal game over / victory screens. Gameplay only advances while `Playing`.

use crate::highscores::HighScoreEntry;
use crate::persistence::Persistence;
use crate::platform::{Input, KeyCode};
use crate::settings::Settings;
use crate::sim::{Field, GameEvent, Snapshot, TickInput, TickOutcome, World, autopilot_input, tick};
use crate::tuning::Tuning;

/// Entries listed on the main menu
pub const MENU_HIGH_SCORES: usize = 5;

pub const CONFIRM_KEYS: &[KeyCode] = &[KeyCode::Enter];
pub const CANCEL_KEYS: &[KeyCode] = &[KeyCode::Escape];
pub const UP_KEYS: &[KeyCode] = &[KeyCode::ArrowUp, KeyCode::KeyW];
pub const DOWN_KEYS: &[KeyCode] = &[KeyCode::ArrowDown, KeyCode::KeyS];
pub const LEFT_KEYS: &[KeyCode] = &[KeyCode::ArrowLeft, KeyCode::KeyA];
pub const RIGHT_KEYS: &[KeyCode] = &[KeyCode::ArrowRight, KeyCode::KeyD];
pub const FIRE_KEYS: &[KeyCode] = &[KeyCode::Space];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    MainMenu,
    Playing,
    Paused,
    GameOver,
    Victory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseOption {
    Resume,
    MainMenu,
}

impl PauseOption {
    pub fn label(&self) -> &'static str {
        match self {
            PauseOption::Resume => "Resume",
            PauseOption::MainMenu => "Main Menu",
        }
    }
}

/// Pause menu cursor
#[derive(Debug, Clone, Default)]
pub struct PauseMenu {
    selected: usize,
}

impl PauseMenu {
    pub const OPTIONS: [PauseOption; 2] = [PauseOption::Resume, PauseOption::MainMenu];

    pub fn selected(&self) -> PauseOption {
        Self::OPTIONS[self.selected]
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        self.selected = (self.selected + 1).min(Self::OPTIONS.len() - 1);
    }

    pub fn reset(&mut self) {
        self.selected = 0;
    }
}

/// Translate held keys into gameplay commands
pub fn read_tick_input(input: &Input) -> TickInput {
    TickInput {
        left: input.any_down(LEFT_KEYS),
        right: input.any_down(RIGHT_KEYS),
        up: input.any_down(UP_KEYS),
        down: input.any_down(DOWN_KEYS),
        fire: input.any_down(FIRE_KEYS),
    }
}

pub struct Game {
    mode: Mode,
    world: World,
    input: Input,
    pause_menu: PauseMenu,
    /// One-slot resume point filled when leaving a paused run for the menu
    snapshot: Option<Snapshot>,
    persistence: Box<dyn Persistence>,
    settings: Settings,
    high_scores: Vec<HighScoreEntry>,
    events: Vec<GameEvent>,
    field: Field,
    seed: u64,
    /// Runs started since construction; varies the world seed across restarts
    runs: u64,
    /// Autopilot drives the ship instead of the keyboard
    demo: bool,
}

impl Game {
    pub fn new(persistence: Box<dyn Persistence>, field: Field, seed: u64) -> Self {
        let settings = persistence.config();
        log::info!(
            "Settings loaded (difficulty {})",
            settings.difficulty.as_str()
        );
        let world = Self::new_world(seed, field, &settings);
        let mut game = Self {
            mode: Mode::MainMenu,
            world,
            input: Input::new(),
            pause_menu: PauseMenu::default(),
            snapshot: None,
            persistence,
            settings,
            high_scores: Vec::new(),
            events: Vec::new(),
            field,
            seed,
            runs: 0,
            demo: false,
        };
        game.refresh_high_scores();
        game
    }

    fn new_world(seed: u64, field: Field, settings: &Settings) -> World {
        let mut world = World::new(seed, field, Tuning::for_difficulty(settings.difficulty));
        world.particles = settings.particles;
        world
    }

    fn refresh_high_scores(&mut self) {
        self.high_scores = self.persistence.high_scores(MENU_HIGH_SCORES);
        log::info!("Loaded {} high scores", self.high_scores.len());
    }

    fn set_mode(&mut self, mode: Mode) {
        log::info!("Mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
    }

    /// One fixed step: dispatch to the active mode, then latch input for edge detection
    pub fn update(&mut self, dt: f32) {
        match self.mode {
            Mode::MainMenu => self.update_main_menu(),
            Mode::Playing => self.update_playing(dt),
            Mode::Paused => self.update_paused(),
            Mode::GameOver | Mode::Victory => {
                if self.input.any_pressed(CONFIRM_KEYS) {
                    self.restart();
                }
            }
        }
        self.input.update();
    }

    fn update_main_menu(&mut self) {
        if !self.input.any_pressed(CONFIRM_KEYS) {
            return;
        }
        if let Some(snapshot) = self.snapshot.take() {
            self.world.restore(&snapshot);
            log::info!(
                "Resuming level {} with score {}",
                snapshot.level,
                snapshot.score
            );
        }
        self.set_mode(Mode::Playing);
    }

    fn update_playing(&mut self, dt: f32) {
        if self.input.any_pressed(CANCEL_KEYS) {
            self.pause_menu.reset();
            self.set_mode(Mode::Paused);
            return;
        }

        let input = if self.demo {
            autopilot_input(&self.world)
        } else {
            read_tick_input(&self.input)
        };

        match tick(&mut self.world, &input, dt, &mut self.events) {
            TickOutcome::Continue => {}
            TickOutcome::Defeat => {
                let state = &self.world.state;
                log::info!("Game over: score {} on level {}", state.score, state.level);
                self.persistence.save_score(state.score, state.level);
                self.set_mode(Mode::GameOver);
            }
            TickOutcome::Victory => self.set_mode(Mode::Victory),
        }
    }

    fn update_paused(&mut self) {
        if self.input.any_pressed(CANCEL_KEYS) {
            self.set_mode(Mode::Playing);
            return;
        }
        if self.input.any_pressed(UP_KEYS) {
            self.pause_menu.move_up();
        }
        if self.input.any_pressed(DOWN_KEYS) {
            self.pause_menu.move_down();
        }
        if !self.input.any_pressed(CONFIRM_KEYS) {
            return;
        }
        match self.pause_menu.selected() {
            PauseOption::Resume => self.set_mode(Mode::Playing),
            PauseOption::MainMenu => {
                self.snapshot = Some(self.world.snapshot());
                self.refresh_high_scores();
                self.set_mode(Mode::MainMenu);
            }
        }
    }

    /// Full reset: fresh world, no snapshot, back to the main menu
    pub fn restart(&mut self) {
        self.runs += 1;
        self.world = Self::new_world(self.seed.wrapping_add(self.runs), self.field, &self.settings);
        self.snapshot = None;
        self.pause_menu.reset();
        self.refresh_high_scores();
        self.set_mode(Mode::MainMenu);
    }

    /// Events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Persist new settings; effects toggles apply now, difficulty from the next run
    pub fn update_settings(&mut self, settings: Settings) {
        let settings = settings.sanitized();
        self.persistence.save_config(&settings);
        self.world.particles = settings.particles;
        self.settings = settings;
    }

    pub fn set_demo(&mut self, demo: bool) {
        self.demo = demo;
    }

    pub fn is_demo(&self) -> bool {
        self.demo
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn input_mut(&mut self) -> &mut Input {
        &mut self.input
    }

    pub fn pause_menu(&self) -> &PauseMenu {
        &self.pause_menu
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Main menu leaderboard, refreshed whenever the menu is entered
    pub fn high_scores(&self) -> &[HighScoreEntry] {
        &self.high_scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::persistence::{MemoryStore, Storage};
    use crate::settings::Difficulty;
    use crate::sim::{EnemyArchetype, Entity};

    fn game() -> (Game, MemoryStore) {
        let store = MemoryStore::new();
        let storage = Storage::new(store.clone()).with_clock(|| 1.0);
        (Game::new(Box::new(storage), Field::default(), 7), store)
    }

    fn press(game: &mut Game, key: KeyCode) {
        game.input_mut().key_down(key);
        game.update(SIM_DT);
        game.input_mut().key_up(key);
    }

    fn playing() -> (Game, MemoryStore) {
        let (mut game, store) = game();
        press(&mut game, KeyCode::Enter);
        assert_eq!(game.mode(), Mode::Playing);
        (game, store)
    }

    #[test]
    fn test_menu_is_inert_without_confirm() {
        let (mut game, _) = game();
        game.input_mut().key_down(KeyCode::Space);
        for _ in 0..120 {
            game.update(SIM_DT);
        }
        assert_eq!(game.mode(), Mode::MainMenu);
        assert_eq!(game.world().level.elapsed(), 0.0);
        assert!(game.world().entities.is_empty());
    }

    #[test]
    fn test_pause_and_resume_with_escape() {
        let (mut game, _) = playing();
        game.update(SIM_DT);
        press(&mut game, KeyCode::Escape);
        assert_eq!(game.mode(), Mode::Paused);

        let elapsed = game.world().level.elapsed();
        for _ in 0..60 {
            game.update(SIM_DT);
        }
        assert_eq!(game.world().level.elapsed(), elapsed);

        press(&mut game, KeyCode::Escape);
        assert_eq!(game.mode(), Mode::Playing);
    }

    #[test]
    fn test_pause_menu_navigation_clamps() {
        let (mut game, _) = playing();
        press(&mut game, KeyCode::Escape);
        assert_eq!(game.pause_menu().selected(), PauseOption::Resume);
        press(&mut game, KeyCode::ArrowUp);
        assert_eq!(game.pause_menu().selected(), PauseOption::Resume);
        press(&mut game, KeyCode::KeyS);
        press(&mut game, KeyCode::ArrowDown);
        assert_eq!(game.pause_menu().selected(), PauseOption::MainMenu);
        press(&mut game, KeyCode::KeyW);
        assert_eq!(game.pause_menu().selected(), PauseOption::Resume);
        press(&mut game, KeyCode::Enter);
        assert_eq!(game.mode(), Mode::Playing);
        assert!(game.snapshot().is_none());
    }

    #[test]
    fn test_contact_hits_end_run_and_save_score() {
        let (mut game, store) = playing();
        game.world_mut().state.add_score(250);
        for _ in 0..10 {
            let world = game.world_mut();
            let p = world.player.pos;
            let enemy = Entity::enemy(EnemyArchetype::Basic, p.x, p.y, 1, world.entities.spawner());
            world.entities.add(enemy);
            game.update(SIM_DT);
        }
        assert_eq!(game.mode(), Mode::GameOver);
        assert_eq!(game.world().player.health, 0);
        assert!(!store.is_empty());
        let events = game.drain_events();
        assert!(events.iter().any(|e| matches!(e, GameEvent::PlayerDestroyed { score: 250, .. })));

        // Terminal until confirmed, then a full reset to the menu
        game.update(SIM_DT);
        assert_eq!(game.mode(), Mode::GameOver);
        press(&mut game, KeyCode::Enter);
        assert_eq!(game.mode(), Mode::MainMenu);
        assert_eq!(game.world().state.score, 0);
        assert_eq!(game.high_scores()[0].score, 250);
        assert_eq!(game.high_scores()[0].level, 1);
    }

    #[test]
    fn test_failed_save_does_not_block_game_over() {
        let (mut game, store) = playing();
        store.set_failing(true);
        game.world_mut().player.health = 5;
        let world = game.world_mut();
        let p = world.player.pos;
        let enemy = Entity::enemy(EnemyArchetype::Basic, p.x, p.y, 1, world.entities.spawner());
        world.entities.add(enemy);
        game.update(SIM_DT);
        assert_eq!(game.mode(), Mode::GameOver);
    }

    #[test]
    fn test_menu_round_trip_restores_snapshot() {
        let (mut game, _) = playing();
        for _ in 0..300 {
            game.update(SIM_DT);
        }
        {
            let world = game.world_mut();
            world.state.add_score(640);
            world.player.health = 70;
            world.player.gun_level = 3;
            world.player.pos.x = 123.0;
        }
        let expected = game.world().snapshot();

        press(&mut game, KeyCode::Escape);
        press(&mut game, KeyCode::ArrowDown);
        press(&mut game, KeyCode::Enter);
        assert_eq!(game.mode(), Mode::MainMenu);
        assert_eq!(game.snapshot(), Some(&expected));

        // Let the menu see Enter released so the next press is a fresh edge
        game.update(SIM_DT);
        assert_eq!(game.mode(), Mode::MainMenu);
        press(&mut game, KeyCode::Enter);
        assert_eq!(game.mode(), Mode::Playing);
        assert!(game.snapshot().is_none());
        let world = game.world();
        assert_eq!(world.snapshot(), expected);
        assert_eq!(world.level.elapsed(), 0.0);
        assert_eq!(world.level.spawn_timer(), 0.0);
        assert!(world.entities.is_empty());
    }

    #[test]
    fn test_victory_is_terminal_until_confirm() {
        let (mut game, store) = playing();
        {
            let world = game.world_mut();
            world.tuning.level_duration = 0.05;
            world.state.level = world.tuning.final_level;
        }
        for _ in 0..10 {
            game.update(SIM_DT);
        }
        for entity in game.world_mut().entities.entities_mut() {
            if entity.is_boss() {
                entity.active = false;
            }
        }
        game.update(SIM_DT);
        assert_eq!(game.mode(), Mode::Victory);
        assert!(game.world().state.is_victory());
        // Victory does not record a score
        assert!(store.is_empty());

        press(&mut game, KeyCode::Enter);
        assert_eq!(game.mode(), Mode::MainMenu);
        assert!(!game.world().state.is_finished());
    }

    #[test]
    fn test_settings_are_persisted_and_applied() {
        let (mut game, store) = game();
        let settings = Settings {
            particles: false,
            difficulty: Difficulty::Hard,
            ..Default::default()
        };
        game.update_settings(settings.clone());
        assert!(!game.world().particles);

        let reloaded = Game::new(Box::new(Storage::new(store)), Field::default(), 7);
        assert_eq!(reloaded.settings(), &settings);
        assert_eq!(
            reloaded.world().tuning,
            Tuning::for_difficulty(Difficulty::Hard)
        );
    }

    #[test]
    fn test_demo_mode_plays_itself() {
        let (mut game, _) = playing();
        game.set_demo(true);
        for _ in 0..120 {
            game.update(SIM_DT);
        }
        let shots = game
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::Sound(crate::audio::SoundEffect::Shoot)))
            .count();
        assert!(shots > 0);
    }
}
