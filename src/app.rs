//! Frame handler gluing the game to its collaborators
//!
//! The loop calls `update` a fixed number of times per frame, then `render` once.
//! Events raised by the simulation are routed to audio and the surface during update,
//! so rendering stays read-only.

use crate::audio::AudioSink;
use crate::game::Game;
use crate::game_loop::FrameHandler;
use crate::renderer::{RenderSurface, scene};
use crate::sim::GameEvent;

pub struct App<S: RenderSurface, A: AudioSink> {
    game: Game,
    surface: S,
    audio: A,
}

impl<S: RenderSurface, A: AudioSink> App<S, A> {
    pub fn new(game: Game, surface: S, audio: A) -> Self {
        Self {
            game,
            surface,
            audio,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    fn dispatch(&mut self, event: GameEvent) {
        match event {
            GameEvent::Sound(effect) => self.audio.play(effect),
            GameEvent::Shake {
                duration,
                intensity,
            } => {
                if self.game.settings().screen_shake {
                    self.surface.shake(duration, intensity);
                }
            }
            GameEvent::BossSpawned { level } => log::debug!("Boss spawned on level {}", level),
            GameEvent::LevelCleared { level } => log::debug!("Level {} cleared", level),
            GameEvent::Victory { score } => log::info!("Campaign complete with score {}", score),
            GameEvent::PlayerDestroyed { score, level } => {
                log::debug!("Player destroyed (score {}, level {})", score, level)
            }
        }
    }
}

impl<S: RenderSurface, A: AudioSink> FrameHandler for App<S, A> {
    fn update(&mut self, dt: f32) {
        self.game.update(dt);
        for event in self.game.drain_events() {
            self.dispatch(event);
        }
    }

    fn render(&mut self) {
        self.surface.clear();
        scene::draw(&self.game, &mut self.surface);
    }
}
