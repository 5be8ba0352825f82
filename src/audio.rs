//! Audio cues
//!
//! Gameplay only names cues; synthesis belongs to whatever sink is plugged in.

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Player volley fired
    Shoot,
    /// Enemy destroyed
    Explosion,
    /// Player damaged
    Hit,
    /// Power-up collected
    PowerUp,
    /// Player destroyed
    GameOver,
}

impl SoundEffect {
    /// Cue name as understood by the audio backend
    pub fn name(&self) -> &'static str {
        match self {
            SoundEffect::Shoot => "shoot",
            SoundEffect::Explosion => "explosion",
            SoundEffect::Hit => "hit",
            SoundEffect::PowerUp => "powerUp",
            SoundEffect::GameOver => "gameOver",
        }
    }
}

/// Fire-and-forget cue consumer
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
}

/// Recording sink, handy for tests and replays
impl AudioSink for Vec<SoundEffect> {
    fn play(&mut self, effect: SoundEffect) {
        self.push(effect);
    }
}

/// Audio manager for the game
///
/// Applies volume and mute from [`Settings`] and forwards audible cues to the backend
/// callback. Without a backend cues are only logged.
pub struct AudioManager {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    backend: Option<Box<dyn FnMut(&'static str, f32)>>,
    played: u64,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self::from_settings(&Settings::default())
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            muted: settings.muted,
            backend: None,
            played: 0,
        }
    }

    /// Attach the synthesis backend (cue name, volume)
    pub fn with_backend(mut self, backend: impl FnMut(&'static str, f32) + 'static) -> Self {
        self.backend = Some(Box::new(backend));
        self
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Number of cues that were audible when played
    pub fn played(&self) -> u64 {
        self.played
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }
}

impl AudioSink for AudioManager {
    fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.played += 1;
        match &mut self.backend {
            Some(backend) => backend(effect.name(), vol),
            None => log::debug!("cue {} at volume {:.2}", effect.name(), vol),
        }
    }
}
