//! Game settings and preferences
//!
//! The single persisted config record. Stored through `Persistence::save_config`.

use serde::{Deserialize, Serialize};

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "medium" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Multiplier applied to the ordinary enemy spawn interval
    pub fn spawn_interval_scale(&self) -> f32 {
        match self {
            Difficulty::Easy => 1.25,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 0.8,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Mute all cues
    #[serde(default)]
    pub muted: bool,
    /// Spawn pacing preset
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Screen shake on explosions/impacts
    #[serde(default = "default_true")]
    pub screen_shake: bool,
    /// Particle bursts (explosions, sparks)
    #[serde(default = "default_true")]
    pub particles: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.3,
            sfx_volume: 1.0,
            muted: false,
            difficulty: Difficulty::Normal,
            screen_shake: true,
            particles: true,
        }
    }
}

impl Settings {
    /// Storage key for the config record
    pub const STORAGE_KEY: &'static str = "space_shooter_settings";

    /// Clamp volumes into range (records from older builds or hand edits)
    pub fn sanitized(mut self) -> Self {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self
    }

    /// Volume actually applied to cues
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_parse() {
        assert_eq!(Difficulty::parse("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::parse("medium"), Some(Difficulty::Normal));
        assert_eq!(Difficulty::parse("nightmare"), None);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"master_volume":0.5,"sfx_volume":0.5}"#).unwrap();
        assert_eq!(settings.difficulty, Difficulty::Normal);
        assert!(settings.screen_shake);
        assert!(settings.particles);
        assert!(!settings.muted);
    }

    #[test]
    fn test_sanitized_clamps_volume() {
        let settings = Settings {
            master_volume: 3.0,
            sfx_volume: -1.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.sfx_volume, 0.0);
    }

    #[test]
    fn test_muted_volume_is_zero() {
        let settings = Settings {
            muted: true,
            ..Default::default()
        };
        assert_eq!(settings.effective_volume(), 0.0);
    }
}
