//! Best-effort persistence
//!
//! High scores and the settings record are stored as JSON under fixed keys in a
//! [`KeyValueStore`]. The [`Persistence`] facade never fails: storage errors are logged
//! and the game carries on with empty or default data.

pub mod store;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StorageError;
use crate::highscores::{HighScoreEntry, HighScores};
use crate::settings::Settings;

#[cfg(target_arch = "wasm32")]
pub use store::LocalStorageStore;
pub use store::{FileStore, MemoryStore};

/// Raw string storage keyed by name
pub trait KeyValueStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn store(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// What gameplay and menus need from storage. Calls never fail and never block for long.
pub trait Persistence {
    /// Record a finished run
    fn save_score(&mut self, score: u64, level: u32);
    /// Best scores, descending, at most `limit`
    fn high_scores(&self, limit: usize) -> Vec<HighScoreEntry>;
    fn save_config(&mut self, settings: &Settings);
    /// Stored settings, or defaults
    fn config(&self) -> Settings;
}

/// [`Persistence`] over any key-value backend
pub struct Storage<K> {
    store: K,
    clock: fn() -> f64,
}

impl<K: KeyValueStore> Storage<K> {
    pub fn new(store: K) -> Self {
        Self {
            store,
            clock: crate::platform::time::timestamp_ms,
        }
    }

    /// Override the timestamp source for score entries
    pub fn with_clock(mut self, clock: fn() -> f64) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.store.load(key)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn write<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(value)?;
        self.store.store(key, &json)
    }

    pub fn load_high_scores(&self) -> Result<HighScores, StorageError> {
        Ok(self
            .read::<HighScores>(HighScores::STORAGE_KEY)?
            .unwrap_or_default()
            .normalized())
    }

    /// Insert a score and write the table back. Returns the rank achieved, if any.
    pub fn try_save_score(
        &mut self,
        score: u64,
        level: u32,
    ) -> Result<Option<usize>, StorageError> {
        // An unreadable table is replaced rather than blocking new scores
        let mut scores = self.load_high_scores().unwrap_or_else(|e| {
            log::warn!("Discarding unreadable high scores: {}", e);
            HighScores::new()
        });
        let rank = scores.add_score(score, level, (self.clock)());
        if rank.is_some() {
            self.write(HighScores::STORAGE_KEY, &scores)?;
            log::info!("High scores saved ({} entries)", scores.entries.len());
        }
        Ok(rank)
    }

    pub fn load_config(&self) -> Result<Option<Settings>, StorageError> {
        Ok(self
            .read::<Settings>(Settings::STORAGE_KEY)?
            .map(Settings::sanitized))
    }

    pub fn try_save_config(&mut self, settings: &Settings) -> Result<(), StorageError> {
        self.write(Settings::STORAGE_KEY, settings)
    }
}

impl<K: KeyValueStore> Persistence for Storage<K> {
    fn save_score(&mut self, score: u64, level: u32) {
        match self.try_save_score(score, level) {
            Ok(Some(rank)) => log::info!("Score {} ranked #{}", score, rank),
            Ok(None) => log::debug!("Score {} did not make the table", score),
            Err(e) => log::warn!("Failed to save score {}: {}", score, e),
        }
    }

    fn high_scores(&self, limit: usize) -> Vec<HighScoreEntry> {
        match self.load_high_scores() {
            Ok(scores) => scores.top(limit),
            Err(e) => {
                log::warn!("Failed to load high scores: {}", e);
                Vec::new()
            }
        }
    }

    fn save_config(&mut self, settings: &Settings) {
        if let Err(e) = self.try_save_config(settings) {
            log::warn!("Failed to save settings: {}", e);
        }
    }

    fn config(&self) -> Settings {
        match self.load_config() {
            Ok(Some(settings)) => settings,
            Ok(None) => Settings::default(),
            Err(e) => {
                log::warn!("Failed to load settings, using defaults: {}", e);
                Settings::default()
            }
        }
    }
}
