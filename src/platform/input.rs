//! Keyboard input state
//!
//! Events are fed in as they arrive; gameplay polls. `update()` must run once per tick
//! after all mode logic so that `is_key_pressed` is edge-triggered.

use std::collections::HashSet;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    KeyW,
    KeyA,
    KeyS,
    KeyD,
    Space,
    Enter,
    Escape,
}

impl KeyCode {
    /// Map a DOM `KeyboardEvent.code` string
    pub fn from_code(code: &str) -> Option<Self> {
        let key = match code {
            "ArrowLeft" => KeyCode::ArrowLeft,
            "ArrowRight" => KeyCode::ArrowRight,
            "ArrowUp" => KeyCode::ArrowUp,
            "ArrowDown" => KeyCode::ArrowDown,
            "KeyW" => KeyCode::KeyW,
            "KeyA" => KeyCode::KeyA,
            "KeyS" => KeyCode::KeyS,
            "KeyD" => KeyCode::KeyD,
            "Space" => KeyCode::Space,
            "Enter" | "NumpadEnter" => KeyCode::Enter,
            "Escape" => KeyCode::Escape,
            _ => return None,
        };
        Some(key)
    }
}

/// A keyboard change as delivered by the host window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Down(KeyCode),
    Up(KeyCode),
    /// Window lost focus; releases arrive elsewhere
    FocusLost,
}

#[derive(Debug, Clone, Default)]
pub struct Input {
    keys: HashSet<KeyCode>,
    previous: HashSet<KeyCode>,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key went down (repeats are harmless)
    pub fn key_down(&mut self, key: KeyCode) {
        self.keys.insert(key);
    }

    pub fn key_up(&mut self, key: KeyCode) {
        self.keys.remove(&key);
    }

    /// Drop every held key (window lost focus)
    pub fn release_all(&mut self) {
        self.keys.clear();
    }

    pub fn apply(&mut self, event: KeyEvent) {
        match event {
            KeyEvent::Down(key) => self.key_down(key),
            KeyEvent::Up(key) => self.key_up(key),
            KeyEvent::FocusLost => self.release_all(),
        }
    }

    /// True while the key is physically held
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys.contains(&key)
    }

    /// True only on the tick the key went from up to down
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys.contains(&key) && !self.previous.contains(&key)
    }

    /// True if any of the keys is held
    pub fn any_down(&self, keys: &[KeyCode]) -> bool {
        keys.iter().any(|k| self.is_key_down(*k))
    }

    /// True if any of the keys was pressed this tick
    pub fn any_pressed(&self, keys: &[KeyCode]) -> bool {
        keys.iter().any(|k| self.is_key_pressed(*k))
    }

    /// Snapshot this tick's keys as the previous state
    pub fn update(&mut self) {
        self.previous.clone_from(&self.keys);
    }
}
