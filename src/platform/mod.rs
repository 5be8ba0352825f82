//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (monotonic frame clock, wall-clock timestamps)
//! - Input state (held keys and edge-triggered presses)
//! - Logging bootstrap
//! - Browser frame callbacks and keyboard listeners (wasm32)

pub mod input;
pub mod time;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use input::{Input, KeyCode, KeyEvent};

/// Install the logger for this platform. Safe to call more than once.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// Install the logger for this platform. Safe to call more than once.
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}
