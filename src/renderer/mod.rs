//! Rendering
//!
//! The game draws through [`RenderSurface`], a small immediate-mode API (clear, filled
//! rectangles, text, shake). The render pass in [`scene`] only reads game state.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod headless;
pub mod scene;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use headless::{DrawCommand, HeadlessSurface};

/// RGBA, 0.0 - 1.0 per channel
pub type Color = [f32; 4];

/// Convert 0xRRGGBB to an opaque color
pub fn color_from_hex(hex: u32) -> Color {
    let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
    [channel(16), channel(8), channel(0), 1.0]
}

/// Same color with a different alpha
pub fn with_alpha(color: Color, alpha: f32) -> Color {
    [color[0], color[1], color[2], alpha]
}

/// Colors for game elements
pub mod colors {
    use super::Color;

    pub const BACKGROUND: Color = [0.0, 0.0, 0.0, 1.0];
    pub const PLAYER: Color = [0.0, 1.0, 0.0, 1.0];
    pub const ENEMY_BASIC: Color = [1.0, 0.0, 0.0, 1.0];
    pub const ENEMY_FAST: Color = [1.0, 0.53, 0.0, 1.0];
    pub const ENEMY_TANK: Color = [0.53, 0.0, 1.0, 1.0];
    pub const BOSS: Color = [1.0, 0.0, 1.0, 1.0];
    pub const PLAYER_SHOT: Color = [0.0, 1.0, 1.0, 1.0];
    pub const ENEMY_SHOT: Color = [1.0, 0.27, 0.27, 1.0];
    pub const GUN_UPGRADE: Color = [1.0, 1.0, 0.0, 1.0];
    pub const HEALTH_PICKUP: Color = [0.0, 1.0, 0.53, 1.0];
    pub const TEXT: Color = [1.0, 1.0, 1.0, 1.0];
    pub const TEXT_DIM: Color = [0.6, 0.6, 0.6, 1.0];
    pub const HIGHLIGHT: Color = [1.0, 1.0, 0.0, 1.0];
    pub const OVERLAY: Color = [0.0, 0.0, 0.0, 0.7];
    pub const BAR_BACK: Color = [0.27, 0.27, 0.27, 1.0];
    pub const BAR_FILL: Color = [1.0, 0.0, 0.0, 1.0];
}

/// Horizontal anchor of a text run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Font {
    pub size_px: f32,
    pub align: Align,
}

impl Font {
    pub const TITLE: Font = Font::centered(48.0);
    pub const HEADING: Font = Font::centered(32.0);
    pub const MENU: Font = Font::centered(24.0);
    pub const BODY: Font = Font::centered(20.0);
    pub const HUD: Font = Font::left(20.0);

    pub const fn left(size_px: f32) -> Self {
        Self {
            size_px,
            align: Align::Left,
        }
    }

    pub const fn centered(size_px: f32) -> Self {
        Self {
            size_px,
            align: Align::Center,
        }
    }
}

/// Drawing collaborator. Coordinates are field pixels, top-left origin.
pub trait RenderSurface {
    /// Start a frame; applies any active shake offset
    fn clear(&mut self);
    fn draw_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);
    fn draw_text(&mut self, text: &str, x: f32, y: f32, color: Color, font: Font);
    /// Transient camera shake
    fn shake(&mut self, duration: f32, intensity: f32);
    fn width(&self) -> f32;
    fn height(&self) -> f32;
}

/// Camera shake shared by the surfaces: a decaying timer and a random offset per frame
#[derive(Debug)]
pub struct Shake {
    time_left: f32,
    intensity: f32,
    rng: Pcg32,
}

impl Shake {
    pub fn new(seed: u64) -> Self {
        Self {
            time_left: 0.0,
            intensity: 0.0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn request(&mut self, duration: f32, intensity: f32) {
        // Stronger request wins; durations don't stack
        if self.time_left <= 0.0 || intensity >= self.intensity {
            self.intensity = intensity;
        }
        self.time_left = self.time_left.max(duration);
    }

    pub fn is_active(&self) -> bool {
        self.time_left > 0.0
    }

    /// Consume `secs` of shake and return this frame's offset
    pub fn advance(&mut self, secs: f32) -> (f32, f32) {
        if self.time_left <= 0.0 {
            self.time_left = 0.0;
            return (0.0, 0.0);
        }
        self.time_left -= secs;
        let i = self.intensity;
        (
            self.rng.random_range(-0.5f32..=0.5) * i,
            self.rng.random_range(-0.5f32..=0.5) * i,
        )
    }
}
