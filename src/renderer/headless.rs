//! Headless surface
//!
//! Records the draw calls of the last frame instead of rasterizing them. Backs the
//! headless binary and rendering tests.

use super::{Color, Font, RenderSurface, Shake};
use crate::consts::SIM_DT;
use crate::error::GameError;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear {
        offset: (f32, f32),
    },
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Color,
    },
    Text {
        text: String,
        x: f32,
        y: f32,
        color: Color,
        font: Font,
    },
}

#[derive(Debug)]
pub struct HeadlessSurface {
    width: f32,
    height: f32,
    commands: Vec<DrawCommand>,
    frames: u64,
    shake: Shake,
    offset: (f32, f32),
    /// Seconds a `clear` stands for when decaying shake
    frame_secs: f32,
}

impl HeadlessSurface {
    pub fn new(width: f32, height: f32) -> Result<Self, GameError> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(GameError::SurfaceUnavailable {
                reason: format!("invalid surface size {width}x{height}"),
            });
        }
        Ok(Self {
            width,
            height,
            commands: Vec::new(),
            frames: 0,
            shake: Shake::new(0),
            offset: (0.0, 0.0),
            frame_secs: SIM_DT,
        })
    }

    /// Draw calls since the last `clear`
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Text runs of the current frame
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn is_shaking(&self) -> bool {
        self.shake.is_active()
    }
}

impl RenderSurface for HeadlessSurface {
    fn clear(&mut self) {
        self.commands.clear();
        self.frames += 1;

        self.offset = self.shake.advance(self.frame_secs);
        self.commands.push(DrawCommand::Clear {
            offset: self.offset,
        });
    }

    fn draw_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.commands.push(DrawCommand::Rect {
            x: x + self.offset.0,
            y: y + self.offset.1,
            w,
            h,
            color,
        });
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, color: Color, font: Font) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            x: x + self.offset.0,
            y: y + self.offset.1,
            color,
            font,
        });
    }

    fn shake(&mut self, duration: f32, intensity: f32) {
        self.shake.request(duration, intensity);
    }

    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }
}
