//! Canvas 2D surface (wasm32)

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{Align, Color, Font, RenderSurface, Shake, colors};
use crate::error::GameError;
use crate::platform::time::{monotonic_ms, timestamp_ms};

pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    width: f32,
    height: f32,
    shake: Shake,
    offset: (f32, f32),
    last_clear_ms: Option<f64>,
}

impl CanvasSurface {
    /// Size the canvas to the field and take its 2D context
    pub fn new(canvas: HtmlCanvasElement, width: f32, height: f32) -> Result<Self, GameError> {
        let unavailable = |reason: String| GameError::SurfaceUnavailable { reason };
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| unavailable(format!("{e:?}")))?
            .ok_or_else(|| unavailable("2d context not supported".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| unavailable("unexpected context type".into()))?;
        Ok(Self {
            ctx,
            width,
            height,
            shake: Shake::new(timestamp_ms() as u64),
            offset: (0.0, 0.0),
            last_clear_ms: None,
        })
    }

    fn fill_style(&self, color: Color) {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        self.ctx.set_fill_style_str(&format!(
            "rgba({}, {}, {}, {})",
            channel(color[0]),
            channel(color[1]),
            channel(color[2]),
            color[3].clamp(0.0, 1.0)
        ));
    }
}

impl RenderSurface for CanvasSurface {
    fn clear(&mut self) {
        // Shake decays on wall time, whatever the refresh rate
        let now = monotonic_ms();
        let secs = self
            .last_clear_ms
            .map_or(0.0, |last| ((now - last) / 1000.0) as f32);
        self.last_clear_ms = Some(now);
        self.offset = self.shake.advance(secs);

        self.fill_style(colors::BACKGROUND);
        self.ctx
            .fill_rect(0.0, 0.0, f64::from(self.width), f64::from(self.height));
    }

    fn draw_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.fill_style(color);
        self.ctx.fill_rect(
            f64::from(x + self.offset.0),
            f64::from(y + self.offset.1),
            f64::from(w),
            f64::from(h),
        );
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, color: Color, font: Font) {
        self.fill_style(color);
        self.ctx.set_font(&format!("{}px monospace", font.size_px));
        self.ctx.set_text_align(match font.align {
            Align::Left => "left",
            Align::Center => "center",
        });
        if let Err(e) = self.ctx.fill_text(
            text,
            f64::from(x + self.offset.0),
            f64::from(y + self.offset.1),
        ) {
            log::warn!("fillText failed: {:?}", e);
        }
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
