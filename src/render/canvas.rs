//! Canvas 2D painter (wasm32 only).

use web_sys::CanvasRenderingContext2d;

use super::Painter;
use crate::types::Rect;

/// Default font for cell text
pub const DEFAULT_FONT: &str = "13px sans-serif";

/// [`Painter`] over a browser canvas context
pub struct CanvasPainter {
    ctx: CanvasRenderingContext2d,
    /// Scroll/page offset applied to every primitive
    offset_x: f64,
    offset_y: f64,
}

impl CanvasPainter {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        ctx.set_font(DEFAULT_FONT);
        ctx.set_text_baseline("top");
        Self {
            ctx,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    /// Translate subsequent primitives, e.g. by the negated scroll position.
    pub fn set_offset(&mut self, x: f32, y: f32) {
        self.offset_x = f64::from(x);
        self.offset_y = f64::from(y);
    }

    /// Helper to get crisp pixel position for 1px lines
    fn crisp(x: f64) -> f64 {
        x.floor() + 0.5
    }
}

impl Painter for CanvasPainter {
    fn fill_rect(&mut self, rect: Rect, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(
            f64::from(rect.x) + self.offset_x,
            f64::from(rect.y) + self.offset_y,
            f64::from(rect.width),
            f64::from(rect.height),
        );
    }

    fn stroke_rect(&mut self, rect: Rect, color: &str, width: f32) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(f64::from(width));
        self.ctx.stroke_rect(
            Self::crisp(f64::from(rect.x) + self.offset_x),
            Self::crisp(f64::from(rect.y) + self.offset_y),
            f64::from(rect.width),
            f64::from(rect.height),
        );
    }

    fn draw_text(&mut self, x: f32, y: f32, text: &str, color: &str) {
        self.ctx.set_fill_style_str(color);
        let _ = self.ctx.fill_text(
            text,
            f64::from(x) + self.offset_x,
            f64::from(y) + self.offset_y,
        );
    }
}
