//! Paint primitives.
//!
//! The table core decides *what* to paint; a [`Painter`] decides *how*.
//! Backends (Canvas 2D, PDF writers, test recorders) implement this trait.

use serde::Serialize;

use crate::types::Rect;

/// Drawing surface used by the render path
pub trait Painter {
    /// Fill `rect` with a CSS color.
    fn fill_rect(&mut self, rect: Rect, color: &str);

    /// Stroke the outline of `rect`.
    fn stroke_rect(&mut self, rect: Rect, color: &str, width: f32);

    /// Draw one line of text with its top-left corner at `(x, y)`.
    fn draw_text(&mut self, x: f32, y: f32, text: &str, color: &str);
}

/// A recorded paint call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum PaintOp {
    FillRect { rect: Rect, color: String },
    StrokeRect { rect: Rect, color: String, width: f32 },
    Text { x: f32, y: f32, text: String, color: String },
}

/// Painter that records every call, in order
#[derive(Debug, Clone, Default)]
pub struct RecordingPainter {
    pub ops: Vec<PaintOp>,
}

impl RecordingPainter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded text lines, in paint order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                PaintOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Outlines stroked, in paint order (one per painted cell).
    pub fn outlines(&self) -> Vec<Rect> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                PaintOp::StrokeRect { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }
}

impl Painter for RecordingPainter {
    fn fill_rect(&mut self, rect: Rect, color: &str) {
        self.ops.push(PaintOp::FillRect {
            rect,
            color: color.to_string(),
        });
    }

    fn stroke_rect(&mut self, rect: Rect, color: &str, width: f32) {
        self.ops.push(PaintOp::StrokeRect {
            rect,
            color: color.to_string(),
            width,
        });
    }

    fn draw_text(&mut self, x: f32, y: f32, text: &str, color: &str) {
        self.ops.push(PaintOp::Text {
            x,
            y,
            text: text.to_string(),
            color: color.to_string(),
        });
    }
}
