//! Viewport state management for scrolling a laid-out table.

use super::LayoutEngine;
use crate::types::{Point, Rect};

/// Viewport state - represents the visible area of the table
#[derive(Debug, Clone)]
pub struct Viewport {
    /// Horizontal scroll position in table coordinates
    pub scroll_x: f32,
    /// Vertical scroll position in table coordinates
    pub scroll_y: f32,
    /// Viewport width in pixels
    pub width: f32,
    /// Viewport height in pixels
    pub height: f32,
    /// Zoom scale factor (1.0 = 100%)
    pub scale: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            width,
            height,
            scale: 1.0,
        }
    }

    /// Visible area in table coordinates.
    pub fn clip_rect(&self) -> Rect {
        let scale = self.effective_scale();
        Rect::new(
            self.scroll_x,
            self.scroll_y,
            self.width / scale,
            self.height / scale,
        )
    }

    /// Inclusive range of rows intersecting the viewport.
    pub fn visible_rows(&self, layout: &LayoutEngine) -> Option<(usize, usize)> {
        let clip = self.clip_rect();
        layout.visible_rows(clip.y, clip.height)
    }

    /// Inclusive range of columns intersecting the viewport.
    pub fn visible_cols(&self, layout: &LayoutEngine) -> Option<(usize, usize)> {
        let clip = self.clip_rect();
        let start = col_at_x(layout.col_positions(), clip.x)?;
        let end = col_at_x(layout.col_positions(), clip.right())?;
        Some((start, end))
    }

    /// Convert table coordinates to screen coordinates
    pub fn to_screen(&self, point: Point) -> Point {
        Point::new(
            (point.x - self.scroll_x) * self.scale,
            (point.y - self.scroll_y) * self.scale,
        )
    }

    /// Convert screen coordinates to table coordinates
    pub fn to_table(&self, screen: Point) -> Point {
        let scale = self.effective_scale();
        Point::new(
            screen.x / scale + self.scroll_x,
            screen.y / scale + self.scroll_y,
        )
    }

    /// Clamp scroll position so the viewport never scrolls past the table.
    pub fn clamp_scroll(&mut self, layout: &LayoutEngine) {
        let clip = self.clip_rect();
        let max_x = (layout.width() - clip.width).max(0.0);
        let max_y = (layout.height() - clip.height).max(0.0);
        self.scroll_x = self.scroll_x.clamp(0.0, max_x);
        self.scroll_y = self.scroll_y.clamp(0.0, max_y);
    }

    /// Scroll by delta amounts
    pub fn scroll_by(&mut self, delta_x: f32, delta_y: f32, layout: &LayoutEngine) {
        self.scroll_x += delta_x;
        self.scroll_y += delta_y;
        self.clamp_scroll(layout);
    }

    /// Set absolute scroll position
    pub fn set_scroll(&mut self, x: f32, y: f32, layout: &LayoutEngine) {
        self.scroll_x = x;
        self.scroll_y = y;
        self.clamp_scroll(layout);
    }

    /// Resize the viewport
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    fn effective_scale(&self) -> f32 {
        if self.scale > 0.0 {
            self.scale
        } else {
            1.0
        }
    }
}

/// Find column at x position (binary search over column edges).
fn col_at_x(col_positions: &[f32], x: f32) -> Option<usize> {
    let columns = col_positions.len().checked_sub(1)?;
    if columns == 0 {
        return None;
    }
    let idx = match col_positions
        .binary_search_by(|pos| pos.partial_cmp(&x).unwrap_or(std::cmp::Ordering::Equal))
    {
        Ok(i) => i,
        Err(i) => i.saturating_sub(1),
    };
    Some(idx.min(columns - 1))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;

    #[test]
    fn col_at_x_finds_column() {
        let positions = [0.0, 50.0, 100.0, 150.0];
        assert_eq!(col_at_x(&positions, 0.0), Some(0));
        assert_eq!(col_at_x(&positions, 49.0), Some(0));
        assert_eq!(col_at_x(&positions, 50.0), Some(1));
        assert_eq!(col_at_x(&positions, 500.0), Some(2));
        assert_eq!(col_at_x(&[0.0], 10.0), None);
    }

    #[test]
    fn screen_round_trip() {
        let mut viewport = Viewport::new(200.0, 100.0);
        viewport.scroll_x = 30.0;
        viewport.scroll_y = 10.0;
        viewport.scale = 2.0;
        let screen = viewport.to_screen(Point::new(40.0, 20.0));
        assert_eq!(screen, Point::new(20.0, 20.0));
        assert_eq!(viewport.to_table(screen), Point::new(40.0, 20.0));
    }

    #[test]
    fn unlaid_table_clamps_to_origin() {
        let layout = LayoutEngine::new();
        let mut viewport = Viewport::new(200.0, 100.0);
        viewport.scroll_by(50.0, 50.0, &layout);
        assert_eq!((viewport.scroll_x, viewport.scroll_y), (0.0, 0.0));
    }
}
