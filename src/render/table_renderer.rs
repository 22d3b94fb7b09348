//! Paints laid-out cells through a [`Painter`].
//!
//! Covered cells are never painted on their own; their span origin paints the
//! whole merged rectangle. Reads cell bounds and the row cache written by the
//! last layout pass.

use std::collections::HashSet;

use super::Painter;
use crate::grid::Grid;
use crate::layout::{visible, LayoutEngine};
use crate::measure::ContentMeasurer;
use crate::types::{
    Cell, CellAddress, Point, Rect, TablePageLayout, TablePageSlice, TableStyle, VerticalAlign,
};

/// Borrowed view of everything needed to paint a table
pub struct TableRenderer<'a> {
    grid: &'a Grid,
    row_positions: &'a [f32],
    row_heights: &'a [f32],
    style: &'a TableStyle,
    measurer: &'a dyn ContentMeasurer,
}

impl<'a> TableRenderer<'a> {
    pub fn new(
        grid: &'a Grid,
        layout: &'a LayoutEngine,
        style: &'a TableStyle,
        measurer: &'a dyn ContentMeasurer,
    ) -> Self {
        Self {
            grid,
            row_positions: layout.row_positions(),
            row_heights: layout.row_heights(),
            style,
            measurer,
        }
    }

    /// Paint every cell intersecting `clip` (table coordinates). Rows outside
    /// the clip band are culled by binary search. Returns the number of cells
    /// painted.
    pub fn render_region(&self, painter: &mut dyn Painter, clip: Rect) -> usize {
        let _span = tracing::debug_span!("render_region", y = clip.y, height = clip.height).entered();

        let Some((first, last)) =
            visible::visible_row_range(self.row_positions, self.row_heights, clip.y, clip.height)
        else {
            return 0;
        };

        let mut painted = 0;
        let mut painted_origins: HashSet<CellAddress> = HashSet::new();
        for row_idx in first..=last {
            let Some(row) = self.grid.row(row_idx) else {
                continue;
            };
            for (col_idx, cell) in row.cells.iter().enumerate() {
                let address = CellAddress::new(row_idx, col_idx);
                let (address, cell) = match self.grid.covered().origin_of(address) {
                    // Spans starting above the band still reach into it
                    Some(origin) if origin.row < first => match self.grid.cell(origin) {
                        Some(origin_cell) => (origin, origin_cell),
                        None => continue,
                    },
                    Some(_) => continue,
                    None => (address, cell),
                };
                if !painted_origins.insert(address) {
                    continue;
                }
                let Some(bounds) = cell.bounds else {
                    continue;
                };
                if !bounds.intersects(&clip) {
                    continue;
                }
                self.paint_cell(painter, cell, self.is_header(address.row), bounds);
                painted += 1;
            }
        }
        painted
    }

    /// Paint one page slice with its top-left corner at `origin`.
    ///
    /// Continuation slices first repaint every header row, then the slice's
    /// own rows minus the headers. Returns the number of cells painted.
    pub fn render_slice(
        &self,
        painter: &mut dyn Painter,
        slice: &TablePageSlice,
        page_layout: &TablePageLayout,
        origin: Point,
    ) -> usize {
        let _span = tracing::debug_span!(
            "render_slice",
            start = slice.start_row,
            end = slice.end_row,
            continuation = slice.is_continuation
        )
        .entered();

        let mut painted = 0;
        let mut y = origin.y;
        if slice.is_continuation {
            for &row_idx in &page_layout.header_row_indices {
                painted += self.paint_row(painter, row_idx, origin.x, y);
                y += self.row_height(row_idx);
            }
        }
        for row_idx in slice.start_row..slice.end_row {
            if slice.is_continuation && self.is_header(row_idx) {
                continue;
            }
            painted += self.paint_row(painter, row_idx, origin.x, y);
            y += self.row_height(row_idx);
        }
        painted
    }

    fn paint_row(&self, painter: &mut dyn Painter, row_idx: usize, x: f32, y: f32) -> usize {
        let Some(row) = self.grid.row(row_idx) else {
            return 0;
        };
        let mut painted = 0;
        for (col_idx, cell) in row.cells.iter().enumerate() {
            if self.grid.covered().is_covered(CellAddress::new(row_idx, col_idx)) {
                continue;
            }
            let Some(bounds) = cell.bounds else {
                continue;
            };
            let rect = Rect::new(x + bounds.x, y, bounds.width, bounds.height);
            self.paint_cell(painter, cell, row.is_header, rect);
            painted += 1;
        }
        painted
    }

    fn paint_cell(&self, painter: &mut dyn Painter, cell: &Cell, is_header: bool, rect: Rect) {
        let style = self.style.resolve(&cell.style, is_header);
        if let Some(background) = style.background {
            painter.fill_rect(rect, background);
        }

        let lines = self
            .measurer
            .reflow(cell.id, cell.content(), rect.width, rect.height);
        if !lines.is_empty() {
            let inner = rect.inset(style.padding);
            let line_height = self.measurer.line_height();
            let block = lines.len() as f32 * line_height;
            let free = (inner.height - block).max(0.0);
            let top = match style.vertical_align {
                VerticalAlign::Top => inner.y,
                VerticalAlign::Middle => inner.y + free / 2.0,
                VerticalAlign::Bottom => inner.y + free,
            };
            let mut line_y = top;
            for line in &lines {
                painter.draw_text(inner.x, line_y, line, style.text_color);
                line_y += line_height;
            }
        }

        if style.border_width > 0.0 {
            painter.stroke_rect(rect, style.border_color, style.border_width);
        }
    }

    fn is_header(&self, row_idx: usize) -> bool {
        self.grid.row(row_idx).is_some_and(|row| row.is_header)
    }

    fn row_height(&self, row_idx: usize) -> f32 {
        self.row_heights
            .get(row_idx)
            .copied()
            .or_else(|| self.grid.row(row_idx).map(|row| row.calculated_height))
            .unwrap_or(0.0)
    }
}
