//! Two-pass table layout with a dirty-flag cache.
//!
//! Pass 1 resolves every row's height, pass 2 accumulates row/column
//! positions and writes cell bounds. Results are cached until a mutation
//! marks the engine dirty.

use super::visible;
use super::CoveredCellIndex;
use crate::measure::ContentMeasurer;
use crate::types::{CellAddress, Column, Rect, Row};

/// Cached layout results for a table
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    dirty: bool,
    /// Calculated height of each row
    row_heights: Vec<f32>,
    /// `row_positions[i]` = y of row i's top edge
    row_positions: Vec<f32>,
    /// `col_positions[i]` = x of column i's left edge, plus the final edge
    col_positions: Vec<f32>,
    width: f32,
    height: f32,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutEngine {
    /// A new engine starts dirty; nothing is cached until the first layout.
    pub fn new() -> Self {
        Self {
            dirty: true,
            row_heights: Vec::new(),
            row_positions: Vec::new(),
            col_positions: Vec::new(),
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// True when cached heights/positions may be read for a grid of `row_count` rows.
    pub fn is_fresh(&self, row_count: usize) -> bool {
        !self.dirty && self.row_heights.len() == row_count
    }

    /// Recompute layout unless the cache is fresh. Returns `true` if a
    /// recomputation happened.
    ///
    /// A cell spanning several rows is measured against its own columns'
    /// width and its height counts toward its origin row only; the height is
    /// not distributed across the spanned rows. When the origin row has an
    /// explicit height the spanning content can therefore be clipped.
    pub fn calculate(
        &mut self,
        columns: &[Column],
        rows: &mut [Row],
        covered: &CoveredCellIndex,
        measurer: &dyn ContentMeasurer,
        force: bool,
    ) -> bool {
        if !force && self.is_fresh(rows.len()) {
            tracing::trace!("layout cache hit");
            return false;
        }

        let _span = tracing::debug_span!(
            "calculate_layout",
            rows = rows.len(),
            cols = columns.len(),
            force
        )
        .entered();

        self.col_positions = Vec::with_capacity(columns.len() + 1);
        let mut x: f32 = 0.0;
        for column in columns {
            self.col_positions.push(x);
            x += column.width;
        }
        self.col_positions.push(x);

        // Pass 1: row heights
        self.row_heights.clear();
        for (row_idx, row) in rows.iter_mut().enumerate() {
            let height = if let Some(explicit) = row.explicit_height {
                explicit.max(row.min_height)
            } else {
                let mut content_max: f32 = 0.0;
                for (col_idx, cell) in row.cells.iter_mut().enumerate() {
                    if covered.is_covered(CellAddress::new(row_idx, col_idx)) {
                        continue;
                    }
                    if force {
                        cell.invalidate_measure();
                    }
                    let width = span_extent(&self.col_positions, col_idx, cell.col_span);
                    content_max = content_max.max(cell.content_height(width, measurer));
                }
                content_max.max(row.min_height)
            };
            row.calculated_height = height;
            self.row_heights.push(height);
        }

        // Pass 2: positions and bounds
        self.row_positions = Vec::with_capacity(rows.len());
        let mut y: f32 = 0.0;
        for height in &self.row_heights {
            self.row_positions.push(y);
            y += height;
        }
        let row_edges: Vec<f32> = self
            .row_positions
            .iter()
            .copied()
            .chain(std::iter::once(y))
            .collect();

        for (row_idx, row) in rows.iter_mut().enumerate() {
            let top = row_edges.get(row_idx).copied().unwrap_or(y);
            for (col_idx, cell) in row.cells.iter_mut().enumerate() {
                if covered.is_covered(CellAddress::new(row_idx, col_idx)) {
                    cell.bounds = None;
                    continue;
                }
                let left = self.col_positions.get(col_idx).copied().unwrap_or(x);
                cell.bounds = Some(Rect::new(
                    left,
                    top,
                    span_extent(&self.col_positions, col_idx, cell.col_span),
                    span_extent(&row_edges, row_idx, cell.row_span),
                ));
            }
        }

        self.width = x;
        self.height = y;
        self.dirty = false;
        tracing::debug!(width = self.width, height = self.height, "layout recomputed");
        true
    }

    pub fn row_heights(&self) -> &[f32] {
        &self.row_heights
    }

    pub fn row_positions(&self) -> &[f32] {
        &self.row_positions
    }

    pub fn col_positions(&self) -> &[f32] {
        &self.col_positions
    }

    pub fn row_height(&self, row: usize) -> Option<f32> {
        self.row_heights.get(row).copied()
    }

    pub fn row_position(&self, row: usize) -> Option<f32> {
        self.row_positions.get(row).copied()
    }

    /// Total width from the last layout
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Total height from the last layout
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Inclusive range of rows intersecting `[y, y + height]`.
    pub fn visible_rows(&self, y: f32, height: f32) -> Option<(usize, usize)> {
        visible::visible_row_range(&self.row_positions, &self.row_heights, y, height)
    }
}

/// Distance covered by `span` tracks starting at `start`, given cumulative
/// edge positions. Spans running past the last edge are cut at it.
fn span_extent(edges: &[f32], start: usize, span: usize) -> f32 {
    let last = edges.len().saturating_sub(1);
    let from = edges.get(start.min(last)).copied().unwrap_or(0.0);
    let to = edges
        .get((start + span.max(1)).min(last))
        .copied()
        .unwrap_or(from);
    to - from
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
    use crate::types::{Cell, CellContent, CellId, ColumnId, RowId};

    /// Content height = 10 per character, regardless of width.
    struct CharHeight;

    impl ContentMeasurer for CharHeight {
        fn content_height(&self, _cell: CellId, content: &CellContent, _width: f32) -> f32 {
            content.text.len() as f32 * 10.0
        }

        fn reflow(&self, _: CellId, content: &CellContent, _: f32, _: f32) -> Vec<String> {
            vec![content.text.clone()]
        }
    }

    fn grid(rows: usize, cols: usize) -> (Vec<Column>, Vec<Row>) {
        let columns = (0..cols)
            .map(|c| Column::new(ColumnId(c as u64), 50.0, 10.0))
            .collect();
        let rows = (0..rows)
            .map(|r| {
                let cells = (0..cols)
                    .map(|c| Cell::new(CellId((r * cols + c) as u64)))
                    .collect();
                Row::new(RowId(r as u64), 20.0, cells)
            })
            .collect();
        (columns, rows)
    }

    #[test]
    fn explicit_height_floored_at_min() {
        let (columns, mut rows) = grid(2, 1);
        rows[0].explicit_height = Some(5.0);
        rows[1].explicit_height = Some(45.0);
        let mut engine = LayoutEngine::new();
        engine.calculate(&columns, &mut rows, &CoveredCellIndex::new(), &CharHeight, false);
        assert_eq!(engine.row_heights(), &[20.0, 45.0]);
        assert_eq!(rows[0].calculated_height, 20.0);
    }

    #[test]
    fn auto_height_is_tallest_cell() {
        let (columns, mut rows) = grid(1, 3);
        rows[0].cells[1].set_content(CellContent::new("abcde"));
        let mut engine = LayoutEngine::new();
        engine.calculate(&columns, &mut rows, &CoveredCellIndex::new(), &CharHeight, false);
        assert_eq!(engine.row_heights(), &[50.0]);
        assert_eq!(engine.height(), 50.0);
        assert_eq!(engine.width(), 150.0);
    }

    #[test]
    fn bounds_cover_spanned_tracks() {
        let (columns, mut rows) = grid(3, 3);
        rows[0].cells[0].row_span = 2;
        rows[0].cells[0].col_span = 2;
        let covered = CoveredCellIndex::build(&rows);
        let mut engine = LayoutEngine::new();
        engine.calculate(&columns, &mut rows, &covered, &CharHeight, false);

        assert_eq!(rows[0].cells[0].bounds, Some(Rect::new(0.0, 0.0, 100.0, 40.0)));
        assert_eq!(rows[1].cells[1].bounds, None);
        assert_eq!(rows[2].cells[2].bounds, Some(Rect::new(100.0, 40.0, 50.0, 20.0)));
    }

    #[test]
    fn cache_skips_recompute_until_dirty() {
        let (columns, mut rows) = grid(2, 2);
        let covered = CoveredCellIndex::new();
        let mut engine = LayoutEngine::new();
        assert!(engine.calculate(&columns, &mut rows, &covered, &CharHeight, false));
        assert!(!engine.calculate(&columns, &mut rows, &covered, &CharHeight, false));
        assert!(engine.calculate(&columns, &mut rows, &covered, &CharHeight, true));

        engine.mark_dirty();
        assert!(!engine.is_fresh(2));
        assert!(engine.calculate(&columns, &mut rows, &covered, &CharHeight, false));
    }

    #[test]
    fn row_count_change_invalidates_cache() {
        let (columns, mut rows) = grid(2, 1);
        let covered = CoveredCellIndex::new();
        let mut engine = LayoutEngine::new();
        engine.calculate(&columns, &mut rows, &covered, &CharHeight, false);
        rows.pop();
        assert!(!engine.is_fresh(rows.len()));
        assert!(engine.calculate(&columns, &mut rows, &covered, &CharHeight, false));
    }

    #[test]
    fn row_spanning_content_counts_toward_origin_row_only() {
        let (columns, mut rows) = grid(2, 1);
        rows[0].cells[0].row_span = 2;
        rows[0].cells[0].set_content(CellContent::new("abcdef"));
        let covered = CoveredCellIndex::build(&rows);
        let mut engine = LayoutEngine::new();
        engine.calculate(&columns, &mut rows, &covered, &CharHeight, false);
        assert_eq!(engine.row_heights(), &[60.0, 20.0]);
    }

    /// Content height = 30 per character.
    struct WideCharHeight;

    impl ContentMeasurer for WideCharHeight {
        fn content_height(&self, _cell: CellId, content: &CellContent, _width: f32) -> f32 {
            content.text.len() as f32 * 30.0
        }

        fn reflow(&self, _: CellId, content: &CellContent, _: f32, _: f32) -> Vec<String> {
            vec![content.text.clone()]
        }
    }

    #[test]
    fn forced_layout_remeasures_at_unchanged_width() {
        let (columns, mut rows) = grid(1, 1);
        rows[0].cells[0].set_content(CellContent::new("abc"));
        let covered = CoveredCellIndex::new();
        let mut engine = LayoutEngine::new();
        engine.calculate(&columns, &mut rows, &covered, &CharHeight, false);
        assert_eq!(engine.height(), 30.0);

        engine.calculate(&columns, &mut rows, &covered, &WideCharHeight, true);
        assert_eq!(engine.height(), 90.0);
        assert_eq!(rows[0].calculated_height, 90.0);
    }
}
