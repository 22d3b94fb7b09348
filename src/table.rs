//! The table facade.
//!
//! [`Table`] ties the grid model, layout cache, resize controller, selection
//! and event bus together. Every mutation that can change row heights,
//! column widths, spans or dimensions marks the layout dirty before it
//! returns, so no caller can observe stale cached positions through this API.

use std::collections::HashSet;

use crate::error::{OperationResult, Result, TableError};
use crate::events::{EventBus, ListenerId, TableEvent};
use crate::grid::{Grid, GridDefaults, ResolvedCell};
use crate::layout::LayoutEngine;
use crate::measure::ContentMeasurer;
use crate::merge;
use crate::pagination;
use crate::render::{Painter, TableRenderer};
use crate::resize::{DividerKind, ResizeController, ResizeHandle, ResizeState, ResizeTarget};
use crate::types::{
    Cell, CellAddress, CellContent, CellData, CellRange, CellStyle, Point, Rect, Row, RowConfig,
    RowData, TableConfig, TableDocument, TablePageLayout, TablePageSlice,
};

/// A table grid with layout, pagination, merge and resize support
#[derive(Debug)]
pub struct Table {
    grid: Grid,
    layout: LayoutEngine,
    config: TableConfig,
    resize: ResizeController,
    events: EventBus,
    selection: Option<CellRange>,
    focus: Option<CellAddress>,
}

impl Table {
    /// Create a `rows` x `cols` table with default configuration.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::with_config(rows, cols, TableConfig::default())
    }

    pub fn with_config(rows: usize, cols: usize, config: TableConfig) -> Self {
        let grid = Grid::new(rows, cols, GridDefaults::from(&config));
        Self::from_grid(grid, config)
    }

    fn from_grid(grid: Grid, config: TableConfig) -> Self {
        Self {
            grid,
            layout: LayoutEngine::new(),
            resize: ResizeController::new(config.resize_tolerance),
            config,
            events: EventBus::new(),
            selection: None,
            focus: None,
        }
    }

    // ---- model access ----

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn row_count(&self) -> usize {
        self.grid.row_count()
    }

    pub fn column_count(&self) -> usize {
        self.grid.column_count()
    }

    /// The cell stored at `address`, without span resolution.
    pub fn cell(&self, address: CellAddress) -> Option<&Cell> {
        self.grid.cell(address)
    }

    /// Resolve `(row, col)` to the cell that owns it.
    pub fn resolve_cell(&self, row: usize, col: usize) -> Option<ResolvedCell<'_>> {
        self.grid.resolve_cell(row, col)
    }

    /// Cell under a point in table coordinates, resolved to its span origin.
    pub fn get_cell_at_point(&self, point: Point) -> Option<CellAddress> {
        self.grid.cell_at_point(point)
    }

    // ---- events ----

    pub fn subscribe(&mut self, listener: impl FnMut(&TableEvent) + 'static) -> ListenerId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.events.unsubscribe(id)
    }

    fn emit(&mut self, event: TableEvent) {
        self.events.emit(&event);
    }

    // ---- structure ----

    /// Insert a row before `index` (clamped). Returns the index used.
    pub fn insert_row(&mut self, index: usize, config: Option<RowConfig>) -> usize {
        let index = self.grid.insert_row(index, config);
        self.layout.mark_dirty();
        tracing::debug!(index, rows = self.grid.row_count(), "row inserted");
        self.emit(TableEvent::RowInserted { index });
        self.revalidate_selection();
        index
    }

    /// Remove the row at `index` (clamped). No-op returning `None` when only
    /// one row is left.
    pub fn remove_row(&mut self, index: usize) -> Option<usize> {
        let Some(index) = self.grid.remove_row(index) else {
            tracing::debug!(index, "refusing to remove the last row");
            return None;
        };
        self.layout.mark_dirty();
        tracing::debug!(index, rows = self.grid.row_count(), "row removed");
        self.emit(TableEvent::RowRemoved { index });
        self.revalidate_selection();
        Some(index)
    }

    /// Insert a column before `index` (clamped). Returns the index used.
    pub fn insert_column(&mut self, index: usize, width: Option<f32>) -> usize {
        let index = self.grid.insert_column(index, width);
        self.layout.mark_dirty();
        tracing::debug!(index, cols = self.grid.column_count(), "column inserted");
        self.emit(TableEvent::ColumnInserted { index });
        self.revalidate_selection();
        index
    }

    /// Remove the column at `index` (clamped). No-op returning `None` when
    /// only one column is left.
    pub fn remove_column(&mut self, index: usize) -> Option<usize> {
        let Some(index) = self.grid.remove_column(index) else {
            tracing::debug!(index, "refusing to remove the last column");
            return None;
        };
        self.layout.mark_dirty();
        tracing::debug!(index, cols = self.grid.column_count(), "column removed");
        self.emit(TableEvent::ColumnRemoved { index });
        self.revalidate_selection();
        Some(index)
    }

    /// Set a column's width, clamped to its minimum. Returns the applied width.
    pub fn set_column_width(&mut self, index: usize, width: f32) -> Option<f32> {
        let applied = self.grid.set_column_width(index, width)?;
        self.layout.mark_dirty();
        self.emit(TableEvent::ColumnWidthChanged {
            index,
            width: applied,
        });
        Some(applied)
    }

    /// Fix a row's height, or return it to content sizing with `None`.
    pub fn set_row_height(&mut self, index: usize, height: Option<f32>) -> bool {
        let Some(row) = self.grid.row_mut(index) else {
            return false;
        };
        row.explicit_height = height;
        self.layout.mark_dirty();
        self.emit(TableEvent::RowHeightChanged { index, height });
        true
    }

    pub fn set_row_min_height(&mut self, index: usize, min_height: f32) -> bool {
        let Some(row) = self.grid.row_mut(index) else {
            return false;
        };
        row.min_height = min_height.max(0.0);
        let height = row.explicit_height;
        self.layout.mark_dirty();
        self.emit(TableEvent::RowHeightChanged { index, height });
        true
    }

    /// Mark a row as a header row (repeated at the top of continuation pages).
    pub fn set_header_row(&mut self, index: usize, is_header: bool) -> bool {
        let Some(row) = self.grid.row_mut(index) else {
            return false;
        };
        if row.is_header == is_header {
            return true;
        }
        row.is_header = is_header;
        self.layout.mark_dirty();
        self.emit(TableEvent::RowHeaderChanged { index, is_header });
        true
    }

    // ---- content & style ----

    /// Replace the content of the cell owning `address`. Returns the address
    /// actually written (the span origin for covered addresses).
    pub fn set_cell_content(
        &mut self,
        address: CellAddress,
        content: impl Into<CellContent>,
    ) -> Option<CellAddress> {
        let origin = self.grid.resolve_cell(address.row, address.col)?.address;
        self.grid.cell_mut(origin)?.set_content(content.into());
        self.layout.mark_dirty();
        self.emit(TableEvent::ContentChanged { address: origin });
        Some(origin)
    }

    /// Replace the style of the cell owning `address`.
    pub fn set_cell_style(&mut self, address: CellAddress, style: CellStyle) -> Option<CellAddress> {
        let origin = self.grid.resolve_cell(address.row, address.col)?.address;
        self.grid.cell_mut(origin)?.style = style;
        self.emit(TableEvent::StyleChanged { address: origin });
        Some(origin)
    }

    // ---- merge & split ----

    pub fn can_merge(&self, range: CellRange) -> OperationResult {
        merge::can_merge(&self.grid, range).into()
    }

    /// Merge `range` into its top-left cell. Content of every other cell in
    /// the range is discarded.
    pub fn merge_cells(&mut self, range: CellRange) -> OperationResult {
        match merge::merge_cells(&mut self.grid, range) {
            Ok(range) => {
                self.layout.mark_dirty();
                self.emit(TableEvent::CellsMerged { range });
                self.revalidate_selection();
                OperationResult::ok()
            }
            Err(error) => {
                tracing::debug!(?range, %error, "merge refused");
                OperationResult::err(error)
            }
        }
    }

    pub fn can_split(&self, address: CellAddress) -> OperationResult {
        merge::can_split(&self.grid, address).into()
    }

    pub fn split_cell(&mut self, address: CellAddress) -> OperationResult {
        match merge::split_cell(&mut self.grid, address) {
            Ok(range) => {
                self.layout.mark_dirty();
                self.emit(TableEvent::CellSplit { range });
                self.revalidate_selection();
                OperationResult::ok()
            }
            Err(error) => {
                tracing::debug!(row = address.row, col = address.col, %error, "split refused");
                OperationResult::err(error)
            }
        }
    }

    // ---- layout ----

    /// Run the two-pass layout unless the cache is fresh. Returns `true` and
    /// emits [`TableEvent::LayoutChanged`] when a recomputation happened.
    pub fn calculate_layout(&mut self, measurer: &dyn ContentMeasurer, force: bool) -> bool {
        let (columns, rows, covered) = self.grid.layout_parts();
        let recomputed = self
            .layout
            .calculate(columns, rows, covered, measurer, force);
        if recomputed {
            let (width, height) = (self.layout.width(), self.layout.height());
            self.emit(TableEvent::LayoutChanged { width, height });
        }
        recomputed
    }

    pub fn is_layout_dirty(&self) -> bool {
        !self.layout.is_fresh(self.grid.row_count())
    }

    pub fn layout(&self) -> &LayoutEngine {
        &self.layout
    }

    /// Table width from the last layout.
    pub fn width(&self) -> f32 {
        self.layout.width()
    }

    /// Table height from the last layout.
    pub fn height(&self) -> f32 {
        self.layout.height()
    }

    /// Bounds of the cell owning `address`, from the last layout.
    pub fn cell_bounds(&self, address: CellAddress) -> Option<Rect> {
        self.grid.resolve_cell(address.row, address.col)?.cell.bounds
    }

    /// Inclusive range of rows intersecting `[y, y + height]`. Only
    /// meaningful while the layout is fresh.
    pub fn visible_rows(&self, y: f32, height: f32) -> Option<(usize, usize)> {
        if self.is_layout_dirty() {
            tracing::warn!("visible_rows queried on a stale layout");
        }
        self.layout.visible_rows(y, height)
    }

    /// Plan page slices from the rows' calculated heights, laying the table
    /// out first if needed.
    pub fn calculate_page_layout(
        &mut self,
        measurer: &dyn ContentMeasurer,
        available_height_first_page: f32,
        available_height_other_pages: f32,
    ) -> TablePageLayout {
        self.calculate_layout(measurer, false);
        let rows = self.grid.rows();
        let heights: Vec<f32> = rows.iter().map(|r| r.calculated_height).collect();
        let headers: Vec<bool> = rows.iter().map(|r| r.is_header).collect();
        pagination::calculate_page_layout(
            &heights,
            &headers,
            available_height_first_page,
            available_height_other_pages,
        )
    }

    // ---- rendering ----

    /// Paint every cell intersecting `clip` (table coordinates), laying the
    /// table out first if needed. Returns the number of cells painted.
    pub fn render(
        &mut self,
        painter: &mut dyn Painter,
        measurer: &dyn ContentMeasurer,
        clip: Rect,
    ) -> usize {
        self.calculate_layout(measurer, false);
        TableRenderer::new(&self.grid, &self.layout, &self.config.style, measurer)
            .render_region(painter, clip)
    }

    /// Paint one page slice at `origin`, repeating header rows on
    /// continuation slices.
    pub fn render_slice(
        &mut self,
        painter: &mut dyn Painter,
        measurer: &dyn ContentMeasurer,
        slice: &TablePageSlice,
        page_layout: &TablePageLayout,
        origin: Point,
    ) -> usize {
        self.calculate_layout(measurer, false);
        TableRenderer::new(&self.grid, &self.layout, &self.config.style, measurer)
            .render_slice(painter, slice, page_layout, origin)
    }

    // ---- resize ----

    /// Hit-test column and row dividers at `point` (table coordinates).
    pub fn detect_handle(&self, point: Point) -> Option<ResizeHandle> {
        let col_edges = edges(self.grid.columns().iter().map(|c| c.width));
        let row_edges = edges(self.grid.rows().iter().map(|r| r.calculated_height));
        self.resize.detect_handle(point, &col_edges, &row_edges)
    }

    pub fn start_resize(&mut self, handle: ResizeHandle, point: Point) -> bool {
        if !self.resize.start_resize(&self.grid, handle, point) {
            return false;
        }
        self.emit(TableEvent::ResizeStarted { handle });
        true
    }

    /// Apply a drag position. Returns the new `(size, neighbor size)`.
    pub fn update_resize(&mut self, point: Point) -> Option<(f32, Option<f32>)> {
        let handle = self.active_handle()?;
        let (size, neighbor) = self.resize.update_resize(&mut self.grid, point)?;
        self.layout.mark_dirty();
        self.emit_track_size(handle.kind, handle.index);
        if neighbor.is_some() {
            self.emit_track_size(handle.kind, handle.index + 1);
        }
        Some((size, neighbor))
    }

    pub fn end_resize(&mut self) -> Option<ResizeHandle> {
        let handle = self.resize.end_resize()?;
        self.emit(TableEvent::ResizeEnded {
            handle,
            committed: true,
        });
        Some(handle)
    }

    /// Abandon the drag and restore both baseline sizes.
    pub fn cancel_resize(&mut self) -> Option<ResizeHandle> {
        let handle = self.resize.cancel_resize(&mut self.grid)?;
        self.layout.mark_dirty();
        self.emit_track_size(handle.kind, handle.index);
        if handle.index + 1 < self.grid.track_count(handle.kind) {
            self.emit_track_size(handle.kind, handle.index + 1);
        }
        self.emit(TableEvent::ResizeEnded {
            handle,
            committed: false,
        });
        Some(handle)
    }

    pub fn resize_state(&self) -> ResizeState {
        self.resize.state()
    }

    fn active_handle(&self) -> Option<ResizeHandle> {
        match self.resize.state() {
            ResizeState::Resizing(info) => Some(info.handle),
            ResizeState::Idle => None,
        }
    }

    fn emit_track_size(&mut self, kind: DividerKind, index: usize) {
        let event = match kind {
            DividerKind::Column => TableEvent::ColumnWidthChanged {
                index,
                width: self.grid.track_size(kind, index),
            },
            DividerKind::Row => TableEvent::RowHeightChanged {
                index,
                height: self.grid.row(index).and_then(|r| r.explicit_height),
            },
        };
        self.emit(event);
    }

    // ---- selection & focus ----

    /// Select `range`, clamped to the grid and grown to include every span
    /// it touches. Returns the stored range.
    pub fn select_range(&mut self, range: CellRange) -> CellRange {
        let range = self.expand_to_spans(self.clamp_range(range));
        self.selection = Some(range);
        self.emit(TableEvent::SelectionChanged { range: Some(range) });
        range
    }

    pub fn clear_selection(&mut self) {
        if self.selection.take().is_some() {
            self.emit(TableEvent::SelectionChanged { range: None });
        }
    }

    pub fn selection(&self) -> Option<CellRange> {
        self.selection
    }

    /// Focus the cell owning `address`. Out-of-range addresses clear focus.
    pub fn set_focus(&mut self, address: Option<CellAddress>) -> Option<CellAddress> {
        let resolved =
            address.and_then(|a| self.grid.resolve_cell(a.row, a.col).map(|r| r.address));
        if resolved != self.focus {
            self.focus = resolved;
            self.emit(TableEvent::FocusChanged { address: resolved });
        }
        resolved
    }

    pub fn focus(&self) -> Option<CellAddress> {
        self.focus
    }

    fn clamp_range(&self, range: CellRange) -> CellRange {
        let last_row = self.grid.row_count().saturating_sub(1);
        let last_col = self.grid.column_count().saturating_sub(1);
        let clamp = |a: CellAddress| CellAddress::new(a.row.min(last_row), a.col.min(last_col));
        CellRange::new(clamp(range.start), clamp(range.end)).normalized()
    }

    /// Grow `range` until no span crosses its border.
    fn expand_to_spans(&self, mut range: CellRange) -> CellRange {
        loop {
            let mut expanded = range;
            for address in range.addresses() {
                let origin = self.grid.covered().origin_of(address).unwrap_or(address);
                if let Some(cell) = self.grid.cell(origin).filter(|c| c.is_spanning()) {
                    expanded =
                        expanded.union(&CellRange::spanning(origin, cell.row_span, cell.col_span));
                }
            }
            if expanded == range {
                return range;
            }
            range = expanded;
        }
    }

    /// Keep selection and focus valid after spans or dimensions changed.
    fn revalidate_selection(&mut self) {
        if let Some(selection) = self.selection {
            let updated = self
                .grid
                .contains(selection.end)
                .then(|| self.expand_to_spans(selection));
            if updated != Some(selection) {
                self.selection = updated;
                self.emit(TableEvent::SelectionChanged { range: updated });
            }
        }
        if let Some(focus) = self.focus {
            let updated = self
                .grid
                .resolve_cell(focus.row, focus.col)
                .map(|r| r.address);
            if updated != Some(focus) {
                self.focus = updated;
                self.emit(TableEvent::FocusChanged { address: updated });
            }
        }
    }

    // ---- persistence ----

    pub fn to_document(&self) -> TableDocument {
        TableDocument {
            columns: self.grid.columns().to_vec(),
            rows: self
                .grid
                .rows()
                .iter()
                .map(|row| RowData {
                    id: row.id,
                    height: row.explicit_height,
                    min_height: row.min_height,
                    is_header: row.is_header,
                    cells: row
                        .cells
                        .iter()
                        .map(|cell| CellData {
                            id: cell.id,
                            row_span: cell.row_span,
                            col_span: cell.col_span,
                            content: cell.content().clone(),
                            style: cell.style.clone(),
                        })
                        .collect(),
                })
                .collect(),
            config: self.config.clone(),
        }
    }

    /// Rebuild a table from a persisted document, validating its shape.
    pub fn from_document(document: TableDocument) -> Result<Self> {
        validate_document(&document)?;

        let TableDocument {
            columns,
            rows,
            config,
        } = document;
        let rows = rows
            .into_iter()
            .map(|data| {
                let cells = data
                    .cells
                    .into_iter()
                    .map(|cell_data| {
                        let mut cell = Cell::new(cell_data.id).with_content(cell_data.content);
                        cell.row_span = cell_data.row_span;
                        cell.col_span = cell_data.col_span;
                        cell.style = cell_data.style;
                        cell
                    })
                    .collect();
                let mut row = Row::new(data.id, data.min_height, cells);
                row.explicit_height = data.height;
                row.is_header = data.is_header;
                row
            })
            .collect();

        let grid = Grid::from_parts(columns, rows, GridDefaults::from(&config));
        tracing::debug!(
            rows = grid.row_count(),
            cols = grid.column_count(),
            spans = grid.covered().len(),
            "table loaded"
        );
        Ok(Self::from_grid(grid, config))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_document())?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let document: TableDocument = serde_json::from_str(json)?;
        Self::from_document(document)
    }
}

/// Cumulative edges of tracks with the given sizes, starting at 0.
fn edges(sizes: impl Iterator<Item = f32>) -> Vec<f32> {
    let mut edges = vec![0.0];
    let mut pos = 0.0;
    for size in sizes {
        pos += size;
        edges.push(pos);
    }
    edges
}

/// Check grid invariants of a persisted document.
fn validate_document(document: &TableDocument) -> Result<()> {
    let invalid = |msg: String| Err(TableError::InvalidDocument(msg));

    let col_count = document.columns.len();
    let row_count = document.rows.len();
    if col_count == 0 || row_count == 0 {
        return invalid(format!("grid must be at least 1x1, got {row_count}x{col_count}"));
    }

    let mut covered: HashSet<CellAddress> = HashSet::new();
    for (row_idx, row) in document.rows.iter().enumerate() {
        if row.cells.len() != col_count {
            return invalid(format!(
                "row {row_idx} has {} cells, expected {col_count}",
                row.cells.len()
            ));
        }
        for (col_idx, cell) in row.cells.iter().enumerate() {
            let address = CellAddress::new(row_idx, col_idx);
            if cell.row_span == 0 || cell.col_span == 0 {
                return invalid(format!("cell {row_idx},{col_idx} has a zero span"));
            }
            let spanning = cell.row_span > 1 || cell.col_span > 1;
            if covered.contains(&address) {
                if spanning {
                    return invalid(format!("span at {row_idx},{col_idx} overlaps another span"));
                }
                continue;
            }
            if !spanning {
                continue;
            }
            if row_idx + cell.row_span > row_count || col_idx + cell.col_span > col_count {
                return invalid(format!("span at {row_idx},{col_idx} runs past the grid"));
            }
            for inner in CellRange::spanning(address, cell.row_span, cell.col_span).addresses() {
                if inner != address && !covered.insert(inner) {
                    return invalid(format!("span at {row_idx},{col_idx} overlaps another span"));
                }
            }
        }
    }
    Ok(())
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
    use crate::measure::MonospaceMeasurer;
    use crate::render::RecordingPainter;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn record(table: &mut Table) -> Rc<RefCell<Vec<TableEvent>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        table.subscribe(move |event| sink.borrow_mut().push(event.clone()));
        log
    }

    #[test]
    fn mutations_mark_layout_dirty() {
        let measurer = MonospaceMeasurer::default();
        let mut table = Table::new(3, 3);
        assert!(table.is_layout_dirty());
        assert!(table.calculate_layout(&measurer, false));
        assert!(!table.is_layout_dirty());

        table.set_column_width(0, 150.0);
        assert!(table.is_layout_dirty());
        table.calculate_layout(&measurer, false);

        table.merge_cells(CellRange::from_coords(0, 0, 1, 1));
        assert!(table.is_layout_dirty());
        table.calculate_layout(&measurer, false);

        table.set_cell_content(CellAddress::new(2, 2), "text");
        assert!(table.is_layout_dirty());
    }

    #[test]
    fn content_on_covered_address_goes_to_origin() {
        let mut table = Table::new(3, 3);
        table.merge_cells(CellRange::from_coords(0, 0, 1, 1));
        let written = table.set_cell_content(CellAddress::new(1, 1), "hello");
        assert_eq!(written, Some(CellAddress::new(0, 0)));
        assert_eq!(table.cell(CellAddress::new(0, 0)).unwrap().content().text, "hello");
        assert!(table.cell(CellAddress::new(1, 1)).unwrap().content().is_empty());
    }

    #[test]
    fn refused_merge_reports_reason_without_events() {
        let mut table = Table::new(2, 2);
        let log = record(&mut table);
        let result = table.merge_cells(CellRange::from_coords(0, 0, 0, 0));
        assert!(!result.success);
        assert_eq!(result.error, Some(crate::error::MergeError::SingleCell));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn selection_expands_to_cover_spans() {
        let mut table = Table::new(4, 4);
        table.merge_cells(CellRange::from_coords(1, 1, 2, 2));
        table.merge_cells(CellRange::from_coords(2, 3, 3, 3));

        // Grows over the first span only; the second starts in column 3
        let selected = table.select_range(CellRange::from_coords(0, 0, 1, 1));
        assert_eq!(selected, CellRange::from_coords(0, 0, 2, 2));

        let selected = table.select_range(CellRange::from_coords(2, 2, 2, 3));
        assert_eq!(selected, CellRange::from_coords(1, 1, 3, 3));
    }

    #[test]
    fn focus_resolves_to_origin() {
        let mut table = Table::new(3, 3);
        table.merge_cells(CellRange::from_coords(0, 0, 1, 1));
        assert_eq!(
            table.set_focus(Some(CellAddress::new(1, 0))),
            Some(CellAddress::new(0, 0))
        );
        assert_eq!(table.set_focus(Some(CellAddress::new(9, 9))), None);
        assert_eq!(table.focus(), None);
    }

    #[test]
    fn removing_rows_clears_stale_selection() {
        let mut table = Table::new(3, 2);
        table.select_range(CellRange::from_coords(2, 0, 2, 1));
        let log = record(&mut table);
        table.remove_row(2);
        assert_eq!(table.selection(), None);
        assert!(log
            .borrow()
            .contains(&TableEvent::SelectionChanged { range: None }));
    }

    #[test]
    fn detect_handle_uses_current_sizes() {
        let mut table = Table::new(2, 2);
        table.calculate_layout(&MonospaceMeasurer::default(), false);
        let handle = table.detect_handle(Point::new(101.0, 5.0)).unwrap();
        assert_eq!(handle.kind, DividerKind::Column);
        assert_eq!(handle.index, 0);
    }

    #[test]
    fn resize_emits_and_dirties() {
        let mut table = Table::new(1, 2);
        table.calculate_layout(&MonospaceMeasurer::default(), false);
        let log = record(&mut table);
        let handle = ResizeHandle {
            kind: DividerKind::Column,
            index: 0,
        };
        assert!(table.start_resize(handle, Point::new(100.0, 5.0)));
        assert_eq!(
            table.update_resize(Point::new(130.0, 5.0)),
            Some((130.0, Some(70.0)))
        );
        assert!(table.is_layout_dirty());
        table.end_resize();

        assert_eq!(
            *log.borrow(),
            vec![
                TableEvent::ResizeStarted { handle },
                TableEvent::ColumnWidthChanged {
                    index: 0,
                    width: 130.0
                },
                TableEvent::ColumnWidthChanged {
                    index: 1,
                    width: 70.0
                },
                TableEvent::ResizeEnded {
                    handle,
                    committed: true
                },
            ]
        );
    }

    #[test]
    fn render_paints_each_span_once() {
        let mut table = Table::new(3, 3);
        table.merge_cells(CellRange::from_coords(0, 0, 1, 1));
        table.set_cell_content(CellAddress::new(0, 0), "merged");
        let mut painter = RecordingPainter::new();
        let painted = table.render(
            &mut painter,
            &MonospaceMeasurer::default(),
            Rect::new(0.0, 0.0, 1000.0, 1000.0),
        );
        // 9 cells minus 3 covered
        assert_eq!(painted, 6);
        assert_eq!(painter.texts(), vec!["merged"]);
    }

    #[test]
    fn validation_rejects_bad_documents() {
        let table = Table::new(2, 2);

        let mut ragged = table.to_document();
        ragged.rows[1].cells.pop();
        assert!(matches!(
            Table::from_document(ragged),
            Err(TableError::InvalidDocument(_))
        ));

        let mut overflowing = table.to_document();
        overflowing.rows[1].cells[1].col_span = 2;
        assert!(Table::from_document(overflowing).is_err());

        let mut overlapping = table.to_document();
        overlapping.rows[0].cells[0].row_span = 2;
        overlapping.rows[1].cells[0].col_span = 2;
        assert!(Table::from_document(overlapping).is_err());

        let mut empty = table.to_document();
        empty.rows.clear();
        assert!(Table::from_document(empty).is_err());
    }
}
