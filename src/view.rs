//! WebAssembly entry point.
//!
//! `TableView` wraps a [`Table`] with a measurer and a viewport and exposes
//! the structural, merge, layout, pagination, resize and selection API to
//! JavaScript. Table events are forwarded to an optional JS callback as plain
//! objects (`{ type: "row-inserted", index: 0 }`).

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Function;
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use web_sys::CanvasRenderingContext2d;

use crate::cell_ref::parse_cell_range;
use crate::layout::Viewport;
use crate::measure::MonospaceMeasurer;
#[cfg(target_arch = "wasm32")]
use crate::render::CanvasPainter;
use crate::table::Table;
use crate::types::{CellAddress, CellRange, Point, RowConfig};

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

fn address_vec(address: CellAddress) -> Vec<usize> {
    vec![address.row, address.col]
}

fn range_vec(range: CellRange) -> Vec<usize> {
    vec![range.start.row, range.start.col, range.end.row, range.end.col]
}

/// A table grid driven from JavaScript
#[wasm_bindgen]
pub struct TableView {
    table: Table,
    measurer: MonospaceMeasurer,
    viewport: Viewport,
    event_callback: Rc<RefCell<Option<Function>>>,
}

impl TableView {
    fn wrap(mut table: Table) -> Self {
        let event_callback: Rc<RefCell<Option<Function>>> = Rc::new(RefCell::new(None));
        let callback = Rc::clone(&event_callback);
        table.subscribe(move |event| {
            let Some(callback) = callback.borrow().clone() else {
                return;
            };
            match serde_wasm_bindgen::to_value(event) {
                Ok(value) => {
                    if callback.call1(&JsValue::NULL, &value).is_err() {
                        tracing::warn!(?event, "event callback threw");
                    }
                }
                Err(e) => tracing::warn!(error = %e, "failed to serialize table event"),
            }
        });
        Self {
            table,
            measurer: MonospaceMeasurer::default(),
            viewport: Viewport::default(),
            event_callback,
        }
    }

    /// Borrow the wrapped table.
    pub fn table(&self) -> &Table {
        &self.table
    }
}

#[wasm_bindgen]
impl TableView {
    /// Create an empty `rows` x `cols` table
    #[wasm_bindgen(constructor)]
    pub fn new(rows: usize, cols: usize) -> TableView {
        console_error_panic_hook::set_once();
        Self::wrap(Table::new(rows, cols))
    }

    /// Load a persisted table document
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed or violates grid invariants.
    #[wasm_bindgen(js_name = "fromJson")]
    pub fn from_json(json: &str) -> Result<TableView, JsValue> {
        console_error_panic_hook::set_once();
        let table = Table::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self::wrap(table))
    }

    /// Serialize the table to a JSON document
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    #[wasm_bindgen(js_name = "toJson")]
    pub fn to_json(&self) -> Result<String, JsValue> {
        self.table
            .to_json()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Register a JS callback receiving every table event, or clear it with `undefined`.
    pub fn set_event_callback(&mut self, callback: Option<Function>) {
        *self.event_callback.borrow_mut() = callback;
    }

    pub fn row_count(&self) -> usize {
        self.table.row_count()
    }

    pub fn column_count(&self) -> usize {
        self.table.column_count()
    }

    // Structure

    pub fn insert_row(&mut self, index: usize, is_header: bool) -> usize {
        self.table.insert_row(
            index,
            Some(RowConfig {
                is_header,
                ..RowConfig::default()
            }),
        )
    }

    pub fn remove_row(&mut self, index: usize) -> Option<usize> {
        self.table.remove_row(index)
    }

    pub fn insert_column(&mut self, index: usize, width: Option<f32>) -> usize {
        self.table.insert_column(index, width)
    }

    pub fn remove_column(&mut self, index: usize) -> Option<usize> {
        self.table.remove_column(index)
    }

    pub fn set_column_width(&mut self, index: usize, width: f32) -> Option<f32> {
        self.table.set_column_width(index, width)
    }

    /// Fix a row's height; pass `undefined` to size it to content
    pub fn set_row_height(&mut self, index: usize, height: Option<f32>) -> bool {
        self.table.set_row_height(index, height)
    }

    pub fn set_header_row(&mut self, index: usize, is_header: bool) -> bool {
        self.table.set_header_row(index, is_header)
    }

    pub fn set_cell_text(&mut self, row: usize, col: usize, text: &str) -> bool {
        self.table
            .set_cell_content(CellAddress::new(row, col), text)
            .is_some()
    }

    pub fn cell_text(&self, row: usize, col: usize) -> Option<String> {
        self.table
            .resolve_cell(row, col)
            .map(|resolved| resolved.cell.content().text.clone())
    }

    // Merge & split

    /// Check a merge; returns `{ success, error? }`
    ///
    /// # Errors
    /// Returns an error if the result cannot be converted to a JS value.
    pub fn can_merge(
        &self,
        start_row: usize,
        start_col: usize,
        end_row: usize,
        end_col: usize,
    ) -> Result<JsValue, JsValue> {
        let range = CellRange::from_coords(start_row, start_col, end_row, end_col);
        to_js(&self.table.can_merge(range))
    }

    /// Merge a range; returns `{ success, error? }`
    ///
    /// # Errors
    /// Returns an error if the result cannot be converted to a JS value.
    pub fn merge_cells(
        &mut self,
        start_row: usize,
        start_col: usize,
        end_row: usize,
        end_col: usize,
    ) -> Result<JsValue, JsValue> {
        let range = CellRange::from_coords(start_row, start_col, end_row, end_col);
        to_js(&self.table.merge_cells(range))
    }

    /// Merge an A1-style range such as `"A1:B2"`
    ///
    /// # Errors
    /// Returns an error if the reference is malformed.
    pub fn merge_range(&mut self, range: &str) -> Result<JsValue, JsValue> {
        let range = parse_cell_range(range).map_err(|e| JsValue::from_str(&e.to_string()))?;
        to_js(&self.table.merge_cells(range))
    }

    /// # Errors
    /// Returns an error if the result cannot be converted to a JS value.
    pub fn can_split(&self, row: usize, col: usize) -> Result<JsValue, JsValue> {
        to_js(&self.table.can_split(CellAddress::new(row, col)))
    }

    /// # Errors
    /// Returns an error if the result cannot be converted to a JS value.
    pub fn split_cell(&mut self, row: usize, col: usize) -> Result<JsValue, JsValue> {
        to_js(&self.table.split_cell(CellAddress::new(row, col)))
    }

    // Layout & pagination

    /// Lay the table out; returns true if anything was recomputed
    pub fn calculate_layout(&mut self, force: bool) -> bool {
        let recomputed = self.table.calculate_layout(&self.measurer, force);
        self.viewport.clamp_scroll(self.table.layout());
        recomputed
    }

    pub fn is_layout_dirty(&self) -> bool {
        self.table.is_layout_dirty()
    }

    pub fn content_width(&self) -> f32 {
        self.table.width()
    }

    pub fn content_height(&self) -> f32 {
        self.table.height()
    }

    /// Calculated row heights from the last layout
    pub fn row_heights(&self) -> Vec<f32> {
        self.table.layout().row_heights().to_vec()
    }

    /// Plan page slices; returns `{ slices, totalHeight, headerHeight, headerRowIndices }`
    ///
    /// # Errors
    /// Returns an error if the result cannot be converted to a JS value.
    pub fn page_layout(&mut self, first_page: f32, other_pages: f32) -> Result<JsValue, JsValue> {
        to_js(
            &self
                .table
                .calculate_page_layout(&self.measurer, first_page, other_pages),
        )
    }

    /// Cell under a screen point as `[row, col]`
    pub fn cell_at(&self, x: f32, y: f32) -> Option<Vec<usize>> {
        let point = self.viewport.to_table(Point::new(x, y));
        self.table.get_cell_at_point(point).map(address_vec)
    }

    // Viewport

    pub fn set_viewport_size(&mut self, width: f32, height: f32) {
        self.viewport.resize(width, height);
        self.viewport.clamp_scroll(self.table.layout());
    }

    pub fn scroll(&mut self, delta_x: f32, delta_y: f32) {
        self.viewport
            .scroll_by(delta_x, delta_y, self.table.layout());
    }

    /// Visible rows as `[first, last]` (inclusive)
    pub fn visible_rows(&self) -> Option<Vec<usize>> {
        self.viewport
            .visible_rows(self.table.layout())
            .map(|(first, last)| vec![first, last])
    }

    // Resize

    /// Divider under a screen point as `{ kind, index }`, or `null`
    ///
    /// # Errors
    /// Returns an error if the result cannot be converted to a JS value.
    pub fn detect_handle(&self, x: f32, y: f32) -> Result<JsValue, JsValue> {
        let point = self.viewport.to_table(Point::new(x, y));
        match self.table.detect_handle(point) {
            Some(handle) => to_js(&handle),
            None => Ok(JsValue::NULL),
        }
    }

    /// Start dragging the divider under a screen point
    pub fn start_resize(&mut self, x: f32, y: f32) -> bool {
        let point = self.viewport.to_table(Point::new(x, y));
        match self.table.detect_handle(point) {
            Some(handle) => self.table.start_resize(handle, point),
            None => false,
        }
    }

    pub fn update_resize(&mut self, x: f32, y: f32) -> bool {
        let point = self.viewport.to_table(Point::new(x, y));
        self.table.update_resize(point).is_some()
    }

    pub fn end_resize(&mut self) -> bool {
        self.table.end_resize().is_some()
    }

    pub fn cancel_resize(&mut self) -> bool {
        self.table.cancel_resize().is_some()
    }

    // Selection

    /// Select a range; returns the stored range as `[startRow, startCol, endRow, endCol]`
    pub fn select_range(
        &mut self,
        start_row: usize,
        start_col: usize,
        end_row: usize,
        end_col: usize,
    ) -> Vec<usize> {
        let range = CellRange::from_coords(start_row, start_col, end_row, end_col);
        range_vec(self.table.select_range(range))
    }

    pub fn clear_selection(&mut self) {
        self.table.clear_selection();
    }

    pub fn get_selection(&self) -> Option<Vec<usize>> {
        self.table.selection().map(range_vec)
    }

    /// Focus a cell; returns the focused origin as `[row, col]`
    pub fn set_focus(&mut self, row: usize, col: usize) -> Option<Vec<usize>> {
        self.table
            .set_focus(Some(CellAddress::new(row, col)))
            .map(address_vec)
    }

    pub fn clear_focus(&mut self) {
        self.table.set_focus(None);
    }

    /// Paint the visible part of the table; returns the number of cells painted
    #[cfg(target_arch = "wasm32")]
    pub fn render_to_canvas(&mut self, ctx: CanvasRenderingContext2d) -> usize {
        let mut painter = CanvasPainter::new(ctx);
        painter.set_offset(-self.viewport.scroll_x, -self.viewport.scroll_y);
        let clip = self.viewport.clip_rect();
        self.table.render(&mut painter, &self.measurer, clip)
    }
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
    fn structural_calls_reach_the_table() {
        let mut view = TableView::new(2, 2);
        assert_eq!(view.insert_row(5, true), 2);
        assert_eq!(view.insert_column(0, Some(40.0)), 0);
        assert_eq!((view.row_count(), view.column_count()), (3, 3));
        assert!(view.table().grid().row(2).unwrap().is_header);

        assert!(view.set_cell_text(1, 1, "x"));
        assert_eq!(view.cell_text(1, 1).as_deref(), Some("x"));
        assert!(view.calculate_layout(false));
        assert_eq!(view.content_width(), 240.0);
    }

    #[test]
    fn selection_round_trips_as_vectors() {
        let mut view = TableView::new(3, 3);
        assert_eq!(view.select_range(2, 2, 0, 1), vec![0, 1, 2, 2]);
        assert_eq!(view.get_selection(), Some(vec![0, 1, 2, 2]));
        view.clear_selection();
        assert_eq!(view.get_selection(), None);
        assert_eq!(view.set_focus(1, 1), Some(vec![1, 1]));
    }

    #[test]
    fn json_round_trip() {
        let view = TableView::new(2, 3);
        let json = view.to_json().unwrap();
        let restored = TableView::from_json(&json).ok().unwrap();
        assert_eq!(restored.column_count(), 3);
    }
}
