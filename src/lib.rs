//! tablegrid - table layout and span engine
//!
//! A document-editor table core:
//! - Column/row model with merged cell spans and a covered-cell index
//! - Two-pass layout with a dirty-flag cache and binary-search row culling
//! - Merge/split validation
//! - Pagination with repeated header rows
//! - Drag-resize of column and row dividers
//! - Canvas 2D rendering and a WebAssembly binding
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { TableView } from 'tablegrid';
//! await init();
//! const view = new TableView(10, 4);
//! view.merge_range("A1:B2");
//! view.calculate_layout(false);
//! view.render_to_canvas(canvas.getContext("2d"));
//! ```

pub mod cell_ref;
pub mod error;
pub mod events;
pub mod grid;
pub mod layout;
pub mod measure;
pub mod merge;
pub mod pagination;
pub mod render;
pub mod resize;
pub mod table;
pub mod types;
pub mod view;

use wasm_bindgen::prelude::*;

pub use error::{MergeError, OperationResult, Result, TableError};
pub use events::{EventBus, ListenerId, TableEvent};
pub use measure::{ContentMeasurer, MonospaceMeasurer};
pub use resize::{DividerKind, ResizeHandle, ResizeState};
pub use table::Table;
pub use types::*;
pub use view::TableView;

/// Validate a table document and return it normalized (re-serialized)
///
/// # Errors
/// Returns an error if the document is malformed or violates grid invariants.
#[wasm_bindgen]
pub fn normalize_table_json(json: &str) -> std::result::Result<String, JsValue> {
    let table = Table::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    table
        .to_json()
        .map_err(|e| JsValue::from_str(&format!("JSON serialization error: {e}")))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
