//! Common test utilities shared by the integration tests.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]

use std::cell::{Cell as Counter, RefCell};
use std::rc::Rc;

use tablegrid::{CellAddress, CellContent, CellId, ContentMeasurer, Table, TableEvent};

// ============================================================================
// Measurers
// ============================================================================

/// Height of `LINE` per newline-separated line, independent of width.
pub const LINE: f32 = 10.0;

/// Deterministic measurer: one line per `\n`-separated segment.
///
/// Counts `content_height` calls so tests can observe the measure cache.
#[derive(Debug, Default)]
pub struct LineMeasurer {
    pub calls: Counter<usize>,
}

impl LineMeasurer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl ContentMeasurer for LineMeasurer {
    fn content_height(&self, _cell: CellId, content: &CellContent, _width: f32) -> f32 {
        self.calls.set(self.calls.get() + 1);
        if content.is_empty() {
            return 0.0;
        }
        content.text.split('\n').count() as f32 * LINE
    }

    fn reflow(&self, _: CellId, content: &CellContent, _: f32, max_height: f32) -> Vec<String> {
        content
            .text
            .split('\n')
            .filter(|line| !content.is_empty() || !line.is_empty())
            .take((max_height / LINE).max(1.0) as usize)
            .map(str::to_string)
            .collect()
    }

    fn line_height(&self) -> f32 {
        LINE
    }
}

/// `n` lines of text.
pub fn lines(n: usize) -> String {
    (0..n).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n")
}

// ============================================================================
// Builders
// ============================================================================

/// A table whose rows have the given explicit heights (min height 20 still applies).
pub fn table_with_row_heights(heights: &[f32], cols: usize) -> Table {
    let mut table = Table::new(heights.len(), cols);
    for (i, height) in heights.iter().enumerate() {
        table.set_row_height(i, Some(*height));
    }
    table
}

/// A table with text `"r{row}c{col}"` in every cell.
pub fn labelled_table(rows: usize, cols: usize) -> Table {
    let mut table = Table::new(rows, cols);
    for row in 0..rows {
        for col in 0..cols {
            table.set_cell_content(CellAddress::new(row, col), format!("r{row}c{col}"));
        }
    }
    table
}

// ============================================================================
// Events
// ============================================================================

/// Subscribe a recorder and return the shared event log.
pub fn record_events(table: &mut Table) -> Rc<RefCell<Vec<TableEvent>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    table.subscribe(move |event| sink.borrow_mut().push(event.clone()));
    log
}
