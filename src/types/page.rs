use serde::{Deserialize, Serialize};

/// Rows assigned to one physical page.
///
/// `[start_row, end_row)` is half-open. Header rows inside the range are
/// repainted at the top of continuation pages instead of in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TablePageSlice {
    pub start_row: usize,
    pub end_row: usize,
    pub is_continuation: bool,
    /// Painted height on the page, including repeated headers
    pub height: f32,
    /// Table y of the slice's first row
    pub y_offset: f32,
}

impl TablePageSlice {
    pub fn row_count(&self) -> usize {
        self.end_row.saturating_sub(self.start_row)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TablePageLayout {
    pub slices: Vec<TablePageSlice>,
    pub total_height: f32,
    pub header_height: f32,
    pub header_row_indices: Vec<usize>,
}

impl TablePageLayout {
    pub fn page_count(&self) -> usize {
        self.slices.len()
    }
}
