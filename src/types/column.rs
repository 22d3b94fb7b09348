use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(pub u64);

/// A grid column. Widths are explicit and never below `min_width`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: ColumnId,
    pub width: f32,
    pub min_width: f32,
}

impl Column {
    pub fn new(id: ColumnId, width: f32, min_width: f32) -> Self {
        Self {
            id,
            width: width.max(min_width),
            min_width,
        }
    }

    /// Set the width, clamped to `min_width`. Returns the applied width.
    pub fn set_width(&mut self, width: f32) -> f32 {
        self.width = width.max(self.min_width);
        self.width
    }
}
