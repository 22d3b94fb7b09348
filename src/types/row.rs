use serde::{Deserialize, Serialize};

use super::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(pub u64);

/// Options for a newly inserted row
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RowConfig {
    /// Explicit height (`None` = size to content)
    pub height: Option<f32>,
    /// Minimum height (`None` = table default)
    pub min_height: Option<f32>,
    pub is_header: bool,
}

/// A grid row and the cells it owns (one per column).
#[derive(Debug, Clone)]
pub struct Row {
    pub id: RowId,
    pub explicit_height: Option<f32>,
    pub min_height: f32,
    pub is_header: bool,
    /// Derived; written only by the layout pass.
    pub calculated_height: f32,
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(id: RowId, min_height: f32, cells: Vec<Cell>) -> Self {
        Self {
            id,
            explicit_height: None,
            min_height,
            is_header: false,
            calculated_height: min_height,
            cells,
        }
    }

    pub fn cell(&self, col: usize) -> Option<&Cell> {
        self.cells.get(col)
    }

    pub fn cell_mut(&mut self, col: usize) -> Option<&mut Cell> {
        self.cells.get_mut(col)
    }

    pub fn invalidate_measure(&mut self) {
        for cell in &mut self.cells {
            cell.invalidate_measure();
        }
    }
}
