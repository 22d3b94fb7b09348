use serde::{Deserialize, Serialize};

use super::TableStyle;

/// Default column width (in table units, e.g. CSS pixels)
pub const DEFAULT_COL_WIDTH: f32 = 100.0;

/// Default minimum column width
pub const DEFAULT_MIN_COL_WIDTH: f32 = 20.0;

/// Default minimum row height
pub const DEFAULT_MIN_ROW_HEIGHT: f32 = 20.0;

/// Hit-test tolerance for resize dividers, in pixels
pub const RESIZE_HANDLE_TOLERANCE: f32 = 4.0;

/// Table-wide configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableConfig {
    pub default_column_width: f32,
    pub default_min_column_width: f32,
    pub default_min_row_height: f32,
    pub resize_tolerance: f32,
    pub style: TableStyle,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            default_column_width: DEFAULT_COL_WIDTH,
            default_min_column_width: DEFAULT_MIN_COL_WIDTH,
            default_min_row_height: DEFAULT_MIN_ROW_HEIGHT,
            resize_tolerance: RESIZE_HANDLE_TOLERANCE,
            style: TableStyle::default(),
        }
    }
}
