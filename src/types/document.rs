//! Persisted table shape.
//!
//! ```json
//! {
//!   "columns": [{ "id": 1, "width": 100, "minWidth": 20 }],
//!   "rows": [{ "id": 2, "minHeight": 20, "isHeader": false,
//!              "cells": [{ "id": 3, "rowSpan": 1, "colSpan": 1, "content": "A" }] }],
//!   "config": { "defaultColumnWidth": 100, "style": { ... } }
//! }
//! ```

use serde::{Deserialize, Serialize};

use super::{CellContent, CellId, CellStyle, Column, RowId, TableConfig};

/// Serialized form of a whole table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDocument {
    pub columns: Vec<Column>,
    pub rows: Vec<RowData>,
    #[serde(default)]
    pub config: TableConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowData {
    pub id: RowId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    pub min_height: f32,
    #[serde(default)]
    pub is_header: bool,
    pub cells: Vec<CellData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellData {
    pub id: CellId,
    #[serde(default = "one")]
    pub row_span: usize,
    #[serde(default = "one")]
    pub col_span: usize,
    #[serde(default)]
    pub content: CellContent,
    #[serde(default, skip_serializing_if = "CellStyle::is_empty")]
    pub style: CellStyle,
}

fn one() -> usize {
    1
}
