//! Persistence tests: document round trips, JSON shape and validation.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::labelled_table;
use tablegrid::{
    CellAddress, CellRange, CellStyle, Table, TableConfig, TableError, VerticalAlign,
};

/// Row/column counts, spans and content match cell by cell.
fn assert_same_table(a: &Table, b: &Table) {
    assert_eq!(a.row_count(), b.row_count());
    assert_eq!(a.column_count(), b.column_count());
    for (row_a, row_b) in a.grid().rows().iter().zip(b.grid().rows()) {
        assert_eq!(row_a.explicit_height, row_b.explicit_height);
        assert_eq!(row_a.is_header, row_b.is_header);
        for (cell_a, cell_b) in row_a.cells.iter().zip(&row_b.cells) {
            assert_eq!(cell_a.id, cell_b.id);
            assert_eq!(
                (cell_a.row_span, cell_a.col_span),
                (cell_b.row_span, cell_b.col_span)
            );
            assert_eq!(cell_a.content(), cell_b.content());
            assert_eq!(cell_a.style, cell_b.style);
        }
    }
    for (col_a, col_b) in a.grid().columns().iter().zip(b.grid().columns()) {
        assert_eq!(col_a, col_b);
    }
}

#[test]
fn round_trip_preserves_structure() {
    let mut table = labelled_table(5, 4);
    table.merge_cells(CellRange::from_coords(0, 0, 1, 2));
    table.merge_cells(CellRange::from_coords(3, 1, 4, 3));
    table.set_header_row(0, true);
    table.set_row_height(2, Some(48.0));
    table.set_column_width(3, 65.0);
    table.set_cell_style(
        CellAddress::new(2, 0),
        CellStyle {
            background: Some("#FFEEDD".to_string()),
            vertical_align: Some(VerticalAlign::Middle),
            ..CellStyle::default()
        },
    );

    let json = table.to_json().unwrap();
    let restored = Table::from_json(&json).unwrap();
    assert_same_table(&table, &restored);
    assert_eq!(restored.grid().covered().len(), 5 + 5);
    assert_eq!(
        restored.resolve_cell(4, 3).unwrap().address,
        CellAddress::new(3, 1)
    );
}

#[test]
fn round_trip_keeps_config() {
    let config = TableConfig {
        default_column_width: 80.0,
        resize_tolerance: 6.0,
        ..TableConfig::default()
    };
    let table = Table::with_config(2, 2, config.clone());
    let restored = Table::from_document(table.to_document()).unwrap();
    assert_eq!(restored.config(), &config);

    // New columns pick up the restored default width
    let mut restored = restored;
    let index = restored.insert_column(2, None);
    assert_eq!(restored.grid().column(index).unwrap().width, 80.0);
}

#[test]
fn ids_stay_unique_after_reload() {
    let table = Table::new(2, 2);
    let mut restored = Table::from_json(&table.to_json().unwrap()).unwrap();
    restored.insert_row(0, None);

    let mut ids: Vec<u64> = restored
        .grid()
        .rows()
        .iter()
        .flat_map(|r| r.cells.iter().map(|c| c.id.0))
        .collect();
    let total = ids.len();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), total);
}

#[test]
fn json_uses_camel_case_keys() {
    let mut table = Table::new(1, 2);
    table.merge_cells(CellRange::from_coords(0, 0, 0, 1));
    table.set_cell_content(CellAddress::new(0, 0), "hello");

    let value: serde_json::Value = serde_json::from_str(&table.to_json().unwrap()).unwrap();
    assert_eq!(value["columns"][0]["minWidth"], 20.0);
    assert_eq!(value["rows"][0]["minHeight"], 20.0);
    assert_eq!(value["rows"][0]["isHeader"], false);
    assert_eq!(value["rows"][0]["cells"][0]["colSpan"], 2);
    assert_eq!(value["rows"][0]["cells"][0]["content"], "hello");
    assert_eq!(value["config"]["defaultColumnWidth"], 100.0);
    // Unset style and auto height are omitted
    assert!(value["rows"][0]["cells"][0].get("style").is_none());
    assert!(value["rows"][0].get("height").is_none());
}

#[test]
fn minimal_document_uses_defaults() {
    let json = r#"{
        "columns": [{ "id": 1, "width": 120, "minWidth": 30 }],
        "rows": [
            { "id": 2, "minHeight": 20, "cells": [{ "id": 3, "content": "a" }] },
            { "id": 4, "minHeight": 20, "isHeader": true, "cells": [{ "id": 5 }] }
        ]
    }"#;
    let table = Table::from_json(json).unwrap();
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.cell(CellAddress::new(0, 0)).unwrap().row_span, 1);
    assert!(table.grid().row(1).unwrap().is_header);
    assert_eq!(table.config(), &TableConfig::default());
}

#[test]
fn malformed_json_is_a_json_error() {
    assert!(matches!(
        Table::from_json("{ not json"),
        Err(TableError::Json(_))
    ));
}

#[test]
fn span_past_grid_is_rejected() {
    let json = r#"{
        "columns": [{ "id": 1, "width": 100, "minWidth": 20 }],
        "rows": [{ "id": 2, "minHeight": 20, "cells": [{ "id": 3, "rowSpan": 2 }] }]
    }"#;
    let err = Table::from_json(json).err().unwrap();
    assert!(matches!(err, TableError::InvalidDocument(_)));
    assert!(err.to_string().contains("runs past the grid"));
}

#[test]
fn spanning_covered_cell_is_rejected() {
    let mut document = Table::new(3, 3).to_document();
    document.rows[0].cells[0].row_span = 2;
    document.rows[0].cells[0].col_span = 2;
    document.rows[1].cells[1].row_span = 2;
    assert!(matches!(
        Table::from_document(document),
        Err(TableError::InvalidDocument(_))
    ));
}

#[test]
fn zero_span_is_rejected() {
    let mut document = Table::new(1, 1).to_document();
    document.rows[0].cells[0].col_span = 0;
    assert!(Table::from_document(document).is_err());
}
