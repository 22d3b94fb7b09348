//! Span resolution tests: covered-cell index, resolve_cell, point lookup and
//! how structural changes reshape spans.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::LineMeasurer;
use tablegrid::{CellAddress, CellRange, Point, Table};
use test_case::test_case;

/// Every covered address of every span resolves to its origin.
fn assert_span_containment(table: &Table) {
    for (row_idx, row) in table.grid().rows().iter().enumerate() {
        for (col_idx, cell) in row.cells.iter().enumerate() {
            if !cell.is_spanning() {
                continue;
            }
            let origin = CellAddress::new(row_idx, col_idx);
            for address in CellRange::spanning(origin, cell.row_span, cell.col_span).addresses() {
                if address == origin {
                    continue;
                }
                let resolved = table.resolve_cell(address.row, address.col).unwrap();
                assert!(resolved.is_spanned, "{address:?} should be covered");
                assert_eq!(resolved.address, origin);
            }
        }
    }
}

// ============================================================================
// RESOLUTION
// ============================================================================

#[test]
fn merge_2x2_in_3x3_grid() {
    let mut table = Table::new(3, 3);
    let range = CellRange::from_coords(0, 0, 1, 1);

    assert!(table.can_merge(range).success);
    assert!(table.merge_cells(range).success);

    let origin = table.cell(CellAddress::new(0, 0)).unwrap();
    assert_eq!((origin.row_span, origin.col_span), (2, 2));

    let covered = table.resolve_cell(1, 1).unwrap();
    assert!(covered.is_spanned);
    assert_eq!(covered.address, CellAddress::new(0, 0));

    let free = table.resolve_cell(2, 2).unwrap();
    assert!(!free.is_spanned);
    assert_eq!(free.address, CellAddress::new(2, 2));
}

#[test_case(CellRange::from_coords(0, 0, 0, 3); "full row")]
#[test_case(CellRange::from_coords(0, 2, 4, 2); "full column")]
#[test_case(CellRange::from_coords(1, 1, 3, 2); "inner block")]
#[test_case(CellRange::from_coords(4, 3, 3, 0); "reversed corners")]
fn span_containment_holds(range: CellRange) {
    let mut table = Table::new(5, 4);
    assert!(table.merge_cells(range).success);
    assert_span_containment(&table);
    let range = range.normalized();
    assert_eq!(
        table.grid().covered().len(),
        range.row_count() * range.col_count() - 1
    );
}

#[test]
fn origin_resolves_to_itself_unspanned() {
    let mut table = Table::new(3, 3);
    table.merge_cells(CellRange::from_coords(1, 1, 2, 2));
    let resolved = table.resolve_cell(1, 1).unwrap();
    assert!(!resolved.is_spanned);
    assert_eq!(resolved.address, CellAddress::new(1, 1));
}

#[test]
fn out_of_range_resolves_to_none() {
    let table = Table::new(2, 2);
    assert!(table.resolve_cell(2, 0).is_none());
    assert!(table.resolve_cell(0, 2).is_none());
}

// ============================================================================
// POINT LOOKUP
// ============================================================================

#[test]
fn point_inside_span_returns_origin() {
    let mut table = Table::new(3, 3);
    table.merge_cells(CellRange::from_coords(0, 1, 1, 2));
    table.calculate_layout(&LineMeasurer::new(), false);

    // Columns are 100 wide, rows 20 tall
    assert_eq!(
        table.get_cell_at_point(Point::new(250.0, 30.0)),
        Some(CellAddress::new(0, 1))
    );
    assert_eq!(
        table.get_cell_at_point(Point::new(50.0, 30.0)),
        Some(CellAddress::new(1, 0))
    );
    assert_eq!(table.get_cell_at_point(Point::new(50.0, 61.0)), None);
}

#[test]
fn point_lookup_follows_uneven_widths() {
    let mut table = Table::new(1, 3);
    table.set_column_width(0, 30.0);
    table.set_column_width(1, 300.0);
    assert_eq!(
        table.get_cell_at_point(Point::new(29.0, 1.0)),
        Some(CellAddress::new(0, 0))
    );
    assert_eq!(
        table.get_cell_at_point(Point::new(31.0, 1.0)),
        Some(CellAddress::new(0, 1))
    );
    assert_eq!(
        table.get_cell_at_point(Point::new(331.0, 1.0)),
        Some(CellAddress::new(0, 2))
    );
}

// ============================================================================
// STRUCTURAL CHANGES
// ============================================================================

#[test]
fn inserting_row_inside_span_grows_it() {
    let mut table = Table::new(4, 2);
    table.merge_cells(CellRange::from_coords(0, 0, 2, 0));
    table.insert_row(1, None);

    assert_eq!(table.cell(CellAddress::new(0, 0)).unwrap().row_span, 4);
    assert_span_containment(&table);
}

#[test]
fn inserting_row_before_span_shifts_it() {
    let mut table = Table::new(3, 2);
    table.merge_cells(CellRange::from_coords(1, 0, 2, 1));
    table.insert_row(0, None);

    assert!(!table.cell(CellAddress::new(1, 0)).unwrap().is_spanning());
    let origin = table.cell(CellAddress::new(2, 0)).unwrap();
    assert_eq!((origin.row_span, origin.col_span), (2, 2));
    assert_span_containment(&table);
}

#[test]
fn inserting_row_after_span_leaves_it() {
    let mut table = Table::new(3, 2);
    table.merge_cells(CellRange::from_coords(0, 0, 1, 1));
    table.insert_row(2, None);
    let origin = table.cell(CellAddress::new(0, 0)).unwrap();
    assert_eq!((origin.row_span, origin.col_span), (2, 2));
    assert_eq!(table.grid().covered().len(), 3);
}

#[test]
fn inserting_column_inside_span_grows_it() {
    let mut table = Table::new(2, 3);
    table.merge_cells(CellRange::from_coords(0, 0, 1, 2));
    table.insert_column(2, Some(50.0));

    let origin = table.cell(CellAddress::new(0, 0)).unwrap();
    assert_eq!((origin.row_span, origin.col_span), (2, 4));
    assert_eq!(table.grid().covered().len(), 7);
    assert_span_containment(&table);
}

#[test]
fn removing_column_through_span_shrinks_it() {
    let mut table = Table::new(2, 4);
    table.merge_cells(CellRange::from_coords(0, 0, 0, 2));
    table.remove_column(1);

    assert_eq!(table.cell(CellAddress::new(0, 0)).unwrap().col_span, 2);
    assert_eq!(table.grid().covered().len(), 1);
    assert_span_containment(&table);
}

#[test]
fn removing_origin_row_moves_content_down() {
    let mut table = Table::new(4, 2);
    table.set_cell_content(CellAddress::new(1, 0), "kept");
    table.merge_cells(CellRange::from_coords(1, 0, 3, 1));
    table.remove_row(1);

    let origin = table.resolve_cell(2, 1).unwrap();
    assert!(origin.is_spanned);
    assert_eq!(origin.address, CellAddress::new(1, 0));
    assert_eq!(origin.cell.content().text, "kept");
    assert_eq!((origin.cell.row_span, origin.cell.col_span), (2, 2));
}

#[test]
fn removing_whole_span_leaves_no_covered_cells() {
    let mut table = Table::new(3, 3);
    table.merge_cells(CellRange::from_coords(1, 0, 1, 2));
    table.remove_row(1);
    assert!(table.grid().covered().is_empty());
    assert_eq!(table.row_count(), 2);
}

#[test]
fn structural_change_remeasures_cells() {
    let measurer = LineMeasurer::new();
    let mut table = Table::new(2, 2);
    table.calculate_layout(&measurer, false);
    let first = measurer.calls();
    assert_eq!(first, 4);

    // Cached measurements are reused when nothing changed
    table.calculate_layout(&measurer, true);
    assert_eq!(measurer.calls(), first);

    table.insert_column(1, None);
    table.calculate_layout(&measurer, false);
    assert_eq!(measurer.calls(), first + 6);
}
