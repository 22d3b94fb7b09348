//! Resize controller tests: divider hit-testing, edge isolation, internal
//! conservation, clamping and cancel.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{record_events, LineMeasurer};
use proptest::prelude::*;
use tablegrid::{
    DividerKind, Point, ResizeHandle, ResizeState, Table, TableConfig, TableEvent,
};

fn widths(table: &Table) -> Vec<f32> {
    table.grid().columns().iter().map(|c| c.width).collect()
}

fn column(index: usize) -> ResizeHandle {
    ResizeHandle {
        kind: DividerKind::Column,
        index,
    }
}

fn row(index: usize) -> ResizeHandle {
    ResizeHandle {
        kind: DividerKind::Row,
        index,
    }
}

/// Drag `handle` from its divider by `delta` and commit.
fn drag(table: &mut Table, handle: ResizeHandle, delta: f32) {
    let edges: Vec<f32> = match handle.kind {
        DividerKind::Column => table.layout().col_positions().to_vec(),
        DividerKind::Row => {
            let mut edges = table.layout().row_positions().to_vec();
            edges.push(table.height());
            edges
        }
    };
    let at = edges[handle.index + 1];
    let (start, end) = match handle.kind {
        DividerKind::Column => (Point::new(at, 5.0), Point::new(at + delta, 5.0)),
        DividerKind::Row => (Point::new(5.0, at), Point::new(5.0, at + delta)),
    };
    assert!(table.start_resize(handle, start));
    table.update_resize(end);
    table.end_resize();
}

// ============================================================================
// HIT TESTING
// ============================================================================

#[test]
fn detects_dividers_within_tolerance() {
    let mut table = Table::new(3, 3);
    table.calculate_layout(&LineMeasurer::new(), false);

    assert_eq!(table.detect_handle(Point::new(196.0, 10.0)), Some(column(1)));
    assert_eq!(table.detect_handle(Point::new(300.0, 50.0)), Some(column(2)));
    assert_eq!(table.detect_handle(Point::new(150.0, 43.0)), Some(row(1)));
    assert_eq!(table.detect_handle(Point::new(150.0, 10.0)), None);
    assert_eq!(table.detect_handle(Point::new(195.0, 10.0)), None);
}

#[test]
fn tolerance_comes_from_config() {
    let config = TableConfig {
        resize_tolerance: 10.0,
        ..TableConfig::default()
    };
    let mut table = Table::with_config(2, 2, config);
    table.calculate_layout(&LineMeasurer::new(), false);
    assert_eq!(table.detect_handle(Point::new(91.0, 5.0)), Some(column(0)));
}

// ============================================================================
// COLUMNS
// ============================================================================

#[test]
fn edge_resize_changes_only_last_column() {
    let mut table = Table::new(2, 3);
    table.calculate_layout(&LineMeasurer::new(), false);
    drag(&mut table, column(2), 45.0);
    assert_eq!(widths(&table), vec![100.0, 100.0, 145.0]);

    table.calculate_layout(&LineMeasurer::new(), false);
    assert_eq!(table.width(), 345.0);
}

#[test]
fn edge_resize_clamps_at_min_width() {
    let mut table = Table::new(1, 2);
    table.calculate_layout(&LineMeasurer::new(), false);
    drag(&mut table, column(1), -500.0);
    assert_eq!(widths(&table), vec![100.0, 20.0]);
}

#[test]
fn internal_drag_clamps_left_at_min_and_right_absorbs_remainder() {
    let mut table = Table::new(1, 2);
    table.calculate_layout(&LineMeasurer::new(), false);
    // Left column would go to 5
    drag(&mut table, column(0), -95.0);
    assert_eq!(widths(&table), vec![20.0, 180.0]);
}

#[test]
fn internal_drag_leaves_other_columns_alone() {
    let mut table = Table::new(1, 4);
    table.calculate_layout(&LineMeasurer::new(), false);
    drag(&mut table, column(1), 30.0);
    assert_eq!(widths(&table), vec![100.0, 130.0, 70.0, 100.0]);
}

#[test]
fn update_during_drag_is_relative_to_baseline() {
    let mut table = Table::new(1, 2);
    table.calculate_layout(&LineMeasurer::new(), false);
    table.start_resize(column(0), Point::new(100.0, 5.0));
    table.update_resize(Point::new(140.0, 5.0));
    table.update_resize(Point::new(120.0, 5.0));
    assert_eq!(widths(&table), vec![120.0, 80.0]);
    assert!(matches!(table.resize_state(), ResizeState::Resizing(_)));
    table.end_resize();
    assert_eq!(table.resize_state(), ResizeState::Idle);
}

#[test]
fn cancel_restores_both_columns() {
    let mut table = Table::new(1, 3);
    table.calculate_layout(&LineMeasurer::new(), false);
    let log = record_events(&mut table);

    table.start_resize(column(0), Point::new(100.0, 5.0));
    table.update_resize(Point::new(160.0, 5.0));
    assert_eq!(widths(&table), vec![160.0, 40.0, 100.0]);
    assert_eq!(table.cancel_resize(), Some(column(0)));
    assert_eq!(widths(&table), vec![100.0, 100.0, 100.0]);

    assert_eq!(
        log.borrow().last(),
        Some(&TableEvent::ResizeEnded {
            handle: column(0),
            committed: false
        })
    );
}

#[test]
fn restarting_mid_drag_is_refused() {
    let mut table = Table::new(1, 3);
    table.calculate_layout(&LineMeasurer::new(), false);

    assert!(table.start_resize(column(0), Point::new(100.0, 5.0)));
    table.update_resize(Point::new(160.0, 5.0));
    let log = record_events(&mut table);
    assert!(!table.start_resize(column(1), Point::new(200.0, 5.0)));
    assert!(log.borrow().is_empty());

    assert_eq!(table.cancel_resize(), Some(column(0)));
    assert_eq!(widths(&table), vec![100.0, 100.0, 100.0]);
}

// ============================================================================
// ROWS
// ============================================================================

#[test]
fn row_drag_fixes_heights() {
    let mut table = Table::new(3, 1);
    table.calculate_layout(&LineMeasurer::new(), false);
    drag(&mut table, row(2), 15.0);

    assert_eq!(table.grid().row(2).unwrap().explicit_height, Some(35.0));
    assert!(table.is_layout_dirty());
    table.calculate_layout(&LineMeasurer::new(), false);
    assert_eq!(table.layout().row_heights(), &[20.0, 20.0, 35.0]);
}

#[test]
fn internal_row_drag_conserves_pair() {
    let mut table = Table::new(3, 1);
    table.set_row_height(0, Some(60.0));
    table.set_row_height(1, Some(60.0));
    table.calculate_layout(&LineMeasurer::new(), false);
    drag(&mut table, row(0), -25.0);
    table.calculate_layout(&LineMeasurer::new(), false);
    assert_eq!(&table.layout().row_heights()[..2], &[35.0, 85.0]);
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #[test]
    fn internal_column_drag_conserves_sum(
        start_widths in prop::collection::vec(20.0f32..300.0, 2..6),
        divider in 0usize..5,
        delta in -400.0f32..400.0,
    ) {
        let cols = start_widths.len();
        let divider = divider % (cols - 1);
        let mut table = Table::new(1, cols);
        for (i, w) in start_widths.iter().enumerate() {
            table.set_column_width(i, *w);
        }
        table.calculate_layout(&LineMeasurer::new(), false);
        let before = widths(&table);

        drag(&mut table, column(divider), delta);
        let after = widths(&table);

        let pair_before = before[divider] + before[divider + 1];
        let pair_after = after[divider] + after[divider + 1];
        prop_assert!((pair_before - pair_after).abs() < 1e-3);
        prop_assert!(after[divider] >= 20.0 - 1e-3);
        prop_assert!(after[divider + 1] >= 20.0 - 1e-3);
        for i in (0..cols).filter(|i| *i != divider && *i != divider + 1) {
            prop_assert_eq!(after[i], before[i]);
        }
    }

    #[test]
    fn edge_column_drag_is_isolated(
        cols in 1usize..6,
        delta in -300.0f32..300.0,
    ) {
        let mut table = Table::new(1, cols);
        table.calculate_layout(&LineMeasurer::new(), false);
        drag(&mut table, column(cols - 1), delta);

        let after = widths(&table);
        prop_assert!((after[cols - 1] - (100.0 + delta).max(20.0)).abs() < 1e-3);
        for width in &after[..cols - 1] {
            prop_assert_eq!(*width, 100.0);
        }
    }
}
