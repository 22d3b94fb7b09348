//! Visible-range index tests: binary search over cached rows and culled
//! rendering of large tables.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_precision_loss
)]

mod common;

use common::{labelled_table, LineMeasurer};
use tablegrid::layout::visible::{
    first_row_ending_at_or_after, last_row_starting_at_or_before, visible_row_range,
};
use tablegrid::layout::Viewport;
use tablegrid::render::RecordingPainter;
use tablegrid::{CellAddress, CellRange, Rect, Table};
use test_case::test_case;

fn uniform(rows: usize, height: f32) -> (Vec<f32>, Vec<f32>) {
    let positions = (0..rows).map(|i| i as f32 * height).collect();
    (positions, vec![height; rows])
}

#[test_case(0.0, 0; "top of table")]
#[test_case(19.9, 0; "inside first row")]
#[test_case(20.0, 0; "on first bottom edge")]
#[test_case(20.1, 1; "just past first row")]
#[test_case(1999.0, 99; "last row")]
fn first_visible_row(y: f32, expected: usize) {
    let (positions, heights) = uniform(100, 20.0);
    assert_eq!(
        first_row_ending_at_or_after(&positions, &heights, y),
        Some(expected)
    );
}

#[test]
fn nothing_below_the_table() {
    let (positions, heights) = uniform(10, 20.0);
    assert_eq!(first_row_ending_at_or_after(&positions, &heights, 201.0), None);
    assert_eq!(visible_row_range(&positions, &heights, 250.0, 100.0), None);
}

#[test]
fn nothing_above_the_table() {
    let (positions, heights) = uniform(10, 20.0);
    assert_eq!(last_row_starting_at_or_before(&positions, -1.0), None);
    assert_eq!(visible_row_range(&positions, &heights, -100.0, 50.0), None);
}

#[test]
fn uneven_rows() {
    let positions = [0.0, 10.0, 110.0, 115.0, 300.0];
    let heights = [10.0, 100.0, 5.0, 185.0, 10.0];
    assert_eq!(visible_row_range(&positions, &heights, 50.0, 70.0), Some((1, 3)));
    assert_eq!(visible_row_range(&positions, &heights, 305.0, 1.0), Some((4, 4)));
}

#[test]
fn empty_cache_has_no_rows() {
    assert_eq!(visible_row_range(&[], &[], 0.0, 100.0), None);
}

#[test]
fn table_visible_rows_match_layout() {
    let mut table = Table::new(1000, 3);
    table.calculate_layout(&LineMeasurer::new(), false);
    assert_eq!(table.visible_rows(5010.0, 600.0), Some((250, 280)));
}

#[test]
fn render_culls_offscreen_rows() {
    let measurer = LineMeasurer::new();
    let mut table = labelled_table(500, 4);
    let mut painter = RecordingPainter::new();
    // Rows 100..=104 intersect the band
    let painted = table.render(
        &mut painter,
        &measurer,
        Rect::new(0.0, 2005.0, 1000.0, 90.0),
    );
    assert_eq!(painted, 5 * 4);
    assert_eq!(painter.texts().first().copied(), Some("r100c0"));
    assert_eq!(painter.texts().last().copied(), Some("r104c3"));
}

#[test]
fn span_starting_above_clip_is_still_painted() {
    let measurer = LineMeasurer::new();
    let mut table = labelled_table(10, 2);
    table.merge_cells(CellRange::from_coords(2, 0, 6, 0));
    let mut painter = RecordingPainter::new();

    // Band covers rows 5..=6 only; the span's origin is row 2
    table.render(&mut painter, &measurer, Rect::new(0.0, 101.0, 200.0, 30.0));
    let texts = painter.texts();
    assert_eq!(texts.iter().filter(|t| **t == "r2c0").count(), 1);
    assert!(texts.contains(&"r5c1"));
    assert!(texts.contains(&"r6c1"));
    assert_eq!(painter.outlines()[0], Rect::new(0.0, 40.0, 100.0, 100.0));
}

#[test]
fn render_culls_columns_outside_clip() {
    let measurer = LineMeasurer::new();
    let mut table = labelled_table(2, 10);
    let mut painter = RecordingPainter::new();
    let painted = table.render(&mut painter, &measurer, Rect::new(250.0, 0.0, 100.0, 40.0));
    // Columns 2 and 3 overlap x 250..350
    assert_eq!(painted, 4);
    assert!(table.cell(CellAddress::new(0, 2)).unwrap().bounds.is_some());
}

#[test]
fn viewport_drives_culling() {
    let mut table = Table::new(200, 5);
    table.calculate_layout(&LineMeasurer::new(), false);

    let mut viewport = Viewport::new(400.0, 100.0);
    viewport.scroll_by(0.0, 1000.0, table.layout());
    assert_eq!(viewport.visible_rows(table.layout()), Some((49, 55)));

    // Scrolling past the end clamps to the last page
    viewport.scroll_by(0.0, 1e6, table.layout());
    assert_eq!(viewport.scroll_y, 4000.0 - 100.0);
    assert_eq!(viewport.visible_rows(table.layout()), Some((194, 199)));
}
