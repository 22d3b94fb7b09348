//! Event surface tests: ordering, payloads, listener failures and
//! unsubscription, driven through the table facade.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{record_events, LineMeasurer};
use tablegrid::{CellAddress, CellRange, CellStyle, Table, TableEvent};

#[test]
fn structural_events_in_emission_order() {
    let mut table = Table::new(2, 2);
    let log = record_events(&mut table);

    table.insert_row(9, None);
    table.insert_column(0, None);
    table.remove_row(0);
    table.remove_column(7);
    table.set_column_width(0, 5.0);
    table.set_row_height(1, Some(44.0));
    table.set_row_height(1, None);
    table.set_header_row(0, true);

    assert_eq!(
        *log.borrow(),
        vec![
            TableEvent::RowInserted { index: 2 },
            TableEvent::ColumnInserted { index: 0 },
            TableEvent::RowRemoved { index: 0 },
            TableEvent::ColumnRemoved { index: 2 },
            // Clamped to the column's minimum width
            TableEvent::ColumnWidthChanged {
                index: 0,
                width: 20.0
            },
            TableEvent::RowHeightChanged {
                index: 1,
                height: Some(44.0)
            },
            TableEvent::RowHeightChanged {
                index: 1,
                height: None
            },
            TableEvent::RowHeaderChanged {
                index: 0,
                is_header: true
            },
        ]
    );
}

#[test]
fn refused_structural_changes_are_silent() {
    let mut table = Table::new(1, 1);
    let log = record_events(&mut table);
    assert_eq!(table.remove_row(0), None);
    assert_eq!(table.remove_column(0), None);
    assert!(!table.set_row_height(5, Some(10.0)));
    assert_eq!(table.set_column_width(5, 10.0), None);
    assert!(log.borrow().is_empty());
}

#[test]
fn content_and_style_events_name_the_origin() {
    let mut table = Table::new(3, 3);
    table.merge_cells(CellRange::from_coords(1, 1, 2, 2));
    let log = record_events(&mut table);

    table.set_cell_content(CellAddress::new(2, 2), "text");
    table.set_cell_style(CellAddress::new(2, 1), CellStyle::default());

    let origin = CellAddress::new(1, 1);
    assert_eq!(
        *log.borrow(),
        vec![
            TableEvent::ContentChanged { address: origin },
            TableEvent::StyleChanged { address: origin },
        ]
    );
}

#[test]
fn selection_and_focus_events() {
    let mut table = Table::new(3, 3);
    let log = record_events(&mut table);

    let range = table.select_range(CellRange::from_coords(0, 0, 1, 1));
    table.set_focus(Some(CellAddress::new(1, 1)));
    // Same focus again is not a change
    table.set_focus(Some(CellAddress::new(1, 1)));
    table.clear_selection();
    table.clear_selection();
    table.set_focus(None);

    assert_eq!(
        *log.borrow(),
        vec![
            TableEvent::SelectionChanged { range: Some(range) },
            TableEvent::FocusChanged {
                address: Some(CellAddress::new(1, 1))
            },
            TableEvent::SelectionChanged { range: None },
            TableEvent::FocusChanged { address: None },
        ]
    );
}

#[test]
fn merging_over_focus_moves_it_to_origin() {
    let mut table = Table::new(3, 3);
    table.set_focus(Some(CellAddress::new(1, 1)));
    let log = record_events(&mut table);

    table.merge_cells(CellRange::from_coords(0, 0, 1, 1));
    assert_eq!(table.focus(), Some(CellAddress::new(0, 0)));
    assert_eq!(
        log.borrow().last(),
        Some(&TableEvent::FocusChanged {
            address: Some(CellAddress::new(0, 0))
        })
    );
}

#[test]
fn panicking_listener_does_not_stop_delivery() {
    let mut table = Table::new(2, 2);
    table.subscribe(|event| {
        if matches!(event, TableEvent::RowInserted { .. }) {
            panic!("listener bug");
        }
    });
    let log = record_events(&mut table);

    table.insert_row(0, None);
    table.calculate_layout(&LineMeasurer::new(), false);

    let events = log.borrow();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0], TableEvent::RowInserted { index: 0 });
    assert!(matches!(events[1], TableEvent::LayoutChanged { .. }));
}

#[test]
fn unsubscribed_listener_sees_nothing_more() {
    let mut table = Table::new(2, 2);
    let count = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&count);
    let id = table.subscribe(move |_| *counter.borrow_mut() += 1);

    table.insert_row(0, None);
    assert!(table.unsubscribe(id));
    table.insert_row(0, None);
    assert_eq!(*count.borrow(), 1);
    assert!(!table.unsubscribe(id));
}

#[test]
fn events_serialize_for_javascript() {
    let event = TableEvent::CellsMerged {
        range: CellRange::from_coords(0, 0, 1, 2),
    };
    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["type"], "cells-merged");
    assert_eq!(value["range"]["end"]["col"], 2);

    let value = serde_json::to_value(TableEvent::RowHeightChanged {
        index: 3,
        height: None,
    })
    .unwrap();
    assert_eq!(value["type"], "row-height-changed");
    assert!(value["height"].is_null());
}
