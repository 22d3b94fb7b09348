//! Change notifications.
//!
//! Listeners are called synchronously, in subscription order, for every
//! event in emission order. A panicking listener is logged and skipped; the
//! remaining listeners still receive the event.

use std::panic::{catch_unwind, AssertUnwindSafe};

use serde::Serialize;

use crate::resize::ResizeHandle;
use crate::types::{CellAddress, CellRange};

/// Something that changed on a table
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum TableEvent {
    RowInserted { index: usize },
    RowRemoved { index: usize },
    ColumnInserted { index: usize },
    ColumnRemoved { index: usize },
    #[serde(rename_all = "camelCase")]
    ColumnWidthChanged { index: usize, width: f32 },
    /// `height` is `None` when the row returned to content sizing
    #[serde(rename_all = "camelCase")]
    RowHeightChanged { index: usize, height: Option<f32> },
    #[serde(rename_all = "camelCase")]
    RowHeaderChanged { index: usize, is_header: bool },
    CellsMerged { range: CellRange },
    CellSplit { range: CellRange },
    ContentChanged { address: CellAddress },
    StyleChanged { address: CellAddress },
    LayoutChanged { width: f32, height: f32 },
    SelectionChanged { range: Option<CellRange> },
    FocusChanged { address: Option<CellAddress> },
    ResizeStarted { handle: ResizeHandle },
    ResizeEnded { handle: ResizeHandle, committed: bool },
}

/// Handle returned by [`EventBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&TableEvent)>;

/// Ordered, synchronous observer list
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<(ListenerId, Listener)>,
    next_id: u64,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&TableEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Deliver `event` to every listener.
    pub fn emit(&mut self, event: &TableEvent) {
        tracing::trace!(?event, listeners = self.listeners.len(), "emit");
        for (id, listener) in &mut self.listeners {
            if catch_unwind(AssertUnwindSafe(|| listener(event))).is_err() {
                tracing::warn!(listener = id.0, ?event, "table event listener panicked");
            }
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn delivers_in_order_to_all_listeners() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        for name in ["a", "b"] {
            let log = Rc::clone(&log);
            bus.subscribe(move |event| log.borrow_mut().push((name, event.clone())));
        }

        bus.emit(&TableEvent::RowInserted { index: 0 });
        bus.emit(&TableEvent::RowRemoved { index: 1 });

        assert_eq!(
            *log.borrow(),
            vec![
                ("a", TableEvent::RowInserted { index: 0 }),
                ("b", TableEvent::RowInserted { index: 0 }),
                ("a", TableEvent::RowRemoved { index: 1 }),
                ("b", TableEvent::RowRemoved { index: 1 }),
            ]
        );
    }

    #[test]
    fn panicking_listener_does_not_block_others() {
        let seen = Rc::new(RefCell::new(0));
        let mut bus = EventBus::new();
        bus.subscribe(|_| panic!("listener failure"));
        let counter = Rc::clone(&seen);
        bus.subscribe(move |_| *counter.borrow_mut() += 1);

        bus.emit(&TableEvent::ColumnInserted { index: 0 });
        bus.emit(&TableEvent::ColumnInserted { index: 1 });
        assert_eq!(*seen.borrow(), 2);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let seen = Rc::new(RefCell::new(0));
        let mut bus = EventBus::new();
        let counter = Rc::clone(&seen);
        let id = bus.subscribe(move |_| *counter.borrow_mut() += 1);

        bus.emit(&TableEvent::ColumnRemoved { index: 0 });
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.emit(&TableEvent::ColumnRemoved { index: 0 });
        assert_eq!(*seen.borrow(), 1);
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn events_serialize_with_kebab_case_tag() {
        let json = serde_json::to_value(TableEvent::ColumnWidthChanged {
            index: 2,
            width: 80.0,
        })
        .unwrap();
        assert_eq!(json["type"], "column-width-changed");
        assert_eq!(json["index"], 2);
    }
}
