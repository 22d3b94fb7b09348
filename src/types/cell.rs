use serde::{Deserialize, Serialize};

use super::{CellStyle, Rect};
use crate::measure::ContentMeasurer;

/// Stable cell identifier, handed to the content-measurement collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellId(pub u64);

/// Handle to a cell's rich-text content.
///
/// The text-flow collaborator owns shaping and line breaking; the grid only
/// carries the handle through merges, splits and serialization.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellContent {
    pub text: String,
}

impl CellContent {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl From<&str> for CellContent {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for CellContent {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

/// A single grid cell.
///
/// Span data is plain tagged data: a cell with `row_span`/`col_span` > 1 is a
/// merge origin, and the addresses it covers are tracked by
/// [`crate::layout::CoveredCellIndex`]. Covered cells stay in the grid as 1x1
/// cells with empty content.
#[derive(Debug, Clone)]
pub struct Cell {
    pub id: CellId,
    pub row_span: usize,
    pub col_span: usize,
    /// Set by the layout pass; `None` before the first layout and for covered cells.
    pub bounds: Option<Rect>,
    content: CellContent,
    pub style: CellStyle,
    /// Last measurement as `(available width, content height)`.
    measured: Option<(f32, f32)>,
}

impl Cell {
    pub fn new(id: CellId) -> Self {
        Self {
            id,
            row_span: 1,
            col_span: 1,
            bounds: None,
            content: CellContent::default(),
            style: CellStyle::default(),
            measured: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<CellContent>) -> Self {
        self.content = content.into();
        self
    }

    /// True if this cell is the origin of a merged span.
    pub fn is_spanning(&self) -> bool {
        self.row_span > 1 || self.col_span > 1
    }

    pub fn reset_span(&mut self) {
        if self.is_spanning() {
            self.row_span = 1;
            self.col_span = 1;
            self.measured = None;
        }
    }

    pub fn content(&self) -> &CellContent {
        &self.content
    }

    /// Replace the content and drop the cached measurement.
    pub fn set_content(&mut self, content: CellContent) {
        self.content = content;
        self.measured = None;
    }

    pub fn clear_content(&mut self) {
        self.set_content(CellContent::default());
    }

    /// Forget the cached measurement so the next layout remeasures.
    pub fn invalidate_measure(&mut self) {
        self.measured = None;
    }

    pub fn needs_measure(&self) -> bool {
        self.measured.is_none()
    }

    /// Content height at `width`, reusing the cached value when the width
    /// has not changed since the last measurement.
    pub fn content_height(&mut self, width: f32, measurer: &dyn ContentMeasurer) -> f32 {
        if let Some((measured_width, height)) = self.measured {
            if (measured_width - width).abs() <= f32::EPSILON {
                tracing::trace!(cell = self.id.0, "measure cache hit");
                return height;
            }
        }
        let height = measurer.content_height(self.id, &self.content, width);
        self.measured = Some((width, height));
        height
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;
    use std::cell::Cell as Counter;

    struct CountingMeasurer {
        calls: Counter<usize>,
    }

    impl ContentMeasurer for CountingMeasurer {
        fn content_height(&self, _cell: CellId, _content: &CellContent, width: f32) -> f32 {
            self.calls.set(self.calls.get() + 1);
            1000.0 / width
        }

        fn reflow(
            &self,
            _cell: CellId,
            content: &CellContent,
            _width: f32,
            _max_height: f32,
        ) -> Vec<String> {
            vec![content.text.clone()]
        }
    }

    #[test]
    fn measurement_is_cached_per_width() {
        let measurer = CountingMeasurer {
            calls: Counter::new(0),
        };
        let mut cell = Cell::new(CellId(1)).with_content("hello");

        assert_eq!(cell.content_height(100.0, &measurer), 10.0);
        assert_eq!(cell.content_height(100.0, &measurer), 10.0);
        assert_eq!(measurer.calls.get(), 1);

        assert_eq!(cell.content_height(50.0, &measurer), 20.0);
        assert_eq!(measurer.calls.get(), 2);

        cell.invalidate_measure();
        assert!(cell.needs_measure());
        cell.content_height(50.0, &measurer);
        assert_eq!(measurer.calls.get(), 3);
    }

    #[test]
    fn content_edit_invalidates_measurement() {
        let measurer = CountingMeasurer {
            calls: Counter::new(0),
        };
        let mut cell = Cell::new(CellId(1));
        cell.content_height(80.0, &measurer);
        cell.set_content("changed".into());
        assert!(cell.needs_measure());
    }
}
