//! Interactive drag-resize of column and row dividers.
//!
//! State machine: `Idle -> Resizing -> Idle`. Dragging the last column/row's
//! divider changes only that track (and so the table size). Dragging an
//! internal divider moves size between the track and its right/bottom
//! neighbor, keeping their sum constant. Inputs are clamped, never rejected.

use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::types::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DividerKind {
    /// Vertical line at a column's right edge
    Column,
    /// Horizontal line at a row's bottom edge
    Row,
}

/// A divider hit by [`ResizeController::detect_handle`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizeHandle {
    pub kind: DividerKind,
    /// Index of the column/row whose trailing edge is the divider
    pub index: usize,
}

/// Something with resizable column and row tracks.
pub trait ResizeTarget {
    fn track_count(&self, kind: DividerKind) -> usize;

    /// Current size of a track.
    fn track_size(&self, kind: DividerKind, index: usize) -> f32;

    fn min_track_size(&self, kind: DividerKind, index: usize) -> f32;

    fn set_track_size(&mut self, kind: DividerKind, index: usize, size: f32);

    /// Sizing state to restore on cancel. Rows sized to content report `None`.
    fn saved_track_size(&self, kind: DividerKind, index: usize) -> Option<f32>;

    fn restore_track_size(&mut self, kind: DividerKind, index: usize, saved: Option<f32>);
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TrackBaseline {
    index: usize,
    size: f32,
    min: f32,
    saved: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ActiveResize {
    handle: ResizeHandle,
    start: Point,
    current: TrackBaseline,
    /// Right/bottom neighbor; `None` for the last column/row
    neighbor: Option<TrackBaseline>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResizeState {
    Idle,
    Resizing(ActiveResizeInfo),
}

/// Public view of an in-progress resize
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveResizeInfo {
    pub handle: ResizeHandle,
    pub baseline_size: f32,
    pub neighbor_baseline_size: Option<f32>,
}

/// Drag-resize state machine
#[derive(Debug, Clone)]
pub struct ResizeController {
    tolerance: f32,
    active: Option<ActiveResize>,
}

impl ResizeController {
    pub fn new(tolerance: f32) -> Self {
        Self {
            tolerance,
            active: None,
        }
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    pub fn is_resizing(&self) -> bool {
        self.active.is_some()
    }

    pub fn state(&self) -> ResizeState {
        match self.active {
            None => ResizeState::Idle,
            Some(active) => ResizeState::Resizing(ActiveResizeInfo {
                handle: active.handle,
                baseline_size: active.current.size,
                neighbor_baseline_size: active.neighbor.map(|n| n.size),
            }),
        }
    }

    /// Hit-test the dividers. Column dividers win over row dividers.
    ///
    /// `col_positions` holds column left edges plus the final edge;
    /// `row_positions` holds row top edges plus the final edge.
    pub fn detect_handle(
        &self,
        point: Point,
        col_positions: &[f32],
        row_positions: &[f32],
    ) -> Option<ResizeHandle> {
        let width = col_positions.last().copied().unwrap_or(0.0);
        let height = row_positions.last().copied().unwrap_or(0.0);
        let within = |value: f32, extent: f32| {
            value >= -self.tolerance && value <= extent + self.tolerance
        };

        if within(point.y, height) {
            if let Some(index) = nearest_edge(col_positions, point.x, self.tolerance) {
                return Some(ResizeHandle {
                    kind: DividerKind::Column,
                    index,
                });
            }
        }
        if within(point.x, width) {
            if let Some(index) = nearest_edge(row_positions, point.y, self.tolerance) {
                return Some(ResizeHandle {
                    kind: DividerKind::Row,
                    index,
                });
            }
        }
        None
    }

    /// Begin dragging `handle` from `point`. Returns `false` if the handle
    /// does not name an existing track or another drag is still active; the
    /// active drag keeps its baselines.
    pub fn start_resize(
        &mut self,
        target: &impl ResizeTarget,
        handle: ResizeHandle,
        point: Point,
    ) -> bool {
        if self.active.is_some() {
            tracing::debug!(kind = ?handle.kind, index = handle.index, "resize already in progress");
            return false;
        }
        let count = target.track_count(handle.kind);
        if handle.index >= count {
            return false;
        }
        let baseline = |index: usize| TrackBaseline {
            index,
            size: target.track_size(handle.kind, index),
            min: target.min_track_size(handle.kind, index),
            saved: target.saved_track_size(handle.kind, index),
        };
        let neighbor = (handle.index + 1 < count).then(|| baseline(handle.index + 1));
        self.active = Some(ActiveResize {
            handle,
            start: point,
            current: baseline(handle.index),
            neighbor,
        });
        tracing::debug!(kind = ?handle.kind, index = handle.index, "resize started");
        true
    }

    /// Apply the drag position. Returns the new `(size, neighbor size)`, or
    /// `None` when idle.
    pub fn update_resize(
        &mut self,
        target: &mut impl ResizeTarget,
        point: Point,
    ) -> Option<(f32, Option<f32>)> {
        let active = self.active?;
        let delta = match active.handle.kind {
            DividerKind::Column => point.x - active.start.x,
            DividerKind::Row => point.y - active.start.y,
        };
        let kind = active.handle.kind;
        let current = active.current;

        match active.neighbor {
            None => {
                let size = (current.size + delta).max(current.min);
                target.set_track_size(kind, current.index, size);
                Some((size, None))
            }
            Some(neighbor) => {
                let lower = current.min - current.size;
                let upper = neighbor.size - neighbor.min;
                let delta = if lower > upper {
                    0.0
                } else {
                    delta.clamp(lower, upper)
                };
                let size = current.size + delta;
                let neighbor_size = neighbor.size - delta;
                target.set_track_size(kind, current.index, size);
                target.set_track_size(kind, neighbor.index, neighbor_size);
                Some((size, Some(neighbor_size)))
            }
        }
    }

    /// Commit the current sizes and return to idle. Returns the handle that
    /// was being dragged.
    pub fn end_resize(&mut self) -> Option<ResizeHandle> {
        let active = self.active.take()?;
        tracing::debug!(kind = ?active.handle.kind, index = active.handle.index, "resize committed");
        Some(active.handle)
    }

    /// Restore both baseline sizes and return to idle.
    pub fn cancel_resize(&mut self, target: &mut impl ResizeTarget) -> Option<ResizeHandle> {
        let active = self.active.take()?;
        let kind = active.handle.kind;
        target.restore_track_size(kind, active.current.index, active.current.saved);
        if let Some(neighbor) = active.neighbor {
            target.restore_track_size(kind, neighbor.index, neighbor.saved);
        }
        tracing::debug!(kind = ?kind, index = active.handle.index, "resize cancelled");
        Some(active.handle)
    }
}

/// Index `i` such that edge `i + 1` (the trailing edge of track `i`) is
/// within `tolerance` of `value`. The leading edge of track 0 is not a divider.
fn nearest_edge(edges: &[f32], value: f32, tolerance: f32) -> Option<usize> {
    edges
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, edge)| (i - 1, (edge - value).abs()))
        .filter(|(_, distance)| *distance <= tolerance)
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(index, _)| index)
}

impl ResizeTarget for Grid {
    fn track_count(&self, kind: DividerKind) -> usize {
        match kind {
            DividerKind::Column => self.column_count(),
            DividerKind::Row => self.row_count(),
        }
    }

    fn track_size(&self, kind: DividerKind, index: usize) -> f32 {
        match kind {
            DividerKind::Column => self.column(index).map_or(0.0, |c| c.width),
            DividerKind::Row => self.row(index).map_or(0.0, |r| r.calculated_height),
        }
    }

    fn min_track_size(&self, kind: DividerKind, index: usize) -> f32 {
        match kind {
            DividerKind::Column => self.column(index).map_or(0.0, |c| c.min_width),
            DividerKind::Row => self.row(index).map_or(0.0, |r| r.min_height),
        }
    }

    fn set_track_size(&mut self, kind: DividerKind, index: usize, size: f32) {
        match kind {
            DividerKind::Column => {
                self.set_column_width(index, size);
            }
            DividerKind::Row => {
                if let Some(row) = self.row_mut(index) {
                    let height = size.max(row.min_height);
                    row.explicit_height = Some(height);
                    row.calculated_height = height;
                }
            }
        }
    }

    fn saved_track_size(&self, kind: DividerKind, index: usize) -> Option<f32> {
        match kind {
            DividerKind::Column => self.column(index).map(|c| c.width),
            DividerKind::Row => self.row(index).and_then(|r| r.explicit_height),
        }
    }

    fn restore_track_size(&mut self, kind: DividerKind, index: usize, saved: Option<f32>) {
        match kind {
            DividerKind::Column => {
                if let Some(width) = saved {
                    self.set_column_width(index, width);
                }
            }
            DividerKind::Row => {
                if let Some(row) = self.row_mut(index) {
                    row.explicit_height = saved;
                }
            }
        }
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
    use crate::grid::GridDefaults;

    fn grid(rows: usize, cols: usize) -> Grid {
        Grid::new(
            rows,
            cols,
            GridDefaults {
                column_width: 100.0,
                min_column_width: 20.0,
                min_row_height: 20.0,
            },
        )
    }

    fn widths(g: &Grid) -> Vec<f32> {
        g.columns().iter().map(|c| c.width).collect()
    }

    const COLS: [f32; 4] = [0.0, 100.0, 200.0, 300.0];
    const ROWS: [f32; 3] = [0.0, 20.0, 40.0];

    #[test]
    fn detects_column_and_row_dividers() {
        let rc = ResizeController::new(4.0);
        assert_eq!(
            rc.detect_handle(Point::new(102.0, 10.0), &COLS, &ROWS),
            Some(ResizeHandle {
                kind: DividerKind::Column,
                index: 0
            })
        );
        assert_eq!(
            rc.detect_handle(Point::new(50.0, 38.0), &COLS, &ROWS),
            Some(ResizeHandle {
                kind: DividerKind::Row,
                index: 1
            })
        );
        assert_eq!(rc.detect_handle(Point::new(50.0, 10.0), &COLS, &ROWS), None);
        // Left edge of the table is not a divider
        assert_eq!(rc.detect_handle(Point::new(1.0, 10.0), &COLS, &ROWS), None);
        // Column line below the table
        assert_eq!(rc.detect_handle(Point::new(100.0, 90.0), &COLS, &ROWS), None);
    }

    #[test]
    fn internal_drag_clamps_at_min_and_conserves_sum() {
        let mut g = grid(1, 2);
        let mut rc = ResizeController::new(4.0);
        let handle = ResizeHandle {
            kind: DividerKind::Column,
            index: 0,
        };
        assert!(rc.start_resize(&g, handle, Point::new(100.0, 5.0)));
        let (left, right) = rc.update_resize(&mut g, Point::new(5.0, 5.0)).unwrap();
        assert_eq!(left, 20.0);
        assert_eq!(right, Some(180.0));
        assert_eq!(widths(&g), vec![20.0, 180.0]);

        // Dragging far right clamps the neighbor instead
        rc.update_resize(&mut g, Point::new(400.0, 5.0));
        assert_eq!(widths(&g), vec![180.0, 20.0]);
        assert!(rc.end_resize().is_some());
        assert!(!rc.is_resizing());
    }

    #[test]
    fn edge_drag_changes_only_last_track() {
        let mut g = grid(1, 3);
        let mut rc = ResizeController::new(4.0);
        let handle = ResizeHandle {
            kind: DividerKind::Column,
            index: 2,
        };
        rc.start_resize(&g, handle, Point::new(300.0, 5.0));
        rc.update_resize(&mut g, Point::new(350.0, 5.0));
        assert_eq!(widths(&g), vec![100.0, 100.0, 150.0]);
        rc.update_resize(&mut g, Point::new(0.0, 5.0));
        assert_eq!(widths(&g), vec![100.0, 100.0, 20.0]);
    }

    #[test]
    fn cancel_restores_baselines() {
        let mut g = grid(2, 2);
        g.set_track_size(DividerKind::Row, 0, 40.0);
        g.set_track_size(DividerKind::Row, 1, 40.0);
        let mut rc = ResizeController::new(4.0);
        rc.start_resize(
            &g,
            ResizeHandle {
                kind: DividerKind::Row,
                index: 0,
            },
            Point::new(10.0, 40.0),
        );
        rc.update_resize(&mut g, Point::new(10.0, 55.0));
        assert_eq!(g.row(0).unwrap().explicit_height, Some(55.0));
        assert_eq!(g.row(1).unwrap().explicit_height, Some(25.0));

        rc.cancel_resize(&mut g);
        assert_eq!(g.row(0).unwrap().explicit_height, Some(40.0));
        assert_eq!(g.row(1).unwrap().explicit_height, Some(40.0));
        assert_eq!(rc.state(), ResizeState::Idle);
    }

    #[test]
    fn cancel_returns_auto_row_to_auto() {
        let mut g = grid(2, 1);
        let mut rc = ResizeController::new(4.0);
        let handle = ResizeHandle {
            kind: DividerKind::Row,
            index: 1,
        };
        rc.start_resize(&g, handle, Point::new(10.0, 40.0));
        rc.update_resize(&mut g, Point::new(10.0, 60.0));
        assert_eq!(g.row(1).unwrap().explicit_height, Some(40.0));

        assert_eq!(rc.cancel_resize(&mut g), Some(handle));
        assert_eq!(g.row(1).unwrap().explicit_height, None);
    }

    #[test]
    fn second_start_keeps_original_baselines() {
        let mut g = grid(1, 2);
        let mut rc = ResizeController::new(4.0);
        let handle = ResizeHandle {
            kind: DividerKind::Column,
            index: 0,
        };
        assert!(rc.start_resize(&g, handle, Point::new(100.0, 5.0)));
        rc.update_resize(&mut g, Point::new(150.0, 5.0));
        assert!(!rc.start_resize(&g, handle, Point::new(150.0, 5.0)));

        rc.cancel_resize(&mut g);
        assert_eq!(widths(&g), vec![100.0, 100.0]);
    }

    #[test]
    fn update_when_idle_is_ignored() {
        let mut g = grid(1, 1);
        let mut rc = ResizeController::new(4.0);
        assert!(rc.update_resize(&mut g, Point::new(10.0, 10.0)).is_none());
        assert!(rc.end_resize().is_none());
        assert!(!rc.start_resize(
            &g,
            ResizeHandle {
                kind: DividerKind::Column,
                index: 3
            },
            Point::default()
        ));
    }
}
