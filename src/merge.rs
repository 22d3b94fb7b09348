//! Merge and split of rectangular cell ranges.
//!
//! Merging keeps only the top-left (origin) cell's content; every other cell
//! in the range is emptied and stays empty after a later split. Undo capture
//! of the discarded content belongs to the caller.

use crate::error::MergeError;
use crate::grid::Grid;
use crate::types::{CellAddress, CellRange};

/// Swap corners so `start` is top-left and `end` bottom-right.
pub fn normalize_range(range: CellRange) -> CellRange {
    range.normalized()
}

/// Check whether `range` can be merged. Returns the normalized range.
///
/// Every cell in the range must be either outside all existing spans or part
/// of a span lying entirely inside the range.
pub fn can_merge(grid: &Grid, range: CellRange) -> Result<CellRange, MergeError> {
    let range = normalize_range(range);
    if !grid.contains(range.end) {
        return Err(MergeError::OutOfBounds);
    }
    if range.is_single_cell() {
        return Err(MergeError::SingleCell);
    }

    for address in range.addresses() {
        if let Some(origin) = grid.covered().origin_of(address) {
            if !range.contains(origin) {
                return Err(MergeError::OverlapsExistingSpan);
            }
        }
        let Some(cell) = grid.cell(address) else {
            return Err(MergeError::OutOfBounds);
        };
        if cell.is_spanning() {
            let span = CellRange::spanning(address, cell.row_span, cell.col_span);
            if !range.contains_range(&span) {
                return Err(MergeError::OverlapsExistingSpan);
            }
        }
    }

    Ok(range)
}

/// Merge `range` into its top-left cell. Returns the merged (normalized) range.
pub fn merge_cells(grid: &mut Grid, range: CellRange) -> Result<CellRange, MergeError> {
    let range = can_merge(grid, range)?;
    let origin = range.start;

    for address in range.addresses() {
        if address == origin {
            continue;
        }
        if let Some(cell) = grid.cell_mut(address) {
            cell.reset_span();
            cell.clear_content();
            cell.bounds = None;
        }
    }
    if let Some(cell) = grid.cell_mut(origin) {
        cell.row_span = range.row_count();
        cell.col_span = range.col_count();
        cell.invalidate_measure();
    }
    grid.rebuild_covered();

    tracing::debug!(
        row = origin.row,
        col = origin.col,
        row_span = range.row_count(),
        col_span = range.col_count(),
        "cells merged"
    );
    Ok(range)
}

/// Check whether the cell at `address` is a merge origin that can be split.
/// Returns the span's range.
pub fn can_split(grid: &Grid, address: CellAddress) -> Result<CellRange, MergeError> {
    let cell = grid.cell(address).ok_or(MergeError::OutOfBounds)?;
    if !cell.is_spanning() {
        return Err(MergeError::NotMerged);
    }
    Ok(CellRange::spanning(address, cell.row_span, cell.col_span))
}

/// Split a merged cell back into 1x1 cells. Returns the former span's range.
///
/// Previously covered cells come back empty; merge discarded their content.
pub fn split_cell(grid: &mut Grid, address: CellAddress) -> Result<CellRange, MergeError> {
    let range = can_split(grid, address)?;

    for covered in range.addresses() {
        if let Some(cell) = grid.cell_mut(covered) {
            cell.reset_span();
            cell.invalidate_measure();
        }
    }
    grid.rebuild_covered();

    tracing::debug!(row = address.row, col = address.col, "cell split");
    Ok(range)
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
                column_width: 50.0,
                min_column_width: 10.0,
                min_row_height: 20.0,
            },
        )
    }

    #[test]
    fn merge_accepts_reversed_corners() {
        let mut g = grid(3, 3);
        let range = merge_cells(&mut g, CellRange::from_coords(1, 1, 0, 0)).unwrap();
        assert_eq!(range, CellRange::from_coords(0, 0, 1, 1));
        let origin = g.cell(CellAddress::new(0, 0)).unwrap();
        assert_eq!((origin.row_span, origin.col_span), (2, 2));
    }

    #[test]
    fn single_cell_is_refused() {
        let g = grid(2, 2);
        assert_eq!(
            can_merge(&g, CellRange::from_coords(1, 1, 1, 1)),
            Err(MergeError::SingleCell)
        );
    }

    #[test]
    fn out_of_bounds_is_refused() {
        let g = grid(2, 2);
        assert_eq!(
            can_merge(&g, CellRange::from_coords(0, 0, 2, 1)),
            Err(MergeError::OutOfBounds)
        );
    }

    #[test]
    fn partial_overlap_is_refused() {
        let mut g = grid(4, 4);
        merge_cells(&mut g, CellRange::from_coords(1, 1, 2, 2)).unwrap();

        // Covers only the covered part of the span
        assert_eq!(
            can_merge(&g, CellRange::from_coords(2, 2, 3, 3)),
            Err(MergeError::OverlapsExistingSpan)
        );
        // Contains the origin but not the whole span
        assert_eq!(
            can_merge(&g, CellRange::from_coords(0, 0, 1, 1)),
            Err(MergeError::OverlapsExistingSpan)
        );
    }

    #[test]
    fn enclosing_range_remerges_span() {
        let mut g = grid(4, 4);
        merge_cells(&mut g, CellRange::from_coords(1, 1, 2, 2)).unwrap();
        merge_cells(&mut g, CellRange::from_coords(0, 0, 3, 3)).unwrap();

        assert!(!g.cell(CellAddress::new(1, 1)).unwrap().is_spanning());
        assert_eq!(g.covered().len(), 15);
        assert_eq!(
            g.covered().origin_of(CellAddress::new(2, 2)),
            Some(CellAddress::new(0, 0))
        );
    }

    #[test]
    fn merge_discards_non_origin_content() {
        let mut g = grid(2, 2);
        for (i, address) in CellRange::from_coords(0, 0, 1, 1).addresses().enumerate() {
            g.cell_mut(address).unwrap().set_content(format!("cell {i}").into());
        }
        merge_cells(&mut g, CellRange::from_coords(0, 0, 1, 1)).unwrap();

        assert_eq!(g.cell(CellAddress::new(0, 0)).unwrap().content().text, "cell 0");
        for address in [(0, 1), (1, 0), (1, 1)] {
            let cell = g.cell(CellAddress::new(address.0, address.1)).unwrap();
            assert!(cell.content().is_empty());
        }
    }

    #[test]
    fn split_restores_unit_spans_but_not_content() {
        let mut g = grid(2, 2);
        g.cell_mut(CellAddress::new(1, 1)).unwrap().set_content("lost".into());
        merge_cells(&mut g, CellRange::from_coords(0, 0, 1, 1)).unwrap();

        let range = split_cell(&mut g, CellAddress::new(0, 0)).unwrap();
        assert_eq!(range, CellRange::from_coords(0, 0, 1, 1));
        assert!(g.covered().is_empty());
        for row in g.rows() {
            for cell in &row.cells {
                assert_eq!((cell.row_span, cell.col_span), (1, 1));
            }
        }
        assert!(g.cell(CellAddress::new(1, 1)).unwrap().content().is_empty());
    }

    #[test]
    fn split_requires_merged_origin() {
        let mut g = grid(2, 2);
        assert_eq!(
            can_split(&g, CellAddress::new(0, 0)),
            Err(MergeError::NotMerged)
        );
        merge_cells(&mut g, CellRange::from_coords(0, 0, 0, 1)).unwrap();
        // Covered cells are 1x1 themselves
        assert_eq!(
            can_split(&g, CellAddress::new(0, 1)),
            Err(MergeError::NotMerged)
        );
        assert_eq!(
            can_split(&g, CellAddress::new(5, 5)),
            Err(MergeError::OutOfBounds)
        );
    }
}
