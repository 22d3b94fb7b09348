//! Covered-cell index: every address inside a merged span (other than the
//! origin) mapped to the span's origin.

use std::collections::HashMap;

use crate::types::{CellAddress, CellRange, Row};

/// Derived lookup table from covered addresses to their span origin.
///
/// Rebuilt from the rows whenever spans or grid dimensions change; never
/// edited incrementally.
#[derive(Debug, Clone, Default)]
pub struct CoveredCellIndex {
    covered: HashMap<CellAddress, CellAddress>,
}

impl CoveredCellIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index for `rows`.
    pub fn build(rows: &[Row]) -> Self {
        let mut index = Self::new();
        index.rebuild(rows);
        index
    }

    /// Recompute the mapping from the span data on `rows`.
    pub fn rebuild(&mut self, rows: &[Row]) {
        self.covered.clear();
        for (row_idx, row) in rows.iter().enumerate() {
            for (col_idx, cell) in row.cells.iter().enumerate() {
                if !cell.is_spanning() {
                    continue;
                }
                let origin = CellAddress::new(row_idx, col_idx);
                let span = CellRange::spanning(origin, cell.row_span, cell.col_span);
                for address in span.addresses() {
                    if address == origin {
                        continue;
                    }
                    let previous = self.covered.insert(address, origin);
                    debug_assert!(
                        previous.is_none(),
                        "spans overlap at {address:?}: {previous:?} and {origin:?}"
                    );
                    debug_assert!(
                        rows.get(address.row)
                            .and_then(|r| r.cell(address.col))
                            .is_some_and(|c| !c.is_spanning()),
                        "covered cell {address:?} is missing or spanning"
                    );
                }
            }
        }
        tracing::trace!(covered = self.covered.len(), "covered-cell index rebuilt");
    }

    /// Origin of the span covering `address`, if `address` is covered.
    pub fn origin_of(&self, address: CellAddress) -> Option<CellAddress> {
        self.covered.get(&address).copied()
    }

    pub fn is_covered(&self, address: CellAddress) -> bool {
        self.covered.contains_key(&address)
    }

    pub fn len(&self) -> usize {
        self.covered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.covered.is_empty()
    }

    /// All `(covered, origin)` pairs, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (CellAddress, CellAddress)> + '_ {
        self.covered.iter().map(|(covered, origin)| (*covered, *origin))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::types::{Cell, CellId, RowId};

    fn grid(rows: usize, cols: usize) -> Vec<Row> {
        (0..rows)
            .map(|r| {
                let cells = (0..cols)
                    .map(|c| Cell::new(CellId((r * cols + c) as u64)))
                    .collect();
                Row::new(RowId(r as u64), 20.0, cells)
            })
            .collect()
    }

    #[test]
    fn maps_every_covered_address_to_origin() {
        let mut rows = grid(3, 3);
        rows[1].cells[1].row_span = 2;
        rows[1].cells[1].col_span = 2;

        let index = CoveredCellIndex::build(&rows);
        assert_eq!(index.len(), 3);
        let origin = CellAddress::new(1, 1);
        assert_eq!(index.origin_of(CellAddress::new(1, 2)), Some(origin));
        assert_eq!(index.origin_of(CellAddress::new(2, 1)), Some(origin));
        assert_eq!(index.origin_of(CellAddress::new(2, 2)), Some(origin));
        assert!(!index.is_covered(origin));
        assert!(!index.is_covered(CellAddress::new(0, 0)));
    }

    #[test]
    fn rebuild_forgets_removed_spans() {
        let mut rows = grid(2, 2);
        rows[0].cells[0].col_span = 2;
        let mut index = CoveredCellIndex::build(&rows);
        assert_eq!(index.len(), 1);

        rows[0].cells[0].reset_span();
        index.rebuild(&rows);
        assert!(index.is_empty());
    }
}
