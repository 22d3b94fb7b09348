use serde::{Deserialize, Serialize};

/// 0-based cell coordinates.
///
/// Used directly as a hash key, so lookups never allocate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct CellAddress {
    pub row: usize,
    pub col: usize,
}

impl CellAddress {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Rectangular range of cells, inclusive on both corners.
///
/// Corners may be given in any order; [`CellRange::normalized`] puts the
/// top-left corner in `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRange {
    pub start: CellAddress,
    pub end: CellAddress,
}

impl CellRange {
    pub fn new(start: CellAddress, end: CellAddress) -> Self {
        Self { start, end }
    }

    /// Range from `(start_row, start_col)` to `(end_row, end_col)`.
    pub fn from_coords(start_row: usize, start_col: usize, end_row: usize, end_col: usize) -> Self {
        Self::new(
            CellAddress::new(start_row, start_col),
            CellAddress::new(end_row, end_col),
        )
    }

    /// Range covering a single cell.
    pub fn single(address: CellAddress) -> Self {
        Self::new(address, address)
    }

    /// Range covering a span rectangle anchored at `origin`.
    pub fn spanning(origin: CellAddress, row_span: usize, col_span: usize) -> Self {
        Self::new(
            origin,
            CellAddress::new(
                origin.row + row_span.max(1) - 1,
                origin.col + col_span.max(1) - 1,
            ),
        )
    }

    pub fn normalized(&self) -> Self {
        Self::from_coords(
            self.start.row.min(self.end.row),
            self.start.col.min(self.end.col),
            self.start.row.max(self.end.row),
            self.start.col.max(self.end.col),
        )
    }

    /// Number of rows (for a normalized range).
    pub fn row_count(&self) -> usize {
        self.end.row.saturating_sub(self.start.row) + 1
    }

    /// Number of columns (for a normalized range).
    pub fn col_count(&self) -> usize {
        self.end.col.saturating_sub(self.start.col) + 1
    }

    pub fn is_single_cell(&self) -> bool {
        self.start == self.end
    }

    /// Containment test; expects a normalized range.
    pub fn contains(&self, address: CellAddress) -> bool {
        address.row >= self.start.row
            && address.row <= self.end.row
            && address.col >= self.start.col
            && address.col <= self.end.col
    }

    /// True when `other` lies entirely inside `self` (both normalized).
    pub fn contains_range(&self, other: &CellRange) -> bool {
        self.contains(other.start) && self.contains(other.end)
    }

    /// Smallest range covering both (both normalized).
    pub fn union(&self, other: &CellRange) -> Self {
        Self::from_coords(
            self.start.row.min(other.start.row),
            self.start.col.min(other.start.col),
            self.end.row.max(other.end.row),
            self.end.col.max(other.end.col),
        )
    }

    /// Row-major iteration over every address; expects a normalized range.
    pub fn addresses(&self) -> impl Iterator<Item = CellAddress> {
        let (start, end) = (self.start, self.end);
        (start.row..=end.row)
            .flat_map(move |row| (start.col..=end.col).map(move |col| CellAddress::new(row, col)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn normalize_swaps_corners() {
        let range = CellRange::from_coords(3, 4, 1, 0).normalized();
        assert_eq!(range.start, CellAddress::new(1, 0));
        assert_eq!(range.end, CellAddress::new(3, 4));
        assert_eq!(range.row_count(), 3);
        assert_eq!(range.col_count(), 5);
    }

    #[test]
    fn addresses_are_row_major() {
        let cells: Vec<_> = CellRange::from_coords(0, 0, 1, 1).addresses().collect();
        assert_eq!(
            cells,
            vec![
                CellAddress::new(0, 0),
                CellAddress::new(0, 1),
                CellAddress::new(1, 0),
                CellAddress::new(1, 1),
            ]
        );
    }

    #[test]
    fn spanning_range_covers_span() {
        let range = CellRange::spanning(CellAddress::new(2, 1), 2, 3);
        assert_eq!(range.end, CellAddress::new(3, 3));
        assert!(range.contains(CellAddress::new(3, 2)));
        assert!(!range.contains(CellAddress::new(4, 1)));
    }
}
