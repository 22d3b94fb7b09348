//! Column, row and cell models plus span resolution.
//!
//! [`Grid`] owns the rows (and through them the cells) and keeps the
//! covered-cell index in sync with span data after every structural change.
//! It knows nothing about layout caching or events; [`crate::Table`]
//! coordinates those.

use crate::layout::CoveredCellIndex;
use crate::types::{
    Cell, CellAddress, CellId, Column, ColumnId, Point, Row, RowConfig, RowId, TableConfig,
};

/// Default sizes applied to newly created rows and columns
#[derive(Debug, Clone, Copy)]
pub struct GridDefaults {
    pub column_width: f32,
    pub min_column_width: f32,
    pub min_row_height: f32,
}

impl From<&TableConfig> for GridDefaults {
    fn from(config: &TableConfig) -> Self {
        Self {
            column_width: config.default_column_width,
            min_column_width: config.default_min_column_width,
            min_row_height: config.default_min_row_height,
        }
    }
}

/// Result of resolving an address through the covered-cell index
#[derive(Debug, Clone, Copy)]
pub struct ResolvedCell<'a> {
    /// Address of the returned cell (the span origin when `is_spanned`)
    pub address: CellAddress,
    pub cell: &'a Cell,
    /// True if the requested address is covered by another cell's span
    pub is_spanned: bool,
}

/// The table's columns and rows
#[derive(Debug, Clone)]
pub struct Grid {
    columns: Vec<Column>,
    rows: Vec<Row>,
    covered: CoveredCellIndex,
    defaults: GridDefaults,
    next_id: u64,
}

impl Grid {
    /// Create a `row_count` x `col_count` grid of empty cells. Both counts
    /// are raised to at least 1.
    pub fn new(row_count: usize, col_count: usize, defaults: GridDefaults) -> Self {
        let mut grid = Self {
            columns: Vec::new(),
            rows: Vec::new(),
            covered: CoveredCellIndex::new(),
            defaults,
            next_id: 1,
        };
        for _ in 0..col_count.max(1) {
            let id = ColumnId(grid.alloc_id());
            grid.columns.push(Column::new(
                id,
                defaults.column_width,
                defaults.min_column_width,
            ));
        }
        for _ in 0..row_count.max(1) {
            let row = grid.new_row(RowConfig::default());
            grid.rows.push(row);
        }
        grid
    }

    /// Assemble a grid from already-validated parts.
    pub(crate) fn from_parts(columns: Vec<Column>, rows: Vec<Row>, defaults: GridDefaults) -> Self {
        let max_id = columns
            .iter()
            .map(|c| c.id.0)
            .chain(rows.iter().map(|r| r.id.0))
            .chain(rows.iter().flat_map(|r| r.cells.iter().map(|c| c.id.0)))
            .max()
            .unwrap_or(0);
        let covered = CoveredCellIndex::build(&rows);
        Self {
            columns,
            rows,
            covered,
            defaults,
            next_id: max_id + 1,
        }
    }

    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn new_cell(&mut self) -> Cell {
        Cell::new(CellId(self.alloc_id()))
    }

    fn new_row(&mut self, config: RowConfig) -> Row {
        let cells = (0..self.columns.len()).map(|_| self.new_cell()).collect();
        let id = RowId(self.alloc_id());
        let mut row = Row::new(
            id,
            config.min_height.unwrap_or(self.defaults.min_row_height),
            cells,
        );
        row.explicit_height = config.height;
        row.is_header = config.is_header;
        row
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub(crate) fn row_mut(&mut self, index: usize) -> Option<&mut Row> {
        self.rows.get_mut(index)
    }

    pub(crate) fn column_mut(&mut self, index: usize) -> Option<&mut Column> {
        self.columns.get_mut(index)
    }

    /// Split borrow used by the layout pass.
    pub(crate) fn layout_parts(&mut self) -> (&[Column], &mut [Row], &CoveredCellIndex) {
        (&self.columns, &mut self.rows, &self.covered)
    }

    pub fn defaults(&self) -> GridDefaults {
        self.defaults
    }

    /// The cell stored at `address`, without span resolution.
    pub fn cell(&self, address: CellAddress) -> Option<&Cell> {
        self.rows.get(address.row)?.cell(address.col)
    }

    pub(crate) fn cell_mut(&mut self, address: CellAddress) -> Option<&mut Cell> {
        self.rows.get_mut(address.row)?.cell_mut(address.col)
    }

    pub fn covered(&self) -> &CoveredCellIndex {
        &self.covered
    }

    pub fn contains(&self, address: CellAddress) -> bool {
        address.row < self.rows.len() && address.col < self.columns.len()
    }

    pub(crate) fn rebuild_covered(&mut self) {
        self.covered.rebuild(&self.rows);
    }

    /// Resolve `(row, col)` through the covered-cell index.
    pub fn resolve_cell(&self, row: usize, col: usize) -> Option<ResolvedCell<'_>> {
        let requested = CellAddress::new(row, col);
        if !self.contains(requested) {
            return None;
        }
        let (address, is_spanned) = match self.covered.origin_of(requested) {
            Some(origin) => (origin, true),
            None => (requested, false),
        };
        Some(ResolvedCell {
            address,
            cell: self.cell(address)?,
            is_spanned,
        })
    }

    /// Cell under `point`, resolved to its span origin.
    ///
    /// Linear scan over column widths and calculated row heights.
    pub fn cell_at_point(&self, point: Point) -> Option<CellAddress> {
        if point.x < 0.0 || point.y < 0.0 {
            return None;
        }

        let mut x = 0.0;
        let col = self.columns.iter().position(|column| {
            x += column.width;
            point.x < x
        })?;

        let mut y = 0.0;
        let row = self.rows.iter().position(|row| {
            y += row.calculated_height;
            point.y < y
        })?;

        self.resolve_cell(row, col).map(|resolved| resolved.address)
    }

    /// Insert a column before `index` (clamped to `[0, column_count]`).
    /// Returns the index actually used.
    ///
    /// A span is widened when the new column falls strictly inside it.
    pub fn insert_column(&mut self, index: usize, width: Option<f32>) -> usize {
        let index = index.min(self.columns.len());

        for row in &mut self.rows {
            for (col, cell) in row.cells.iter_mut().enumerate() {
                if col < index && index < col + cell.col_span {
                    cell.col_span += 1;
                }
            }
        }

        let id = ColumnId(self.alloc_id());
        let width = width.unwrap_or(self.defaults.column_width);
        self.columns.insert(
            index,
            Column::new(id, width, self.defaults.min_column_width),
        );
        for row_idx in 0..self.rows.len() {
            let cell = self.new_cell();
            if let Some(row) = self.rows.get_mut(row_idx) {
                row.cells.insert(index.min(row.cells.len()), cell);
            }
        }

        self.after_column_change();
        index
    }

    /// Remove the column at `index` (clamped to `[0, column_count - 1]`).
    /// Refused when only one column remains. Returns the removed index.
    ///
    /// Spans crossing the column shrink; a span whose origin sits in the
    /// removed column moves its origin (and content) one column right.
    pub fn remove_column(&mut self, index: usize) -> Option<usize> {
        if self.columns.len() <= 1 {
            return None;
        }
        let index = index.min(self.columns.len() - 1);

        for row in &mut self.rows {
            for (col, cell) in row.cells.iter_mut().enumerate() {
                if col < index && index < col + cell.col_span {
                    cell.col_span -= 1;
                }
            }
            let moved = row
                .cells
                .get(index)
                .filter(|cell| cell.col_span > 1)
                .cloned();
            if let Some(mut origin) = moved {
                origin.col_span -= 1;
                origin.invalidate_measure();
                if let Some(slot) = row.cells.get_mut(index + 1) {
                    *slot = origin;
                }
            }
            if index < row.cells.len() {
                row.cells.remove(index);
            }
        }
        self.columns.remove(index);

        self.after_column_change();
        Some(index)
    }

    /// Insert a row before `index` (clamped to `[0, row_count]`).
    /// Returns the index actually used.
    pub fn insert_row(&mut self, index: usize, config: Option<RowConfig>) -> usize {
        let index = index.min(self.rows.len());

        for (row_idx, row) in self.rows.iter_mut().enumerate() {
            if row_idx >= index {
                break;
            }
            for cell in &mut row.cells {
                if index < row_idx + cell.row_span {
                    cell.row_span += 1;
                    cell.invalidate_measure();
                }
            }
        }

        let row = self.new_row(config.unwrap_or_default());
        self.rows.insert(index, row);
        self.rebuild_covered();
        index
    }

    /// Remove the row at `index` (clamped to `[0, row_count - 1]`).
    /// Refused when only one row remains. Returns the removed index.
    ///
    /// Spans crossing the row shrink; a span whose origin sits in the removed
    /// row moves its origin (and content) one row down.
    pub fn remove_row(&mut self, index: usize) -> Option<usize> {
        if self.rows.len() <= 1 {
            return None;
        }
        let index = index.min(self.rows.len() - 1);

        for (row_idx, row) in self.rows.iter_mut().enumerate() {
            if row_idx >= index {
                break;
            }
            for cell in &mut row.cells {
                if index < row_idx + cell.row_span {
                    cell.row_span -= 1;
                    cell.invalidate_measure();
                }
            }
        }

        let moved: Vec<(usize, Cell)> = self
            .rows
            .get(index)
            .map(|row| {
                row.cells
                    .iter()
                    .enumerate()
                    .filter(|(_, cell)| cell.row_span > 1)
                    .map(|(col, cell)| (col, cell.clone()))
                    .collect()
            })
            .unwrap_or_default();
        for (col, mut origin) in moved {
            origin.row_span -= 1;
            origin.invalidate_measure();
            if let Some(slot) = self.cell_mut(CellAddress::new(index + 1, col)) {
                *slot = origin;
            }
        }

        self.rows.remove(index);
        self.rebuild_covered();
        Some(index)
    }

    /// Set a column's width, clamped to its minimum. Returns the applied
    /// width, or `None` if the index is out of range.
    pub fn set_column_width(&mut self, index: usize, width: f32) -> Option<f32> {
        let applied = self.columns.get_mut(index)?.set_width(width);
        self.invalidate_column(index);
        Some(applied)
    }

    /// Forget measurements of every cell whose span touches column `index`.
    pub(crate) fn invalidate_column(&mut self, index: usize) {
        for row in &mut self.rows {
            for (col, cell) in row.cells.iter_mut().enumerate() {
                if col <= index && index < col + cell.col_span {
                    cell.invalidate_measure();
                }
            }
        }
    }

    fn after_column_change(&mut self) {
        for row in &mut self.rows {
            row.invalidate_measure();
        }
        self.rebuild_covered();
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

    fn defaults() -> GridDefaults {
        GridDefaults {
            column_width: 50.0,
            min_column_width: 10.0,
            min_row_height: 20.0,
        }
    }

    fn span(grid: &mut Grid, row: usize, col: usize, rows: usize, cols: usize) {
        let cell = grid.cell_mut(CellAddress::new(row, col)).unwrap();
        cell.row_span = rows;
        cell.col_span = cols;
        grid.rebuild_covered();
    }

    #[test]
    fn new_grid_has_at_least_one_row_and_column() {
        let grid = Grid::new(0, 0, defaults());
        assert_eq!(grid.row_count(), 1);
        assert_eq!(grid.column_count(), 1);
    }

    #[test]
    fn ids_are_unique() {
        let grid = Grid::new(3, 3, defaults());
        let mut ids: Vec<u64> = grid
            .rows()
            .iter()
            .flat_map(|r| r.cells.iter().map(|c| c.id.0))
            .chain(grid.columns().iter().map(|c| c.id.0))
            .chain(grid.rows().iter().map(|r| r.id.0))
            .collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn insert_indices_are_clamped() {
        let mut grid = Grid::new(2, 2, defaults());
        assert_eq!(grid.insert_row(99, None), 2);
        assert_eq!(grid.insert_column(99, Some(70.0)), 2);
        assert_eq!(grid.row_count(), 3);
        assert_eq!(grid.column_count(), 3);
        assert_eq!(grid.columns()[2].width, 70.0);
        assert!(grid.rows().iter().all(|r| r.cells.len() == 3));
    }

    #[test]
    fn removal_refused_at_one() {
        let mut grid = Grid::new(1, 1, defaults());
        assert_eq!(grid.remove_row(0), None);
        assert_eq!(grid.remove_column(0), None);
        assert_eq!(grid.row_count(), 1);
        assert_eq!(grid.column_count(), 1);
    }

    #[test]
    fn remove_index_is_clamped() {
        let mut grid = Grid::new(3, 3, defaults());
        assert_eq!(grid.remove_row(10), Some(2));
        assert_eq!(grid.remove_column(10), Some(2));
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.column_count(), 2);
    }

    #[test]
    fn insert_inside_span_grows_it() {
        let mut grid = Grid::new(3, 3, defaults());
        span(&mut grid, 0, 0, 2, 2);

        grid.insert_row(1, None);
        grid.insert_column(1, None);
        let origin = grid.cell(CellAddress::new(0, 0)).unwrap();
        assert_eq!((origin.row_span, origin.col_span), (3, 3));
        assert_eq!(grid.covered().len(), 8);
    }

    #[test]
    fn insert_at_span_edges_leaves_it() {
        let mut grid = Grid::new(3, 3, defaults());
        span(&mut grid, 1, 1, 2, 2);

        grid.insert_row(1, None);
        grid.insert_column(3, None);
        let origin = grid.cell(CellAddress::new(2, 1)).unwrap();
        assert_eq!((origin.row_span, origin.col_span), (2, 2));
        assert_eq!(
            grid.covered().origin_of(CellAddress::new(3, 2)),
            Some(CellAddress::new(2, 1))
        );
    }

    #[test]
    fn removing_origin_row_moves_span_down() {
        let mut grid = Grid::new(3, 2, defaults());
        grid.cell_mut(CellAddress::new(0, 0)).unwrap().set_content("origin".into());
        span(&mut grid, 0, 0, 3, 1);

        grid.remove_row(0);
        let origin = grid.cell(CellAddress::new(0, 0)).unwrap();
        assert_eq!(origin.row_span, 2);
        assert_eq!(origin.content().text, "origin");
        assert_eq!(
            grid.covered().origin_of(CellAddress::new(1, 0)),
            Some(CellAddress::new(0, 0))
        );
    }

    #[test]
    fn removing_origin_column_moves_span_right() {
        let mut grid = Grid::new(2, 3, defaults());
        grid.cell_mut(CellAddress::new(0, 0)).unwrap().set_content("origin".into());
        span(&mut grid, 0, 0, 1, 2);

        grid.remove_column(0);
        let origin = grid.cell(CellAddress::new(0, 0)).unwrap();
        assert!(!origin.is_spanning());
        assert_eq!(origin.content().text, "origin");
        assert!(grid.covered().is_empty());
    }

    #[test]
    fn removing_inner_row_shrinks_span() {
        let mut grid = Grid::new(4, 1, defaults());
        span(&mut grid, 0, 0, 3, 1);
        grid.remove_row(1);
        assert_eq!(grid.cell(CellAddress::new(0, 0)).unwrap().row_span, 2);
        assert_eq!(grid.covered().len(), 1);
    }

    #[test]
    fn resolve_cell_follows_index() {
        let mut grid = Grid::new(3, 3, defaults());
        span(&mut grid, 0, 0, 2, 2);

        let resolved = grid.resolve_cell(1, 1).unwrap();
        assert!(resolved.is_spanned);
        assert_eq!(resolved.address, CellAddress::new(0, 0));

        let resolved = grid.resolve_cell(2, 2).unwrap();
        assert!(!resolved.is_spanned);
        assert_eq!(resolved.address, CellAddress::new(2, 2));

        assert!(grid.resolve_cell(3, 0).is_none());
    }

    #[test]
    fn cell_at_point_scans_bands() {
        let mut grid = Grid::new(2, 3, defaults());
        span(&mut grid, 0, 1, 2, 2);
        // Rows default to their min height before the first layout
        assert_eq!(
            grid.cell_at_point(Point::new(10.0, 5.0)),
            Some(CellAddress::new(0, 0))
        );
        assert_eq!(
            grid.cell_at_point(Point::new(120.0, 30.0)),
            Some(CellAddress::new(0, 1))
        );
        assert_eq!(grid.cell_at_point(Point::new(150.0, 5.0)), None);
        assert_eq!(grid.cell_at_point(Point::new(10.0, 40.0)), None);
        assert_eq!(grid.cell_at_point(Point::new(-1.0, 5.0)), None);
    }

    #[test]
    fn column_width_is_clamped() {
        let mut grid = Grid::new(1, 2, defaults());
        assert_eq!(grid.set_column_width(0, 3.0), Some(10.0));
        assert_eq!(grid.set_column_width(5, 30.0), None);
    }
}
