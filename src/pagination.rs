//! Splits a laid-out table into page slices with repeating header rows.

use crate::types::{TablePageLayout, TablePageSlice};

/// Plan page slices for rows with the given calculated heights.
///
/// Every page reserves the total header height up front; header rows are
/// not counted against the remaining budget because they are painted at the
/// top of each page. Rows are added greedily while they fit. A page that
/// fits no row at all still takes exactly one non-header row, so planning
/// always terminates; header rows right after that row join its page.
///
/// The slices' `[start_row, end_row)` ranges partition `[0, row_count)`.
pub fn calculate_page_layout(
    row_heights: &[f32],
    header_flags: &[bool],
    available_height_first_page: f32,
    available_height_other_pages: f32,
) -> TablePageLayout {
    let _span = tracing::debug_span!(
        "calculate_page_layout",
        rows = row_heights.len(),
        first = available_height_first_page,
        other = available_height_other_pages
    )
    .entered();

    let is_header = |row: usize| header_flags.get(row).copied().unwrap_or(false);
    let height_of = |row: usize| row_heights.get(row).copied().unwrap_or(0.0);
    let row_count = row_heights.len();

    let header_row_indices: Vec<usize> = (0..row_count).filter(|&r| is_header(r)).collect();
    let header_height: f32 = header_row_indices.iter().map(|&r| height_of(r)).sum();
    let total_height: f32 = row_heights.iter().sum();

    let mut row_positions = Vec::with_capacity(row_count);
    let mut y = 0.0;
    for height in row_heights {
        row_positions.push(y);
        y += height;
    }
    let y_of = |row: usize| row_positions.get(row).copied().unwrap_or(total_height);

    let mut slices = Vec::new();

    if total_height <= available_height_first_page {
        slices.push(TablePageSlice {
            start_row: 0,
            end_row: row_count,
            is_continuation: false,
            height: total_height,
            y_offset: 0.0,
        });
        return TablePageLayout {
            slices,
            total_height,
            header_height,
            header_row_indices,
        };
    }

    let mut cursor = 0;
    while cursor < row_count {
        let is_continuation = !slices.is_empty();
        let available = if is_continuation {
            available_height_other_pages
        } else {
            available_height_first_page
        };
        let budget = available - header_height;
        let start_row = cursor;
        let mut used = 0.0;
        let mut data_rows = 0;

        while cursor < row_count {
            if is_header(cursor) {
                cursor += 1;
                continue;
            }
            let height = height_of(cursor);
            if used + height > budget {
                break;
            }
            used += height;
            cursor += 1;
            data_rows += 1;
        }

        if data_rows == 0 && cursor < row_count {
            tracing::debug!(row = cursor, "row taller than page, forcing onto its own page");
            used += height_of(cursor);
            cursor += 1;
            // Trailing header rows stay on this page instead of starting an empty one
            while cursor < row_count && is_header(cursor) {
                cursor += 1;
            }
        }

        slices.push(TablePageSlice {
            start_row,
            end_row: cursor,
            is_continuation,
            height: used + header_height,
            y_offset: y_of(start_row),
        });
    }

    tracing::debug!(pages = slices.len(), "page layout planned");
    TablePageLayout {
        slices,
        total_height,
        header_height,
        header_row_indices,
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

    fn ranges(layout: &TablePageLayout) -> Vec<(usize, usize)> {
        layout
            .slices
            .iter()
            .map(|s| (s.start_row, s.end_row))
            .collect()
    }

    #[test]
    fn table_fitting_first_page_is_one_slice() {
        let layout = calculate_page_layout(&[30.0; 3], &[false; 3], 90.0, 50.0);
        assert_eq!(ranges(&layout), vec![(0, 3)]);
        assert!(!layout.slices[0].is_continuation);
        assert_eq!(layout.total_height, 90.0);
    }

    #[test]
    fn ten_rows_of_thirty() {
        let layout = calculate_page_layout(&[30.0; 10], &[false; 10], 100.0, 90.0);
        assert_eq!(ranges(&layout), vec![(0, 3), (3, 6), (6, 9), (9, 10)]);
        assert!(layout.slices[1..].iter().all(|s| s.is_continuation));
        assert_eq!(layout.slices[1].y_offset, 90.0);
        assert_eq!(layout.slices.last().unwrap().end_row, 10);
    }

    #[test]
    fn header_height_is_reserved_on_every_page() {
        let mut flags = [false; 8];
        flags[0] = true;
        let layout = calculate_page_layout(&[20.0; 8], &flags, 70.0, 70.0);
        assert_eq!(layout.header_row_indices, vec![0]);
        assert_eq!(layout.header_height, 20.0);
        // 50 for data rows per page => two rows each
        assert_eq!(ranges(&layout), vec![(0, 3), (3, 5), (5, 7), (7, 8)]);
        assert_eq!(layout.slices[1].height, 60.0);
    }

    #[test]
    fn oversized_row_is_forced_onto_a_page() {
        let layout = calculate_page_layout(&[10.0, 500.0, 10.0], &[false; 3], 100.0, 100.0);
        assert_eq!(ranges(&layout), vec![(0, 1), (1, 2), (2, 3)]);
        assert_eq!(layout.slices[1].height, 500.0);
    }

    #[test]
    fn headers_after_forced_row_stay_on_its_page() {
        let layout = calculate_page_layout(&[10.0, 500.0, 10.0], &[false, false, true], 100.0, 100.0);
        assert_eq!(ranges(&layout), vec![(0, 1), (1, 3)]);
        assert_eq!(layout.slices[1].height, 510.0);
    }

    #[test]
    fn headers_taller_than_page_still_progress() {
        let flags = [true, false, false];
        let layout = calculate_page_layout(&[200.0, 10.0, 10.0], &flags, 100.0, 100.0);
        assert_eq!(ranges(&layout), vec![(0, 2), (2, 3)]);
    }
}
