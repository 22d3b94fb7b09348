//! Binary search over cached row geometry for render culling.
//!
//! `positions` must be monotonically non-decreasing with `heights` parallel to
//! it, which the layout engine guarantees for a fresh cache. A stale cache
//! only produces wrong culling; painting never mutates table data.

/// First row whose bottom edge is at or after `y`.
pub fn first_row_ending_at_or_after(positions: &[f32], heights: &[f32], y: f32) -> Option<usize> {
    let len = positions.len().min(heights.len());
    let bottom = |i: usize| -> f32 {
        positions.get(i).copied().unwrap_or(0.0) + heights.get(i).copied().unwrap_or(0.0)
    };

    let (mut lo, mut hi) = (0, len);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if bottom(mid) < y {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    (lo < len).then_some(lo)
}

/// Last row whose top edge is at or before `y`.
pub fn last_row_starting_at_or_before(positions: &[f32], y: f32) -> Option<usize> {
    let (mut lo, mut hi) = (0, positions.len());
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if positions.get(mid).copied().unwrap_or(f32::INFINITY) <= y {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo.checked_sub(1)
}

/// Inclusive range of rows intersecting the band `[y, y + height]`, or `None`
/// if the band lies entirely above or below the table.
pub fn visible_row_range(
    positions: &[f32],
    heights: &[f32],
    y: f32,
    height: f32,
) -> Option<(usize, usize)> {
    let first = first_row_ending_at_or_after(positions, heights, y)?;
    let last = last_row_starting_at_or_before(positions, y + height)?;
    (first <= last).then_some((first, last))
}
