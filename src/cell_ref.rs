//! A1-style cell references.
//!
//! Columns are letters (`A`..`Z`, `AA`..), rows are 1-based numbers. `$`
//! anchors are accepted and ignored. Parsed addresses are 0-indexed.

use crate::error::{Result, TableError};
use crate::types::{CellAddress, CellRange};

/// Parse a reference like `"B3"` into `CellAddress { row: 2, col: 1 }`.
pub fn parse_cell_ref(cell_ref: &str) -> Result<CellAddress> {
    let text = cell_ref.trim();
    let invalid = || TableError::CellRef(cell_ref.to_string());

    let mut col: usize = 0;
    let mut row: usize = 0;
    let mut saw_col = false;
    let mut saw_row = false;

    for b in text.bytes() {
        if b == b'$' {
            continue;
        }
        if b.is_ascii_alphabetic() {
            // Letters must precede digits
            if saw_row {
                return Err(invalid());
            }
            let digit = usize::from(b.to_ascii_uppercase() - b'A') + 1;
            col = col
                .checked_mul(26)
                .and_then(|c| c.checked_add(digit))
                .ok_or_else(invalid)?;
            saw_col = true;
        } else if b.is_ascii_digit() {
            row = row
                .checked_mul(10)
                .and_then(|r| r.checked_add(usize::from(b - b'0')))
                .ok_or_else(invalid)?;
            saw_row = true;
        } else {
            return Err(invalid());
        }
    }

    if !saw_col || !saw_row || row == 0 {
        return Err(invalid());
    }
    Ok(CellAddress::new(row - 1, col - 1))
}

/// Parse `"A1:B10"` (or a single `"A1"`) into a normalized range.
pub fn parse_cell_range(range: &str) -> Result<CellRange> {
    let parsed = match range.split_once(':') {
        Some((start, end)) => CellRange::new(parse_cell_ref(start)?, parse_cell_ref(end)?),
        None => CellRange::single(parse_cell_ref(range)?),
    };
    Ok(parsed.normalized())
}

/// Column letters for a 0-indexed column (0 = `A`, 26 = `AA`).
pub fn col_to_letter(col: usize) -> String {
    let mut letters = Vec::new();
    let mut n = col + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(char::from(b'A' + u8::try_from(rem).unwrap_or(0)));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Format an address as A1-style text.
pub fn cell_ref(address: CellAddress) -> String {
    format!("{}{}", col_to_letter(address.col), address.row + 1)
}

/// Format a range as `"A1:B2"`, or `"A1"` for a single cell.
pub fn range_ref(range: CellRange) -> String {
    let range = range.normalized();
    if range.is_single_cell() {
        cell_ref(range.start)
    } else {
        format!("{}:{}", cell_ref(range.start), cell_ref(range.end))
    }
}
