//! Hex text encoding of a finished grid.
//!
//! One line per row, one lowercase hex digit per cell, no separators. A 3×2
//! maze carved as a single snake from the top-left corner:
//!
//! ```text
//! ┌─────────┐
//! │         │      d53
//! ├──────   │      d56
//! │         │
//! └─────────┘
//! ```
//!
//! Rows are joined with `\n` and there is no trailing newline.

use crate::grid::Grid;

/// Encode `grid` row by row.
pub fn encode(grid: &Grid) -> String {
    grid.rows()
        .map(|row| row.iter().map(|&mask| hex_digit(mask)).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn hex_digit(mask: u8) -> char {
    // Masks are four bits, so this never falls back.
    char::from_digit(u32::from(mask & 0x0f), 16).unwrap_or('f')
}
