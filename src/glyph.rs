//! The "42" glyph: a permanently walled region carved around.
//!
//! A small bitmap is scaled by the largest integer factor that still leaves
//! `margin` free cells on every side, centered, and every cell under a filled
//! pixel becomes blocked. The carving algorithm never enters blocked cells.
//!
//! ```text
//! #...###      k = 1 on a 9×7 maze, margin 1:
//! #.....#
//! ###.###      .........
//! ..#.#..      .#...###.
//! ..#.###      .#.....#.
//!              .###.###.
//!              ...#.#...
//!              ...#.###.
//!              .........
//! ```
//!
//! Placement depends only on the dimensions and the margin. When the maze is
//! too small the mask is simply empty and generation produces a plain maze.

use crate::grid::{CellSet, Coord};
use log::warn;

/// Upper bound on the glyph scale factor.
pub const MAX_SCALE: usize = 6;

/// A fixed bitmap, one string per row, `#` for a filled pixel.
#[derive(Debug, Clone, Copy)]
pub struct Glyph {
    rows: &'static [&'static str],
}

/// The "42" pattern.
pub const GLYPH_42: Glyph = Glyph {
    rows: &[
        "#...###",
        "#.....#",
        "###.###",
        "..#.#..",
        "..#.###",
    ],
};

impl Glyph {
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, |row| row.len())
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn is_filled(&self, x: usize, y: usize) -> bool {
        self.rows[y].as_bytes()[x] == b'#'
    }
}

/// Where a scaled glyph sits inside the maze.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphPlacement {
    /// Cells per template pixel along each axis.
    pub scale: usize,
    /// Column of the scaled glyph's left edge.
    pub left: usize,
    /// Row of the scaled glyph's top edge.
    pub top: usize,
    /// Scaled width in cells.
    pub width: usize,
    /// Scaled height in cells.
    pub height: usize,
}

/// Compute the placement of `glyph` in a `width × height` maze, keeping at
/// least `margin` free cells on every side.
///
/// Returns `None` when not even scale 1 fits.
pub fn fit(glyph: &Glyph, width: usize, height: usize, margin: usize) -> Option<GlyphPlacement> {
    let (gw, gh) = (glyph.width(), glyph.height());
    if gw == 0 || gh == 0 {
        return None;
    }
    let border = margin.checked_mul(2)?;
    let room_w = width.checked_sub(border)?;
    let room_h = height.checked_sub(border)?;

    let scale = (room_w / gw).min(room_h / gh).min(MAX_SCALE);
    if scale == 0 {
        return None;
    }

    let (pw, ph) = (gw * scale, gh * scale);
    let left = (width - pw) / 2;
    let top = (height - ph) / 2;
    let right = width - left - pw;
    let bottom = height - top - ph;
    if left.min(right).min(top).min(bottom) < margin {
        return None;
    }

    Some(GlyphPlacement {
        scale,
        left,
        top,
        width: pw,
        height: ph,
    })
}

/// The blocked region for one maze, plus where the glyph landed.
#[derive(Debug, Clone)]
pub struct GlyphMask {
    pub blocked: CellSet,
    pub placement: Option<GlyphPlacement>,
}

impl GlyphMask {
    /// Build the "42" mask for a `width × height` maze.
    ///
    /// An empty mask (and a warning) is returned when the glyph cannot fit;
    /// that is not an error.
    pub fn build(width: usize, height: usize, margin: usize) -> Self {
        Self::build_with(&GLYPH_42, width, height, margin)
    }

    pub fn build_with(glyph: &Glyph, width: usize, height: usize, margin: usize) -> Self {
        let mut blocked = CellSet::new(width, height);
        let Some(placement) = fit(glyph, width, height, margin) else {
            warn!(
                "maze too small for the glyph with margin {margin}: need at least {}x{}, got {width}x{height}; generating without it",
                glyph.width().saturating_add(margin.saturating_mul(2)),
                glyph.height().saturating_add(margin.saturating_mul(2)),
            );
            return Self {
                blocked,
                placement: None,
            };
        };

        let k = placement.scale;
        for by in 0..glyph.height() {
            for bx in 0..glyph.width() {
                if !glyph.is_filled(bx, by) {
                    continue;
                }
                for dy in 0..k {
                    for dx in 0..k {
                        blocked.insert(Coord::new(
                            placement.left + bx * k + dx,
                            placement.top + by * k + dy,
                        ));
                    }
                }
            }
        }

        Self {
            blocked,
            placement: Some(placement),
        }
    }

    /// Whether the glyph was placed.
    pub fn is_placed(&self) -> bool {
        self.placement.is_some()
    }
}
