//! Shared structural assertions for the mazegen test suite.
//!
//! These check the properties every finished maze must have, independent of
//! the random source:
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let mut engine = MazeEngine::new(config);
//! engine.generate(1).unwrap();
//! assert_perfect(engine.grid().unwrap(), engine.blocked(), entry);
//! ```

use std::collections::VecDeque;

use crate::grid::{ALL_WALLS, CellSet, Coord, Direction, Grid};

// =========================================================================
// Measurements
// =========================================================================

/// Count open edges between adjacent cells. Each edge is counted once, from
/// its west or north cell.
pub fn open_edges(grid: &Grid) -> usize {
    grid.coords()
        .map(|c| {
            [Direction::East, Direction::South]
                .into_iter()
                .filter(|&side| grid.neighbor(c, side).is_some() && !grid.has_wall(c, side))
                .count()
        })
        .sum()
}

/// Cells reachable from `start` through open walls.
pub fn reachable(grid: &Grid, start: Coord) -> CellSet {
    let mut seen = CellSet::new(grid.width(), grid.height());
    let mut queue = VecDeque::from([start]);
    seen.insert(start);
    while let Some(cell) = queue.pop_front() {
        for side in Direction::ALL {
            if grid.has_wall(cell, side) {
                continue;
            }
            if let Some(next) = grid.neighbor(cell, side) {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
    }
    seen
}

// =========================================================================
// Assertions (panic with a clear message on failure)
// =========================================================================

/// Every shared edge has the same state on both sides.
pub fn assert_coherent(grid: &Grid) {
    for c in grid.coords() {
        for side in Direction::ALL {
            if let Some(n) = grid.neighbor(c, side) {
                assert_eq!(
                    grid.has_wall(c, side),
                    grid.has_wall(n, side.opposite()),
                    "incoherent wall between {c} and {n} ({side:?})"
                );
            }
        }
    }
}

/// Blocked cells are fully walled and so are the sides facing them.
pub fn assert_glyph_sealed(grid: &Grid, blocked: &CellSet) {
    for c in blocked.iter() {
        assert_eq!(grid.get(c), ALL_WALLS, "blocked cell {c} is not sealed");
        for side in Direction::ALL {
            if let Some(n) = grid.neighbor(c, side) {
                assert!(
                    grid.has_wall(n, side.opposite()),
                    "cell {n} is open towards blocked cell {c}"
                );
            }
        }
    }
}

/// The open edges form a spanning tree over every non-blocked cell,
/// containing `entry`.
pub fn assert_perfect(grid: &Grid, blocked: &CellSet, entry: Coord) {
    assert_coherent(grid);
    assert_glyph_sealed(grid, blocked);

    let open_cells = grid.width() * grid.height() - blocked.len();
    let reached = reachable(grid, entry);
    assert_eq!(
        reached.len(),
        open_cells,
        "only {} of {open_cells} open cells reachable from {entry}",
        reached.len()
    );
    assert!(
        reached.iter().all(|c| !blocked.contains(c)),
        "traversal entered the glyph"
    );
    assert_eq!(
        open_edges(grid),
        open_cells - 1,
        "edge count does not match a spanning tree"
    );
}
