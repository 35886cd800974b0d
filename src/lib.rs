//! # mazegen
//!
//! Generates rectangular *perfect* mazes: exactly one path between any two
//! cells, with a reserved entry and exit, carved around a permanently walled
//! "42" glyph in the middle of the maze.
//!
//! # Pipeline
//!
//! ```text
//! 1. Validate   raw values    →  MazeConfig   (typed, checked configuration)
//! 2. Generate   MazeConfig    →  Grid         (glyph mask + DFS carving)
//! 3. Encode     Grid          →  hex text     (one line per row)
//! ```
//!
//! ```
//! use mazegen::{MazeConfig, MazeEngine};
//!
//! let config = MazeConfig::new(2, 1, (0, 0), (1, 0), "maze.txt", true, Some(1)).unwrap();
//! let mut engine = MazeEngine::new(config);
//! engine.generate(1).unwrap();
//! assert_eq!(engine.to_text().unwrap(), "d7");
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Validation of raw parameters, layered `maze.toml` loading |
//! | [`grid`] | Coordinates, directions, wall-bitmask grid and cell sets |
//! | [`glyph`] | The "42" bitmap and its scaled, centered placement |
//! | [`engine`] | Iterative depth-first carving around the glyph |
//! | [`encode`] | Hex text encoding of a grid |
//! | [`output`] | Output file body and CLI summaries |
//!
//! # Design Decisions
//!
//! ## Wall Bits
//!
//! Every cell is a 4-bit mask, bit0 = North, bit1 = East, bit2 = South,
//! bit3 = West, set = wall. Renderers read the [`Grid`] directly and must use
//! the same order. Opening a passage always clears the bit on both cells, so
//! the two sides of an edge never disagree.
//!
//! ## Explicit Stack
//!
//! The backtracker keeps its path in a `Vec` rather than the call stack, so a
//! 1000×1000 maze is as safe as a 10×10 one.
//!
//! ## Owned Randomness
//!
//! Each [`MazeEngine`] owns its random source, seeded from the config. Two
//! engines never share state, and the same seed reproduces the same maze.
//!
//! ## The Glyph Never Breaks Connectivity
//!
//! The glyph is kept at least one cell away from every border and every open
//! region of its bitmap touches the bitmap's edge, so the cells outside the
//! glyph always form a single connected area that the traversal covers.

pub mod config;
pub mod encode;
pub mod engine;
pub mod glyph;
pub mod grid;
pub mod output;

pub use config::{ConfigError, MazeConfig, RunConfig, ValidationError};
pub use engine::{Generation, MazeEngine, PlacementError};
pub use grid::{Coord, Direction, Grid};

#[cfg(test)]
pub(crate) mod test_helpers;
