//! Maze generation: iterative depth-first carving (recursive backtracker).
//!
//! The engine owns the wall grid, the visited set and the blocked set. Each
//! call to [`MazeEngine::generate`] rebuilds all three from scratch:
//!
//! ```text
//! 1. reset grid (all walls) + visited set, build the glyph mask
//! 2. reject entry/exit inside the glyph
//! 3. carve from the entry with an explicit stack:
//!      peek top → collect unvisited, unblocked neighbors (N, E, S, W)
//!      none      → pop (backtrack)
//!      otherwise → shuffle, take the first, open the shared wall, push it
//! 4. seal the glyph: blocked cells back to 15, facing walls of their
//!    neighbors forced closed
//! ```
//!
//! The explicit stack keeps arbitrarily large grids safe from recursion
//! limits. The random source is owned by the engine and only drives the
//! neighbor shuffle, so a seeded engine always yields the same grid.

use crate::config::MazeConfig;
use crate::encode;
use crate::glyph::{GlyphMask, GlyphPlacement};
use crate::grid::{ALL_WALLS, CellSet, Coord, Direction, Grid};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use thiserror::Error;

/// Smallest glyph margin the engine will use. With no free ring around the
/// glyph, open template pixels on the border can be cut off from the rest of
/// the maze.
pub const MIN_MARGIN: usize = 1;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlacementError {
    #[error("entry {0} lies inside the glyph region")]
    EntryInsideGlyph(Coord),
    #[error("exit {0} lies inside the glyph region")]
    ExitInsideGlyph(Coord),
}

/// Build the glyph mask for `config` and make sure neither endpoint falls
/// inside it. Margins below [`MIN_MARGIN`] are raised, as in
/// [`MazeEngine::generate`].
pub fn check_placement(config: &MazeConfig, margin: usize) -> Result<GlyphMask, PlacementError> {
    let mask = GlyphMask::build(config.width(), config.height(), margin.max(MIN_MARGIN));
    if mask.blocked.contains(config.entry()) {
        return Err(PlacementError::EntryInsideGlyph(config.entry()));
    }
    if mask.blocked.contains(config.exit()) {
        return Err(PlacementError::ExitInsideGlyph(config.exit()));
    }
    Ok(mask)
}

/// Summary of a successful generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    /// Where the glyph was placed, `None` if the maze was too small.
    pub glyph: Option<GlyphPlacement>,
    /// Margin actually used for the glyph.
    pub margin: usize,
    /// Cells entered by the traversal.
    pub visited: usize,
    /// Cells excluded by the glyph.
    pub blocked: usize,
    /// Passages opened. Always `visited - 1`.
    pub passages: usize,
}

/// Owns the maze state and the random source for one configuration.
pub struct MazeEngine<R = StdRng> {
    config: MazeConfig,
    rng: R,
    grid: Grid,
    visited: CellSet,
    blocked: CellSet,
    generated: bool,
}

impl MazeEngine<StdRng> {
    /// Engine seeded from the config's seed, or from OS entropy if none is set.
    pub fn new(config: MazeConfig) -> Self {
        let rng = match config.seed() {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> MazeEngine<R> {
    /// Engine driven by the given random source.
    pub fn with_rng(config: MazeConfig, rng: R) -> Self {
        let (w, h) = (config.width(), config.height());
        Self {
            config,
            rng,
            grid: Grid::new(w, h),
            visited: CellSet::new(w, h),
            blocked: CellSet::new(w, h),
            generated: false,
        }
    }

    pub fn config(&self) -> &MazeConfig {
        &self.config
    }

    /// Carve a new maze, replacing any previous one.
    ///
    /// Fails if the entry or the exit falls inside the glyph; the engine then
    /// holds no maze until the next successful call.
    pub fn generate(&mut self, margin: usize) -> Result<Generation, PlacementError> {
        let (w, h) = (self.config.width(), self.config.height());
        let margin = if margin < MIN_MARGIN {
            warn!("glyph margin {margin} raised to {MIN_MARGIN}");
            MIN_MARGIN
        } else {
            margin
        };

        self.generated = false;
        self.grid = Grid::new(w, h);
        self.visited = CellSet::new(w, h);
        self.blocked = CellSet::new(w, h);
        let mask = check_placement(&self.config, margin)?;
        self.blocked = mask.blocked;

        if !self.config.perfect() {
            debug!("perfect = false has no effect; generating a perfect maze");
        }

        let passages = self.carve(self.config.entry());
        self.seal_blocked();
        self.generated = true;

        let generation = Generation {
            glyph: mask.placement,
            margin,
            visited: self.visited.len(),
            blocked: self.blocked.len(),
            passages,
        };
        info!(
            "generated {w}x{h} maze: {} cells carved, {} blocked",
            generation.visited, generation.blocked
        );
        Ok(generation)
    }

    /// The finished grid, `None` until a `generate` call has succeeded.
    pub fn grid(&self) -> Option<&Grid> {
        self.generated.then_some(&self.grid)
    }

    /// Hex encoding of the finished grid.
    pub fn to_text(&self) -> Option<String> {
        self.grid().map(encode::encode)
    }

    /// Cells reserved by the glyph in the last `generate` call.
    pub fn blocked(&self) -> &CellSet {
        &self.blocked
    }

    /// Depth-first carve from `start`. Returns the number of passages opened.
    fn carve(&mut self, start: Coord) -> usize {
        let mut passages = 0;
        self.visited.insert(start);
        let mut stack = vec![start];

        while let Some(&current) = stack.last() {
            let mut candidates = self.candidates(current);
            if candidates.is_empty() {
                stack.pop();
                continue;
            }
            candidates.shuffle(&mut self.rng);
            let (side, next) = candidates[0];

            self.grid.open(current, side);
            self.visited.insert(next);
            stack.push(next);
            passages += 1;
        }

        passages
    }

    /// In-bounds neighbors of `cell` that are neither visited nor blocked,
    /// in N, E, S, W order.
    fn candidates(&self, cell: Coord) -> Vec<(Direction, Coord)> {
        Direction::ALL
            .into_iter()
            .filter_map(|side| self.grid.neighbor(cell, side).map(|n| (side, n)))
            .filter(|(_, n)| !self.visited.contains(*n) && !self.blocked.contains(*n))
            .collect()
    }

    /// Make the glyph boundary solid from both sides.
    fn seal_blocked(&mut self) {
        for cell in self.blocked.iter() {
            self.grid.set(cell, ALL_WALLS);
            for side in Direction::ALL {
                if let Some(n) = self.grid.neighbor(cell, side) {
                    if !self.blocked.contains(n) {
                        self.grid.close(n, side.opposite());
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    fn config(w: i64, h: i64, entry: (i64, i64), exit: (i64, i64), seed: u64) -> MazeConfig {
        MazeConfig::new(w, h, entry, exit, "maze.txt", true, Some(seed)).unwrap()
    }

    #[test]
    fn two_by_one_opens_the_only_edge() {
        let mut engine = MazeEngine::new(config(2, 1, (0, 0), (1, 0), 0));
        let generation = engine.generate(1).unwrap();
        assert_eq!(generation.glyph, None);
        let grid = engine.grid().unwrap();
        assert_eq!(grid.get(Coord::new(0, 0)), 13);
        assert_eq!(grid.get(Coord::new(1, 0)), 7);
        assert_eq!(engine.to_text().unwrap(), "d7");
    }

    #[test]
    fn one_by_two_opens_the_vertical_edge() {
        let mut engine = MazeEngine::new(config(1, 2, (0, 0), (0, 1), 0));
        engine.generate(1).unwrap();
        assert_eq!(engine.to_text().unwrap(), "b\ne");
    }

    #[test]
    fn grid_is_unavailable_before_generate() {
        let engine = MazeEngine::new(config(4, 4, (0, 0), (3, 3), 1));
        assert!(engine.grid().is_none());
        assert!(engine.to_text().is_none());
    }

    #[test]
    fn plain_maze_is_a_spanning_tree() {
        for seed in 0..20 {
            let mut engine = MazeEngine::new(config(8, 6, (0, 0), (7, 5), seed));
            let generation = engine.generate(1).unwrap();
            assert_eq!(generation.visited, 48);
            assert_eq!(generation.passages, 47);
            assert_perfect(engine.grid().unwrap(), engine.blocked(), Coord::new(0, 0));
        }
    }

    #[test]
    fn glyph_maze_is_a_spanning_tree_around_the_glyph() {
        for seed in 0..20 {
            let mut engine = MazeEngine::new(config(20, 15, (0, 0), (19, 14), seed));
            let generation = engine.generate(1).unwrap();
            assert!(generation.glyph.is_some());
            assert_eq!(generation.blocked, 18 * 4);
            assert_eq!(generation.visited, 20 * 15 - generation.blocked);
            assert_perfect(engine.grid().unwrap(), engine.blocked(), Coord::new(0, 0));
        }
    }

    #[test]
    fn blocked_cells_are_sealed() {
        let mut engine = MazeEngine::new(config(25, 19, (0, 0), (24, 18), 3));
        engine.generate(2).unwrap();
        assert!(!engine.blocked().is_empty());
        assert_glyph_sealed(engine.grid().unwrap(), engine.blocked());
        assert_coherent(engine.grid().unwrap());
    }

    #[test]
    fn spanning_tree_over_many_sizes() {
        let sizes = [(2, 2), (3, 7), (9, 7), (10, 10), (20, 15), (23, 41), (64, 9), (45, 33)];
        for (w, h) in sizes {
            for seed in [0, 1, 99, 31337] {
                let mut engine = MazeEngine::new(config(w, h, (0, 0), (w - 1, h - 1), seed));
                engine.generate(1).unwrap();
                assert_perfect(engine.grid().unwrap(), engine.blocked(), Coord::new(0, 0));
            }
        }
    }

    #[test]
    fn spanning_tree_with_wider_margins() {
        for margin in 1..=4 {
            let mut engine = MazeEngine::new(config(40, 30, (0, 0), (39, 29), margin as u64));
            let generation = engine.generate(margin).unwrap();
            assert!(generation.glyph.is_some(), "margin {margin}");
            assert_perfect(engine.grid().unwrap(), engine.blocked(), Coord::new(0, 0));
        }
    }

    #[test]
    fn same_seed_same_maze() {
        let mut a = MazeEngine::new(config(30, 20, (0, 0), (29, 19), 42));
        let mut b = MazeEngine::new(config(30, 20, (0, 0), (29, 19), 42));
        a.generate(1).unwrap();
        b.generate(1).unwrap();
        assert_eq!(a.grid(), b.grid());
        assert_eq!(a.to_text(), b.to_text());
    }

    #[test]
    fn different_seeds_usually_differ() {
        let mut a = MazeEngine::new(config(30, 20, (0, 0), (29, 19), 1));
        let mut b = MazeEngine::new(config(30, 20, (0, 0), (29, 19), 2));
        a.generate(1).unwrap();
        b.generate(1).unwrap();
        assert_ne!(a.grid(), b.grid());
    }

    #[test]
    fn injected_rng_is_used() {
        let cfg = config(12, 12, (0, 0), (11, 11), 0);
        let mut a = MazeEngine::with_rng(cfg.clone(), StdRng::seed_from_u64(5));
        let mut b = MazeEngine::with_rng(cfg, StdRng::seed_from_u64(5));
        a.generate(1).unwrap();
        b.generate(1).unwrap();
        assert_eq!(a.to_text(), b.to_text());
    }

    #[test]
    fn regenerate_resets_state() {
        let mut engine = MazeEngine::new(config(10, 10, (0, 0), (9, 9), 8));
        let first = engine.generate(1).unwrap();
        let second = engine.generate(1).unwrap();
        assert_eq!(first.visited, second.visited);
        assert_perfect(engine.grid().unwrap(), engine.blocked(), Coord::new(0, 0));
    }

    #[test]
    fn entry_inside_glyph_is_rejected() {
        // 9x7 with margin 1 puts the glyph's top-left pixel at (1, 1).
        let mut engine = MazeEngine::new(config(9, 7, (1, 1), (0, 0), 0));
        assert_eq!(
            engine.generate(1),
            Err(PlacementError::EntryInsideGlyph(Coord::new(1, 1)))
        );
        assert!(engine.grid().is_none());
    }

    #[test]
    fn exit_inside_glyph_is_rejected() {
        let mut engine = MazeEngine::new(config(9, 7, (0, 0), (7, 1), 0));
        assert_eq!(
            engine.generate(1),
            Err(PlacementError::ExitInsideGlyph(Coord::new(7, 1)))
        );
    }

    #[test]
    fn check_placement_matches_generate() {
        let bad = config(9, 7, (1, 1), (0, 0), 0);
        assert_eq!(
            check_placement(&bad, 1).map(|_| ()),
            Err(PlacementError::EntryInsideGlyph(Coord::new(1, 1)))
        );
        assert!(MazeEngine::new(bad).generate(1).is_err());

        let good = config(20, 15, (0, 0), (19, 14), 0);
        let mask = check_placement(&good, 1).unwrap();
        assert!(mask.is_placed());
        assert_eq!(mask.blocked.len(), 18 * 4);
    }

    #[test]
    fn check_placement_raises_zero_margin() {
        // At margin 0 the glyph would sit at (0, 0) in an 8x6 maze.
        let cfg = config(8, 6, (0, 0), (7, 5), 0);
        let mask = check_placement(&cfg, 0).unwrap();
        assert!(!mask.is_placed());
    }

    #[test]
    fn failed_generate_hides_previous_maze() {
        let mut engine = MazeEngine::new(config(9, 7, (1, 1), (0, 0), 0));
        // Margin 2 does not fit, so no glyph and the entry is free.
        engine.generate(2).unwrap();
        assert!(engine.grid().is_some());
        assert!(engine.generate(1).is_err());
        assert!(engine.grid().is_none());
    }

    #[test]
    fn zero_margin_is_raised() {
        let mut engine = MazeEngine::new(config(7, 5, (0, 0), (6, 4), 0));
        let generation = engine.generate(0).unwrap();
        assert_eq!(generation.margin, MIN_MARGIN);
        assert_eq!(generation.glyph, None);
        assert_perfect(engine.grid().unwrap(), engine.blocked(), Coord::new(0, 0));
    }

    #[test]
    fn imperfect_flag_still_yields_perfect_maze() {
        let cfg = MazeConfig::new(12, 9, (0, 0), (11, 8), "m", false, Some(4)).unwrap();
        let mut engine = MazeEngine::new(cfg);
        engine.generate(1).unwrap();
        assert_perfect(engine.grid().unwrap(), engine.blocked(), Coord::new(0, 0));
    }

    #[test]
    fn single_row_maze_is_a_corridor() {
        let mut engine = MazeEngine::new(config(6, 1, (0, 0), (5, 0), 9));
        engine.generate(1).unwrap();
        assert_eq!(engine.to_text().unwrap(), "d55557");
    }

    #[test]
    fn large_maze_does_not_overflow_the_stack() {
        let mut engine = MazeEngine::new(config(300, 300, (0, 0), (299, 299), 11));
        let generation = engine.generate(1).unwrap();
        assert_eq!(generation.passages, generation.visited - 1);
        assert_perfect(engine.grid().unwrap(), engine.blocked(), Coord::new(0, 0));
    }
}
