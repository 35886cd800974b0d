//! Output formatting: the maze file body and CLI summaries.
//!
//! # Maze File
//!
//! The file written by `mazegen generate` is the hex grid, an empty line,
//! then the entry and exit cells:
//!
//! ```text
//! d53
//! d56
//!
//! 0,0
//! 0,1
//! ```
//!
//! # CLI Summary
//!
//! ```text
//! Maze 20x15 → maze.txt
//!     Entry: 0,0
//!     Exit: 19,14
//!     Seed: 42
//!     Glyph: 14x10 at 3,2 (scale 2, margin 1)
//!     Cells: 228 carved, 72 blocked
//! ```
//!
//! Each output has a `format_*` function (returns `Vec<String>` or `String`)
//! for testability and, where it goes to stdout, a `print_*` wrapper. Format
//! functions are pure: no I/O, no side effects.

use crate::config::MazeConfig;
use crate::encode;
use crate::engine::{Generation, MIN_MARGIN};
use crate::glyph::{self, GLYPH_42};
use crate::grid::{Coord, Grid};

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn header(config: &MazeConfig) -> String {
    format!(
        "Maze {}x{} → {}",
        config.width(),
        config.height(),
        config.output_file()
    )
}

fn endpoint_lines(config: &MazeConfig) -> Vec<String> {
    let seed = match config.seed() {
        Some(seed) => seed.to_string(),
        None => "random".to_string(),
    };
    vec![
        format!("{}Entry: {}", indent(1), config.entry()),
        format!("{}Exit: {}", indent(1), config.exit()),
        format!("{}Seed: {}", indent(1), seed),
    ]
}

fn glyph_line(placement: Option<glyph::GlyphPlacement>, margin: usize) -> String {
    match placement {
        Some(p) => format!(
            "{}Glyph: {}x{} at {} (scale {}, margin {})",
            indent(1),
            p.width,
            p.height,
            Coord::new(p.left, p.top),
            p.scale,
            margin
        ),
        None => format!("{}Glyph: skipped, maze too small for margin {}", indent(1), margin),
    }
}

// ============================================================================
// Maze file
// ============================================================================

/// Body of the output file: encoded grid, blank line, entry, exit.
pub fn format_maze_file(grid: &Grid, entry: Coord, exit: Coord) -> String {
    format!("{}\n\n{}\n{}\n", encode::encode(grid), entry, exit)
}

// ============================================================================
// generate
// ============================================================================

/// Summary of a finished generation.
pub fn format_generation_summary(config: &MazeConfig, generation: &Generation) -> Vec<String> {
    let mut lines = vec![header(config)];
    lines.extend(endpoint_lines(config));
    lines.push(glyph_line(generation.glyph, generation.margin));
    lines.push(format!(
        "{}Cells: {} carved, {} blocked",
        indent(1),
        generation.visited,
        generation.blocked
    ));
    lines
}

pub fn print_generation_summary(config: &MazeConfig, generation: &Generation) {
    for line in format_generation_summary(config, generation) {
        println!("{}", line);
    }
}

// ============================================================================
// check
// ============================================================================

/// Summary of a validated config, including where the glyph would go.
pub fn format_check_summary(config: &MazeConfig, margin: usize) -> Vec<String> {
    let margin = margin.max(MIN_MARGIN);
    let mut lines = vec![header(config)];
    lines.extend(endpoint_lines(config));
    let placement = glyph::fit(&GLYPH_42, config.width(), config.height(), margin);
    lines.push(glyph_line(placement, margin));
    lines
}

pub fn print_check_summary(config: &MazeConfig, margin: usize) {
    for line in format_check_summary(config, margin) {
        println!("{}", line);
    }
}
