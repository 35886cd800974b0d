//! Grid data model shared by every stage.
//!
//! A maze is a `width × height` array of 4-bit wall masks stored row-major.
//! Each bit records whether one edge of the cell is closed:
//!
//! ```text
//! bit0 = North   bit1 = East   bit2 = South   bit3 = West
//! ```
//!
//! A set bit is a wall, a clear bit is an open passage. A fresh cell is `15`
//! (fully enclosed). Rendering code consumes [`Grid`] read-only and must honor
//! this bit order exactly.
//!
//! [`CellSet`] is the boolean companion grid used for the visited and blocked
//! sets.

use std::fmt;

/// Mask value of a fully enclosed cell.
pub const ALL_WALLS: u8 = 0b1111;

/// A cell position, `x` counting columns from the left and `y` rows from the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// One of the four cell edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Neighbor scan order used by the carving algorithm.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// The wall bit for this edge.
    pub const fn bit(self) -> u8 {
        match self {
            Direction::North => 1 << 0,
            Direction::East => 1 << 1,
            Direction::South => 1 << 2,
            Direction::West => 1 << 3,
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }
}

/// Wall-bitmask grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl Grid {
    /// A grid where every cell has all four walls.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![ALL_WALLS; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    /// Mask of the cell at `coord`.
    ///
    /// Panics if `coord` is outside the grid.
    pub fn get(&self, coord: Coord) -> u8 {
        self.cells[self.index(coord)]
    }

    pub fn set(&mut self, coord: Coord, mask: u8) {
        let i = self.index(coord);
        self.cells[i] = mask & ALL_WALLS;
    }

    /// Whether the wall on `side` of `coord` is closed.
    pub fn has_wall(&self, coord: Coord, side: Direction) -> bool {
        self.get(coord) & side.bit() != 0
    }

    /// The in-bounds cell across `side` of `coord`, if any.
    pub fn neighbor(&self, coord: Coord, side: Direction) -> Option<Coord> {
        let next = match side {
            Direction::North => Coord::new(coord.x, coord.y.checked_sub(1)?),
            Direction::East => Coord::new(coord.x + 1, coord.y),
            Direction::South => Coord::new(coord.x, coord.y + 1),
            Direction::West => Coord::new(coord.x.checked_sub(1)?, coord.y),
        };
        self.contains(next).then_some(next)
    }

    /// Open the passage on `side` of `coord`, clearing the mirrored bit on the
    /// neighbor as well. Returns the neighbor, or `None` at the border (nothing
    /// is changed then).
    pub fn open(&mut self, coord: Coord, side: Direction) -> Option<Coord> {
        let next = self.neighbor(coord, side)?;
        let here = self.index(coord);
        let there = self.index(next);
        self.cells[here] &= !side.bit();
        self.cells[there] &= !side.opposite().bit();
        Some(next)
    }

    /// Close the wall on `side` of `coord` only. The caller is responsible for
    /// the mirrored bit.
    pub fn close(&mut self, coord: Coord, side: Direction) {
        let i = self.index(coord);
        self.cells[i] |= side.bit();
    }

    /// Iterate rows top to bottom, each as a slice of masks.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        // `max(1)` keeps `chunks` happy for a degenerate zero-width grid.
        self.cells.chunks(self.width.max(1))
    }

    /// Iterate every coordinate in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + use<> {
        let width = self.width;
        (0..self.height).flat_map(move |y| (0..width).map(move |x| Coord::new(x, y)))
    }

    fn index(&self, coord: Coord) -> usize {
        assert!(
            self.contains(coord),
            "cell {coord} outside {}x{} grid",
            self.width,
            self.height
        );
        coord.y * self.width + coord.x
    }
}

/// Boolean per-cell set with the same dimensions as a [`Grid`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellSet {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl CellSet {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Out-of-bounds coordinates are never members.
    pub fn contains(&self, coord: Coord) -> bool {
        coord.x < self.width && coord.y < self.height && self.cells[coord.y * self.width + coord.x]
    }

    /// Add `coord`. Returns `false` if it was already a member.
    ///
    /// Panics if `coord` is outside the set's bounds.
    pub fn insert(&mut self, coord: Coord) -> bool {
        assert!(
            coord.x < self.width && coord.y < self.height,
            "cell {coord} outside {}x{} set",
            self.width,
            self.height
        );
        let slot = &mut self.cells[coord.y * self.width + coord.x];
        !std::mem::replace(slot, true)
    }

    pub fn len(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.cells.contains(&true)
    }

    /// Members in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Coord> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, member)| **member)
            .map(|(i, _)| Coord::new(i % self.width, i / self.width))
    }
}
