//! Maze grid: per-cell wall and feature flags
//!
//! Each cell stores only the walls on its low-x and low-y edges. The walls
//! on its high edges belong to the neighbouring cells, and the grid's own
//! top and right borders are implied by its size.

use std::ops::{BitOr, BitOrAssign};

use super::level::LevelError;

/// Bitmask of wall/feature flags for one cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CellFlags(pub u8);

impl CellFlags {
    pub const EMPTY: CellFlags = CellFlags(0);
    /// Horizontal wall along the cell's low-y edge
    pub const WALL_X: CellFlags = CellFlags(1 << 0);
    /// Vertical wall along the cell's low-x edge
    pub const WALL_Y: CellFlags = CellFlags(1 << 1);
    /// Decorative texture on this cell's walls
    pub const FEATURE: CellFlags = CellFlags(1 << 2);

    #[inline]
    pub const fn contains(self, other: CellFlags) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn without(self, other: CellFlags) -> CellFlags {
        CellFlags(self.0 & !other.0)
    }
}

impl BitOr for CellFlags {
    type Output = CellFlags;
    fn bitor(self, rhs: CellFlags) -> CellFlags {
        CellFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for CellFlags {
    fn bitor_assign(&mut self, rhs: CellFlags) {
        self.0 |= rhs.0;
    }
}

/// Fixed-size grid of cells, indexed with y pointing up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeGrid {
    width: usize,
    height: usize,
    cells: Vec<CellFlags>,
}

impl MazeGrid {
    /// Build from rows as they are authored, top row first.
    ///
    /// Rows are mirrored once so that row index equals y, matching the
    /// camera's "up is +y" convention.
    pub fn from_rows(rows: &[Vec<CellFlags>]) -> Result<Self, LevelError> {
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        if width == 0 {
            return Err(LevelError::Empty);
        }
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != width {
                return Err(LevelError::RaggedRow { row, expected: width, found: cells.len() });
            }
        }
        let top_down: Vec<CellFlags> = rows.iter().flatten().copied().collect();
        Ok(Self::mirrored(width, rows.len(), &top_down))
    }

    fn mirrored(width: usize, height: usize, top_down: &[CellFlags]) -> Self {
        let mut cells = Vec::with_capacity(width * height);
        for row in top_down.chunks(width).rev() {
            cells.extend_from_slice(row);
        }
        Self { width, height, cells }
    }

    /// The 8x8 reference maze
    pub fn classic() -> Self {
        const I: CellFlags = CellFlags::WALL_Y;
        const U: CellFlags = CellFlags::WALL_X;
        const L: CellFlags = CellFlags(CellFlags::WALL_X.0 | CellFlags::WALL_Y.0);
        const O: CellFlags = CellFlags::EMPTY;
        const G: CellFlags = CellFlags(CellFlags::WALL_Y.0 | CellFlags::FEATURE.0);

        #[rustfmt::skip]
        const LAYOUT: [CellFlags; 64] = [
            I, U, U, U, I, O, L, O,
            L, U, U, O, O, L, O, U,
            I, O, U, U, I, I, O, G,
            I, G, L, U, U, I, L, U,
            I, L, O, L, U, O, I, U,
            I, I, L, O, I, U, I, O,
            I, L, O, I, L, U, U, I,
            L, U, U, L, U, L, U, U,
        ];

        Self::mirrored(8, 8, &LAYOUT)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Flags of cell (x, y), or no flags outside the grid.
    ///
    /// Out-of-range cells are not reported as walls; callers that need the
    /// border to stop them must check bounds themselves.
    #[inline]
    pub fn lookup(&self, x: i32, y: i32) -> CellFlags {
        if self.in_bounds(x, y) {
            self.cells[y as usize * self.width + x as usize]
        } else {
            CellFlags::EMPTY
        }
    }

    /// Check that the stored border walls are all present: every x = 0 cell
    /// has its low-x wall and every y = 0 cell its low-y wall.
    pub fn check_enclosed(&self) -> Result<(), LevelError> {
        for y in 0..self.height as i32 {
            if !self.lookup(0, y).contains(CellFlags::WALL_Y) {
                return Err(LevelError::OpenBoundary { x: 0, y });
            }
        }
        for x in 0..self.width as i32 {
            if !self.lookup(x, 0).contains(CellFlags::WALL_X) {
                return Err(LevelError::OpenBoundary { x, y: 0 });
            }
        }
        Ok(())
    }

    /// Grid with only the border walls, for tests and demos
    pub fn open(width: usize, height: usize) -> Self {
        let mut cells = vec![CellFlags::EMPTY; width * height];
        for y in 0..height {
            cells[y * width] |= CellFlags::WALL_Y;
        }
        for x in 0..width {
            cells[x] |= CellFlags::WALL_X;
        }
        Self { width, height, cells }
    }

    /// Replace one cell's flags, used while building grids by hand
    pub fn set(&mut self, x: i32, y: i32, flags: CellFlags) {
        if self.in_bounds(x, y) {
            self.cells[y as usize * self.width + x as usize] = flags;
        }
    }
}
