//! Grid ray casting (2D DDA)
//!
//! Walks a ray from cell boundary to cell boundary, always stepping across
//! whichever axis line is nearer, until it crosses a wall or the grid edge.
//! The returned point is projected along the ray, so it keeps sub-cell
//! precision for texturing and depth.

use super::maze::{CellFlags, MazeGrid};
use crate::rasterizer::{Real, Scalar, Vec2};

/// Which family of grid lines the ray stopped on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// A line of constant x (a wall running along y)
    X,
    /// A line of constant y (a wall running along x)
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitKind {
    /// Stopped by a stored wall
    Wall,
    /// Stopped by the edge of the grid
    Boundary,
    /// Zero direction, or the walk ran past its step limit
    Degenerate,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vec2,
    pub side: Side,
    pub kind: HitKind,
}

impl RayHit {
    fn degenerate(origin: Vec2) -> Self {
        Self { point: origin, side: Side::X, kind: HitKind::Degenerate }
    }
}

fn clamp(v: Real, lo: Real, hi: Real) -> Real {
    if v < lo {
        lo
    } else if v > hi {
        hi
    } else {
        v
    }
}

/// Per-axis walk state: step direction, ray length per cell crossed, ray
/// length accumulated to the next crossing, and which cell owns the wall on
/// that crossing line.
struct AxisWalk {
    step: i32,
    per_cell: Real,
    next: Real,
    wall_offset: i32,
}

impl AxisWalk {
    /// `slope` is the other component divided by this one
    fn new(dir: Real, origin: Real, slope: Real) -> Self {
        if dir == Real::ZERO {
            return Self { step: 0, per_cell: Real::INFINITE, next: Real::INFINITE, wall_offset: 0 };
        }

        // Hypotenuse length of one full cell along this axis
        let per_cell = Real::ONE.saturating_add(slope * slope).square_root();

        if dir > Real::ZERO {
            Self {
                step: 1,
                per_cell,
                next: per_cell * (Real::ONE - origin.fract_part()),
                // Walls live on a cell's low edge, so look one cell ahead
                wall_offset: 1,
            }
        } else {
            Self {
                step: -1,
                per_cell,
                next: per_cell * origin.fract_part(),
                wall_offset: 0,
            }
        }
    }
}

/// Cast a ray from `origin` along `dir` and return where it first crosses a
/// wall or the grid edge.
///
/// `dir` need not be normalized but must be non-zero. In release builds a
/// zero direction yields a [`HitKind::Degenerate`] hit at the origin.
pub fn cast_ray(grid: &MazeGrid, origin: Vec2, dir: Vec2) -> RayHit {
    debug_assert!(!dir.is_zero(), "cast_ray needs a non-zero direction");
    if dir.is_zero() {
        return RayHit::degenerate(origin);
    }

    let dydx = if dir.x == Real::ZERO { Real::ZERO } else { dir.y / dir.x };
    let dxdy = if dir.y == Real::ZERO { Real::ZERO } else { dir.x / dir.y };

    let mut walk_x = AxisWalk::new(dir.x, origin.x, dydx);
    let mut walk_y = AxisWalk::new(dir.y, origin.y, dxdy);

    let mut cell_x = origin.x.int_part();
    let mut cell_y = origin.y.int_part();

    let width = grid.width() as i32;
    let height = grid.height() as i32;
    let right = Real::from_int(width);
    let top = Real::from_int(height);

    // A ray from inside the grid crosses at most width + height lines
    let max_steps = (width + height + 2) as usize;

    for _ in 0..max_steps {
        if walk_x.next < walk_y.next {
            let line = cell_x + walk_x.wall_offset;
            let boundary = line <= 0 || line >= width;
            if boundary || grid.lookup(line, cell_y).contains(CellFlags::WALL_Y) {
                let x = Real::from_int(line);
                let y = origin.y + dydx * (x - origin.x);
                return RayHit {
                    point: Vec2::new(x, clamp(y, Real::ZERO, top)),
                    side: Side::X,
                    kind: if boundary { HitKind::Boundary } else { HitKind::Wall },
                };
            }
            cell_x += walk_x.step;
            walk_x.next = walk_x.next.saturating_add(walk_x.per_cell);
        } else {
            let line = cell_y + walk_y.wall_offset;
            let boundary = line <= 0 || line >= height;
            if boundary || grid.lookup(cell_x, line).contains(CellFlags::WALL_X) {
                let y = Real::from_int(line);
                let x = origin.x + dxdy * (y - origin.y);
                return RayHit {
                    point: Vec2::new(clamp(x, Real::ZERO, right), y),
                    side: Side::Y,
                    kind: if boundary { HitKind::Boundary } else { HitKind::Wall },
                };
            }
            cell_y += walk_y.step;
            walk_y.next = walk_y.next.saturating_add(walk_y.per_cell);
        }
    }

    RayHit::degenerate(origin)
}
