//! Wall-following navigation
//!
//! Picks the next cardinal direction from the four walls around a cell,
//! always preferring to turn toward the followed hand. In a simply connected
//! maze this visits every cell and loops forever.

use serde::{Deserialize, Serialize};

use super::maze::{CellFlags, MazeGrid};
use crate::rasterizer::Angle;

/// Cardinal facing. Declaration order is counter-clockwise, so a facing's
/// index times a quarter turn is its yaw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    Up = 0,
    Left = 1,
    Down = 2,
    Right = 3,
}

impl Facing {
    pub const ALL: [Facing; 4] = [Facing::Up, Facing::Left, Facing::Down, Facing::Right];

    fn from_index(i: u8) -> Facing {
        Facing::ALL[(i & 3) as usize]
    }

    pub fn turn_left(self) -> Facing {
        Facing::from_index(self as u8 + 1)
    }

    pub fn turn_right(self) -> Facing {
        Facing::from_index(self as u8 + 3)
    }

    pub fn reverse(self) -> Facing {
        Facing::from_index(self as u8 + 2)
    }

    /// Yaw that looks along this facing
    pub fn yaw(self) -> Angle {
        Angle::quarters(self as u32)
    }

    /// One-cell step in grid coordinates
    pub fn offset(self) -> (i32, i32) {
        match self {
            Facing::Up => (0, 1),
            Facing::Left => (-1, 0),
            Facing::Down => (0, -1),
            Facing::Right => (1, 0),
        }
    }
}

/// Which hand stays on the wall
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hand {
    #[default]
    Right,
    Left,
}

impl Hand {
    /// Candidates in priority order: toward the hand, straight, away, back.
    ///
    /// For the right hand this gives
    /// Left: Up, Left, Down, Right;
    /// Up: Right, Up, Left, Down;
    /// Right: Down, Right, Up, Left;
    /// Down: Left, Down, Right, Up.
    pub fn priorities(self, facing: Facing) -> [Facing; 4] {
        match self {
            Hand::Right => [facing.turn_right(), facing, facing.turn_left(), facing.reverse()],
            Hand::Left => [facing.turn_left(), facing, facing.turn_right(), facing.reverse()],
        }
    }
}

/// True if the camera can step from (x, y) one cell toward `dir`
pub fn can_move(grid: &MazeGrid, x: i32, y: i32, dir: Facing) -> bool {
    let (dx, dy) = dir.offset();
    if !grid.in_bounds(x + dx, y + dy) {
        return false;
    }
    // Each edge's wall is stored in the cell on its high side
    match dir {
        Facing::Up => !grid.lookup(x, y + 1).contains(CellFlags::WALL_X),
        Facing::Left => !grid.lookup(x, y).contains(CellFlags::WALL_Y),
        Facing::Down => !grid.lookup(x, y).contains(CellFlags::WALL_X),
        Facing::Right => !grid.lookup(x + 1, y).contains(CellFlags::WALL_Y),
    }
}

/// Next facing for a camera standing in (x, y) and looking along `facing`.
///
/// Falls back to turning around when nothing else is open.
pub fn next_facing(grid: &MazeGrid, x: i32, y: i32, facing: Facing, hand: Hand) -> Facing {
    let [toward, straight, away, back] = hand.priorities(facing);
    [toward, straight, away]
        .into_iter()
        .find(|&dir| can_move(grid, x, y, dir))
        .unwrap_or(back)
}
