//! Self-driving camera
//!
//! Each tick either turns toward the target yaw or slides toward the target
//! cell. On reaching the cell it asks the solver where to go next, so the
//! camera tours the maze forever without input.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::rasterizer::{Angle, Real, Scalar, Vec2};
use crate::world::{next_facing, Facing, Hand, MazeGrid, StartPose};

/// Camera motion tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Ticks to cross one cell; must divide one cell exactly
    pub move_steps_per_cell: u32,
    /// Ticks to turn a quarter; must divide a quarter turn exactly
    pub turn_steps_per_quarter: u32,
    /// Wall the tour keeps a hand on
    pub hand: Hand,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            move_steps_per_cell: 16,
            turn_steps_per_quarter: 16,
            hand: Hand::Right,
        }
    }
}

impl CameraConfig {
    /// Check that both step sizes land exactly on their targets
    pub fn validate(&self) -> Result<(), String> {
        // Cell size is a power of two in every numeric mode
        let moves = self.move_steps_per_cell;
        if !moves.is_power_of_two() || moves > i32::MAX as u32 || Real::from_ratio(1, moves as i32) == Real::ZERO {
            return Err(format!("move_steps_per_cell {} does not divide one cell exactly", moves));
        }

        let turns = self.turn_steps_per_quarter;
        if turns == 0 || Angle::QUARTER_TURN.0 % turns != 0 {
            return Err(format!(
                "turn_steps_per_quarter {} does not divide a quarter turn exactly",
                turns
            ));
        }
        Ok(())
    }
}

/// Where the camera is and which way it looks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec2,
    pub yaw: Angle,
}

/// What a call to [`CameraController::update`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Rotating,
    Moving,
    /// Reached the target cell and picked this direction next
    Arrived(Facing),
}

pub struct CameraController {
    pose: CameraPose,
    target_position: Vec2,
    target_yaw: Angle,
    facing: Facing,
    hand: Hand,
    move_step: Real,
    turn_step: u32,
}

/// Move `current` toward `target` by at most `step`
fn approach(current: Real, target: Real, step: Real) -> Real {
    if current < target {
        let next = current + step;
        if next > target { target } else { next }
    } else if current > target {
        let next = current - step;
        if next < target { target } else { next }
    } else {
        current
    }
}

impl CameraController {
    /// Camera centred in the start cell, already looking along its facing
    pub fn new(start: StartPose, config: &CameraConfig) -> Self {
        let half = Real::from_ratio(1, 2);
        let (x, y) = start.cell;
        let position = Vec2::new(Real::from_int(x) + half, Real::from_int(y) + half);
        let yaw = start.facing.yaw();

        Self {
            pose: CameraPose { position, yaw },
            target_position: position,
            target_yaw: yaw,
            facing: start.facing,
            hand: config.hand,
            move_step: Real::from_ratio(1, config.move_steps_per_cell.max(1) as i32),
            turn_step: Angle::QUARTER_TURN.0 / config.turn_steps_per_quarter.max(1),
        }
    }

    pub fn pose(&self) -> CameraPose {
        self.pose
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn target_position(&self) -> Vec2 {
        self.target_position
    }

    pub fn target_yaw(&self) -> Angle {
        self.target_yaw
    }

    /// Advance one tick. Turning takes priority over moving; only one of
    /// them happens per tick. Turns always go clockwise (decreasing yaw).
    pub fn update(&mut self, grid: &MazeGrid) -> Tick {
        if self.pose.yaw != self.target_yaw {
            // Always clockwise, so a left turn is three quarter turns
            let remaining = (self.pose.yaw - self.target_yaw).0;
            self.pose.yaw = self.pose.yaw - Angle(self.turn_step.min(remaining));
            return Tick::Rotating;
        }

        if self.pose.position != self.target_position {
            let pos = &mut self.pose.position;
            let target = self.target_position;
            if pos.x != target.x {
                pos.x = approach(pos.x, target.x, self.move_step);
            } else {
                pos.y = approach(pos.y, target.y, self.move_step);
            }
            if self.pose.position != self.target_position {
                return Tick::Moving;
            }
        }

        Tick::Arrived(self.choose_next(grid))
    }

    fn choose_next(&mut self, grid: &MazeGrid) -> Facing {
        let cell_x = self.pose.position.x.int_part();
        let cell_y = self.pose.position.y.int_part();

        let facing = next_facing(grid, cell_x, cell_y, self.facing, self.hand);
        let (dx, dy) = facing.offset();

        debug!(cell_x, cell_y, from = ?self.facing, to = ?facing, "camera reached cell");

        self.facing = facing;
        self.target_position += Vec2::from_ints(dx, dy);
        self.target_yaw = facing.yaw();
        facing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classic_start() -> CameraController {
        let start = StartPose { cell: (4, 0), facing: Facing::Left };
        CameraController::new(start, &CameraConfig::default())
    }

    fn centre(x: i32, y: i32) -> Vec2 {
        let half = Real::from_ratio(1, 2);
        Vec2::new(Real::from_int(x) + half, Real::from_int(y) + half)
    }

    #[test]
    fn test_first_tick_plans_without_moving() {
        let grid = MazeGrid::classic();
        let mut cam = classic_start();
        assert_eq!(cam.update(&grid), Tick::Arrived(Facing::Left));
        assert_eq!(cam.pose().position, centre(4, 0));
        assert_eq!(cam.target_position(), centre(3, 0));
        assert_eq!(cam.target_yaw(), Angle::QUARTER_TURN);
    }

    #[test]
    fn test_one_cell_takes_exact_step_count() {
        let grid = MazeGrid::classic();
        let mut cam = classic_start();
        cam.update(&grid);

        for _ in 0..15 {
            assert_eq!(cam.update(&grid), Tick::Moving);
        }
        // Last step lands exactly and the next decision happens in the same tick
        let tick = cam.update(&grid);
        assert_eq!(cam.pose().position, centre(3, 0));
        assert_eq!(tick, Tick::Arrived(Facing::Up));
        assert_eq!(cam.target_position(), centre(3, 1));
        assert_eq!(cam.target_yaw(), Facing::Up.yaw());
    }

    #[test]
    fn test_rotation_reaches_target_without_overshoot() {
        let grid = MazeGrid::classic();
        let mut cam = classic_start();
        for _ in 0..17 {
            cam.update(&grid);
        }
        // Now turning from Left (quarter) back to Up (zero)
        for i in 0..16 {
            assert_eq!(cam.update(&grid), Tick::Rotating, "tick {}", i);
            let yaw = cam.pose().yaw.0;
            assert!(yaw <= Angle::QUARTER_TURN.0, "overshot to {:#x}", yaw);
        }
        assert_eq!(cam.pose().yaw, Angle::ZERO);
        assert_eq!(cam.update(&grid), Tick::Moving);
    }

    #[test]
    fn test_left_turn_takes_three_clockwise_quarters() {
        let grid = MazeGrid::classic();
        let mut cam = classic_start();
        let turn_step = Angle::QUARTER_TURN.0 / 16;

        // Tour until the solver picks a left turn
        let mut previous = cam.facing();
        let mut turned_left = false;
        for _ in 0..2_000 {
            if let Tick::Arrived(facing) = cam.update(&grid) {
                if facing == previous.turn_left() {
                    turned_left = true;
                    break;
                }
                previous = facing;
            }
        }
        assert!(turned_left, "no left turn on the tour");
        let target = cam.target_yaw();

        let mut ticks = 0;
        let mut yaw = cam.pose().yaw;
        while cam.update(&grid) == Tick::Rotating {
            let now = cam.pose().yaw;
            assert_eq!((yaw - now).0, turn_step, "step {} did not go clockwise", ticks);
            yaw = now;
            ticks += 1;
        }
        assert_eq!(ticks, 3 * 16);
        assert_eq!(cam.pose().yaw, target);
    }

    #[test]
    fn test_half_turn_goes_clockwise() {
        // Dead end: only the way back is open
        let grid = MazeGrid::open(3, 1);
        let start = StartPose { cell: (2, 0), facing: Facing::Right };
        let mut cam = CameraController::new(start, &CameraConfig::default());
        assert_eq!(cam.update(&grid), Tick::Arrived(Facing::Left));

        let before = cam.pose().yaw;
        cam.update(&grid);
        assert_eq!(before.delta_to(cam.pose().yaw), -(Angle::QUARTER_TURN.0 as i32) / 16);
        for _ in 0..31 {
            assert_eq!(cam.update(&grid), Tick::Rotating);
        }
        assert_eq!(cam.pose().yaw, Facing::Left.yaw());
    }

    #[test]
    fn test_tour_stays_inside_the_maze() {
        let grid = MazeGrid::classic();
        let mut cam = classic_start();
        let w = Real::from_int(grid.width() as i32);
        let h = Real::from_int(grid.height() as i32);
        for _ in 0..20_000 {
            cam.update(&grid);
            let p = cam.pose().position;
            assert!(p.x > Real::ZERO && p.x < w && p.y > Real::ZERO && p.y < h, "{:?}", p);
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(CameraConfig::default().validate().is_ok());
        let bad_move = CameraConfig { move_steps_per_cell: 3, ..CameraConfig::default() };
        assert!(bad_move.validate().is_err());
        let bad_turn = CameraConfig { turn_steps_per_quarter: 0, ..CameraConfig::default() };
        assert!(bad_turn.validate().is_err());
        let fine = CameraConfig { move_steps_per_cell: 8, turn_steps_per_quarter: 64, ..CameraConfig::default() };
        assert!(fine.validate().is_ok());
    }
}
