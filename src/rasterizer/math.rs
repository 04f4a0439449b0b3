//! Vector and angle math for the maze view
//!
//! Angles are binary: a u32 whose whole range is one turn, so adding and
//! subtracting wrap around for free.

use std::ops::{Add, AddAssign, Neg, Sub};

use super::fixed::{Real, Scalar};

include!(concat!(env!("OUT_DIR"), "/sine_table.rs"));

/// 2D vector, used for both grid positions (1.0 = one cell) and directions
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: Real,
    pub y: Real,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: <Real as Scalar>::ZERO, y: <Real as Scalar>::ZERO };

    pub fn new(x: Real, y: Real) -> Self {
        Self { x, y }
    }

    pub fn from_ints(x: i32, y: i32) -> Self {
        Self { x: Real::from_int(x), y: Real::from_int(y) }
    }

    pub fn is_zero(self) -> bool {
        self.x == Real::ZERO && self.y == Real::ZERO
    }

    /// Rotate counter-clockwise by `angle`
    pub fn rotate(self, angle: Angle) -> Vec2 {
        let s = angle.sin();
        let c = angle.cos();
        Vec2 {
            x: self.x * c - self.y * s,
            y: self.x * s + self.y * c,
        }
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, other: Vec2) -> Vec2 {
        Vec2 { x: self.x + other.x, y: self.y + other.y }
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, other: Vec2) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, other: Vec2) -> Vec2 {
        Vec2 { x: self.x - other.x, y: self.y - other.y }
    }
}

/// Binary angle: the full u32 range maps onto one turn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Angle(pub u32);

impl Angle {
    pub const ZERO: Angle = Angle(0);
    pub const QUARTER_TURN: Angle = Angle(0x4000_0000);
    pub const HALF_TURN: Angle = Angle(0x8000_0000);

    /// `n` quarter turns, counter-clockwise
    pub const fn quarters(n: u32) -> Angle {
        Angle(n.wrapping_mul(0x4000_0000))
    }

    pub fn sin(self) -> Real {
        let mut a = self.0;
        if a >= Self::HALF_TURN.0 {
            return -Angle(a - Self::HALF_TURN.0).sin();
        }
        // Mirror the second quarter onto the first
        if a > Self::QUARTER_TURN.0 {
            a = Self::HALF_TURN.0 - a;
        }
        SINE_TABLE[(a >> 16) as usize]
    }

    pub fn cos(self) -> Real {
        (self + Self::QUARTER_TURN).sin()
    }

    /// Signed distance to `target`, in the range [-half, half)
    pub fn delta_to(self, target: Angle) -> i32 {
        target.0.wrapping_sub(self.0) as i32
    }
}

impl Add for Angle {
    type Output = Angle;
    fn add(self, other: Angle) -> Angle {
        Angle(self.0.wrapping_add(other.0))
    }
}

impl Sub for Angle {
    type Output = Angle;
    fn sub(self, other: Angle) -> Angle {
        Angle(self.0.wrapping_sub(other.0))
    }
}

impl Neg for Angle {
    type Output = Angle;
    fn neg(self) -> Angle {
        Angle(self.0.wrapping_neg())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Real, b: f32) -> bool {
        (a.to_f32() - b).abs() <= 2.0 / 256.0
    }

    #[test]
    fn test_sin_cardinal_points() {
        assert_eq!(Angle::ZERO.sin(), Real::ZERO);
        assert_eq!(Angle::QUARTER_TURN.sin(), Real::ONE);
        assert_eq!(Angle::HALF_TURN.sin(), Real::ZERO);
        assert_eq!(Angle::quarters(3).sin(), -Real::ONE);
    }

    #[test]
    fn test_cos_is_shifted_sin() {
        assert_eq!(Angle::ZERO.cos(), Real::ONE);
        assert!(close(Angle::QUARTER_TURN.cos(), 0.0));
        assert_eq!(Angle::HALF_TURN.cos(), -Real::ONE);
    }

    #[test]
    fn test_sin_eighth_turn() {
        let s = Angle(0x2000_0000).sin();
        assert!(close(s, std::f32::consts::FRAC_1_SQRT_2));
        assert_eq!(Angle(0x6000_0000).sin(), s);
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let v = Vec2::from_ints(0, 1).rotate(Angle::QUARTER_TURN);
        assert!(close(v.x, -1.0));
        assert!(close(v.y, 0.0));
    }

    #[test]
    fn test_rotate_then_unrotate() {
        let yaw = Angle(0x1234_5678);
        let v = Vec2::new(Real::from_ratio(3, 2), Real::from_ratio(-1, 4));
        let back = v.rotate(yaw).rotate(-yaw);
        // Two lossy rotations at the narrowest width
        assert!((back.x.to_f32() - 1.5).abs() < 0.05);
        assert!((back.y.to_f32() + 0.25).abs() < 0.05);
    }

    #[cfg(all(feature = "wide-fixed", not(feature = "float")))]
    #[test]
    fn test_wide_table_resolves_sixteen_bits() {
        assert_eq!(Real::ONE, crate::rasterizer::Fixed::<16>::from_raw(1 << 16));
        let s = Angle(0x2000_0000).sin().to_f32();
        assert!((s - std::f32::consts::FRAC_1_SQRT_2).abs() <= 1.0 / 65536.0, "{}", s);
        // One table step is finer than the narrow format can show
        assert_ne!(Angle(0x0001_0000).sin(), Real::ZERO);
    }

    #[cfg(feature = "float")]
    #[test]
    fn test_float_table_is_exact_to_f32() {
        let s = Angle(0x2000_0000).sin();
        assert!((s - std::f32::consts::FRAC_1_SQRT_2).abs() <= 1e-6, "{}", s);
        let v = Vec2::from_ints(0, 1).rotate(Angle::QUARTER_TURN);
        assert!((v.x + 1.0).abs() <= 1e-6 && v.y.abs() <= 1e-6);
    }

    #[test]
    fn test_angle_wraps() {
        assert_eq!(Angle::quarters(4), Angle::ZERO);
        assert_eq!(Angle::ZERO - Angle::QUARTER_TURN, Angle::quarters(3));
        assert_eq!(Angle::ZERO.delta_to(Angle::quarters(3)), -0x4000_0000);
    }
}
