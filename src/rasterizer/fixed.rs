//! Deterministic scalar arithmetic
//!
//! All geometry goes through the [`Scalar`] trait. The build selects one
//! implementation as [`Real`]: narrow fixed point by default (bit-identical
//! with the constrained target), wide fixed point with `wide-fixed`, or plain
//! `f32` with `float`.

use std::fmt::Debug;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// Numeric type used for every coordinate, direction, depth and slope
#[cfg(feature = "float")]
pub type Real = f32;

/// Numeric type used for every coordinate, direction, depth and slope
#[cfg(all(not(feature = "float"), feature = "wide-fixed"))]
pub type Real = Fixed<16>;

/// Numeric type used for every coordinate, direction, depth and slope
#[cfg(not(any(feature = "float", feature = "wide-fixed")))]
pub type Real = Fixed<8>;

/// Operations the renderer and navigation need from a number type
pub trait Scalar:
    Copy
    + Debug
    + Default
    + PartialEq
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
{
    const ZERO: Self;
    const ONE: Self;
    /// Stand-in for an unbounded distance
    const INFINITE: Self;

    fn from_int(n: i32) -> Self;

    /// `num / den` built without touching floating point
    fn from_ratio(num: i32, den: i32) -> Self;

    /// Authoring/display conversion only, never used in per-frame geometry
    fn from_f32(n: f32) -> Self;

    fn to_f32(self) -> f32;

    /// Integer part, rounding toward negative infinity
    fn int_part(self) -> i32;

    /// Value modulo one, always in [0, 1)
    fn fract_part(self) -> Self;

    /// Square root of a non-negative value
    fn square_root(self) -> Self;

    fn saturating_add(self, rhs: Self) -> Self;

    /// `floor(fract(self) * n)`, an index into an n-wide table
    fn scale_index(self, n: usize) -> usize;
}

/// Signed fixed-point number with `F` fractional bits, backed by an i32
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fixed<const F: u32>(i32);

impl<const F: u32> Fixed<F> {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(1 << F);
    pub const INFINITE: Self = Self(i32::MAX);
    pub const NEG_INFINITE: Self = Self(i32::MIN);

    #[inline]
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn from_int(n: i32) -> Self {
        Self(n << F)
    }

    #[inline]
    fn fract_mask() -> i32 {
        (1 << F) - 1
    }
}

/// Digit-by-digit integer square root (floor), two result bits per round
fn isqrt_wide(value: u64) -> u64 {
    let mut rem = value;
    let mut root = 0u64;
    let mut bit = 1u64 << 62;

    while bit > rem {
        bit >>= 2;
    }

    while bit != 0 {
        if rem >= root + bit {
            rem -= root + bit;
            root = (root >> 1) + bit;
        } else {
            root >>= 1;
        }
        bit >>= 2;
    }

    root
}

/// Clamp a widened intermediate back into the i32 range
#[inline]
fn narrow(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

impl<const F: u32> Add for Fixed<F> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl<const F: u32> Sub for Fixed<F> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl<const F: u32> Neg for Fixed<F> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl<const F: u32> AddAssign for Fixed<F> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl<const F: u32> SubAssign for Fixed<F> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl<const F: u32> Mul for Fixed<F> {
    type Output = Self;
    /// Product computed at 64 bits, then shifted back down (saturating)
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        let wide = self.0 as i64 * rhs.0 as i64;
        Self(narrow(wide >> F))
    }
}

impl<const F: u32> Div for Fixed<F> {
    type Output = Self;
    /// The numerator is widened before the fractional shift so large
    /// numerators keep their precision; the quotient saturates.
    #[inline]
    fn div(self, rhs: Self) -> Self {
        debug_assert!(rhs.0 != 0, "fixed-point division by zero");
        if rhs.0 == 0 {
            return match self.0.signum() {
                1 => Self::INFINITE,
                -1 => Self::NEG_INFINITE,
                _ => Self::ZERO,
            };
        }
        let wide = (self.0 as i64) << F;
        Self(narrow(wide / rhs.0 as i64))
    }
}

impl<const F: u32> Scalar for Fixed<F> {
    const ZERO: Self = Fixed::<F>::ZERO;
    const ONE: Self = Fixed::<F>::ONE;
    const INFINITE: Self = Fixed::<F>::INFINITE;

    #[inline]
    fn from_int(n: i32) -> Self {
        Fixed::from_int(n)
    }

    #[inline]
    fn from_ratio(num: i32, den: i32) -> Self {
        Fixed::from_int(num) / Fixed::from_int(den)
    }

    #[inline]
    fn from_f32(n: f32) -> Self {
        Self((n * (1u32 << F) as f32) as i32)
    }

    #[inline]
    fn to_f32(self) -> f32 {
        self.0 as f32 / (1u32 << F) as f32
    }

    #[inline]
    fn int_part(self) -> i32 {
        self.0 >> F
    }

    #[inline]
    fn fract_part(self) -> Self {
        Self(self.0 & Self::fract_mask())
    }

    /// The raw value is widened to u64 and shifted up by another F bits, so
    /// the integer root of the intermediate carries exactly F fractional bits.
    fn square_root(self) -> Self {
        debug_assert!(self.0 >= 0, "square root of negative value {:?}", self);
        if self.0 <= 0 {
            return Self::ZERO;
        }
        let wide = (self.0 as u64) << F;
        Self(isqrt_wide(wide) as i32)
    }

    #[inline]
    fn saturating_add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }

    #[inline]
    fn scale_index(self, n: usize) -> usize {
        ((self.fract_part().0 as i64 * n as i64) >> F) as usize
    }
}

impl Scalar for f32 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;
    const INFINITE: Self = f32::INFINITY;

    #[inline]
    fn from_int(n: i32) -> Self {
        n as f32
    }

    #[inline]
    fn from_ratio(num: i32, den: i32) -> Self {
        num as f32 / den as f32
    }

    #[inline]
    fn from_f32(n: f32) -> Self {
        n
    }

    #[inline]
    fn to_f32(self) -> f32 {
        self
    }

    #[inline]
    fn int_part(self) -> i32 {
        self.floor() as i32
    }

    #[inline]
    fn fract_part(self) -> Self {
        self - self.floor()
    }

    fn square_root(self) -> Self {
        debug_assert!(self >= 0.0, "square root of negative value {}", self);
        if self <= 0.0 {
            return 0.0;
        }
        self.sqrt()
    }

    #[inline]
    fn saturating_add(self, rhs: Self) -> Self {
        self + rhs
    }

    #[inline]
    fn scale_index(self, n: usize) -> usize {
        ((self.fract_part() * n as f32) as usize).min(n.saturating_sub(1))
    }
}
