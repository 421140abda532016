//! Q-format fixed-point scalar used by the rasterizer's edge functions.
//!
//! Floating-point edge evaluation rounds differently depending on the order
//! operands are added in, which is enough to put a shared triangle edge on
//! different sides for its two neighbors and produce cracks or double-lit
//! pixels. [`Fixed`] gives the rasterizer a bit-exact integer representation
//! instead: addition, subtraction and comparison are plain integer ops, and
//! multiplication/division round through a wider intermediate the same way
//! on every platform.
//!
//! The base integer type is fixed at `i32` (so `B = 32`); only the number of
//! fractional bits is generic, via the `FRAC` const parameter. A 2048x2048
//! viewport with `FRAC = 8` (1/256 sub-pixel precision) comfortably fits:
//! the largest screen coordinate (~2048 * 256 = 524288) is far from
//! `i32::MAX`.

use std::cmp::Ordering;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// A signed `Qm.FRAC` fixed-point number backed by `i32`.
///
/// Overflow is silent (wrapping), matching the detailed per-operation
/// behavior described for this type: callers keep operands in range, and the
/// rasterizer picks `FRAC` so that never happens in practice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fixed<const FRAC: u32>(i32);

impl<const FRAC: u32> Fixed<FRAC> {
    /// The representable value `0`.
    pub const ZERO: Self = Fixed(0);
    /// The representable value `1`.
    pub const ONE: Self = Fixed(1 << FRAC);
    /// The smallest positive step between two representable values, `2^-FRAC`.
    pub const EPSILON: Self = Fixed(1);

    /// Wraps a raw `Qm.FRAC` integer value directly, with no scaling.
    #[inline]
    pub const fn from_raw(raw: i32) -> Self {
        Fixed(raw)
    }

    /// Returns the underlying `Qm.FRAC` integer representation.
    #[inline]
    pub const fn to_raw(self) -> i32 {
        self.0
    }

    /// Converts from a float, rounding to the nearest representable value
    /// with ties broken away from zero.
    #[inline]
    pub fn from_f32(value: f32) -> Self {
        let scale = (1i64 << FRAC) as f32;
        let scaled = value * scale;
        let rounded = if scaled >= 0.0 {
            scaled + 0.5
        } else {
            scaled - 0.5
        };
        Fixed(rounded as i32)
    }

    /// Converts from an integer: `value * 2^FRAC`.
    #[inline]
    pub fn from_i32(value: i32) -> Self {
        Fixed(value.wrapping_shl(FRAC))
    }

    /// Converts back to a float. Exact up to the base type's precision.
    #[inline]
    pub fn to_f32(self) -> f32 {
        self.0 as f32 / (1i64 << FRAC) as f32
    }

    /// Halves the value, rounding to nearest with ties toward `+inf` (the
    /// same tie-breaking rule used by multiplication). Used to bake the
    /// rasterizer's half-pixel sampling offset into an edge constant.
    #[inline]
    pub fn half(self) -> Self {
        let v = self.0 as i64;
        Fixed((((v + 1) >> 1)) as i32)
    }
}

impl<const FRAC: u32> Add for Fixed<FRAC> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Fixed(self.0.wrapping_add(rhs.0))
    }
}

impl<const FRAC: u32> Sub for Fixed<FRAC> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Fixed(self.0.wrapping_sub(rhs.0))
    }
}

impl<const FRAC: u32> Neg for Fixed<FRAC> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Fixed(self.0.wrapping_neg())
    }
}

impl<const FRAC: u32> AddAssign for Fixed<FRAC> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<const FRAC: u32> SubAssign for Fixed<FRAC> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<const FRAC: u32> Mul for Fixed<FRAC> {
    type Output = Self;

    /// Promotes both operands to a 64-bit intermediate, rounds to nearest
    /// with ties toward `+inf`, then truncates back to 32 bits.
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        let product = (self.0 as i64) * (rhs.0 as i64);
        let half = 1i64 << (FRAC.saturating_sub(1));
        let rounded = (product + half) >> FRAC;
        Fixed(rounded as i32)
    }
}

impl<const FRAC: u32> MulAssign for Fixed<FRAC> {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl<const FRAC: u32> Div for Fixed<FRAC> {
    type Output = Self;

    /// Promotes the dividend to a 64-bit intermediate shifted left by
    /// `FRAC`, biases by half the divisor (same sign as the divisor) for
    /// rounding, then divides.
    #[inline]
    fn div(self, rhs: Self) -> Self {
        let dividend = (self.0 as i64) << FRAC;
        let divisor = rhs.0 as i64;
        let half_bias = divisor / 2;
        Fixed(((dividend + half_bias) / divisor) as i32)
    }
}

impl<const FRAC: u32> DivAssign for Fixed<FRAC> {
    #[inline]
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

/// Rust has no prefix `++`/`--` operators; these are the idiomatic stand-ins
/// for the scalar's unit-steppable increment/decrement.
impl<const FRAC: u32> Fixed<FRAC> {
    #[inline]
    pub fn increment(&mut self) {
        self.0 = self.0.wrapping_add(Self::ONE.0);
    }

    #[inline]
    pub fn decrement(&mut self) {
        self.0 = self.0.wrapping_sub(Self::ONE.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Q8 = Fixed<8>;

    #[test]
    fn round_trip_within_epsilon() {
        for f in [0.0f32, 1.0, -1.0, 3.5, -3.5, 0.00390625, 127.99, -128.0] {
            let q = Q8::from_f32(f);
            let back = q.to_f32();
            assert!(
                (back - f).abs() <= Q8::EPSILON.to_f32() + f32::EPSILON,
                "f={f} back={back}"
            );
        }
    }

    #[test]
    fn integer_construction_is_exact() {
        assert_eq!(Q8::from_i32(5).to_f32(), 5.0);
        assert_eq!(Q8::from_i32(-3).to_f32(), -3.0);
    }

    #[test]
    fn addition_and_subtraction() {
        let a = Q8::from_f32(1.5);
        let b = Q8::from_f32(2.25);
        assert_eq!((a + b).to_f32(), 3.75);
        assert_eq!((b - a).to_f32(), 0.75);
    }

    #[test]
    fn multiplication_matches_float_within_epsilon() {
        let cases = [(1.5f32, 2.0f32), (3.25, -1.25), (0.5, 0.5), (-4.0, -2.0)];
        for (a, b) in cases {
            let qa = Q8::from_f32(a);
            let qb = Q8::from_f32(b);
            let got = (qa * qb).to_f32();
            let want = a * b;
            assert!(
                (got - want).abs() <= Q8::EPSILON.to_f32() * 2.0,
                "a={a} b={b} got={got} want={want}"
            );
        }
    }

    #[test]
    fn division_rounds_to_nearest() {
        let a = Q8::from_f32(10.0);
        let b = Q8::from_f32(4.0);
        let got = (a / b).to_f32();
        assert!((got - 2.5).abs() <= Q8::EPSILON.to_f32());
    }

    #[test]
    fn half_matches_multiply_by_one_half() {
        for raw in [0i32, 1, -1, 2, -2, 7, -7, 256, -256] {
            let a = Q8::from_raw(raw);
            let expected = a * Q8::from_f32(0.5);
            assert_eq!(a.half(), expected, "raw={raw}");
        }
    }

    #[test]
    fn increment_decrement_step_by_one() {
        let mut a = Q8::from_i32(1);
        a.increment();
        assert_eq!(a.to_f32(), 2.0);
        a.decrement();
        a.decrement();
        assert_eq!(a.to_f32(), 0.0);
    }

    #[test]
    fn ordering_matches_underlying_value() {
        let a = Q8::from_f32(-1.0);
        let b = Q8::from_f32(1.0);
        assert!(a < b);
        assert_eq!(a.cmp(&b), Ordering::Less);
    }
}
