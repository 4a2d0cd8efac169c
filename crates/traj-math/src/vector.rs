//! Value types a piecewise cubic curve can be evaluated to.

use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Sub};

use glam::{DVec2, DVec3};

/// A value in the curve's value space: a scalar, a 2-D or a 3-D vector.
///
/// Supports everything needed for Hermite coefficients and tangent
/// formulas (addition, scaling) plus the Euclidean norm used for
/// centripetal spacing and arc length.
pub trait Vector:
    Copy
    + Debug
    + PartialEq
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<f64, Output = Self>
    + Div<f64, Output = Self>
{
    const ZERO: Self;

    /// Euclidean length.
    fn norm(self) -> f64;

    /// Whether every component is finite.
    fn all_finite(self) -> bool;
}

impl Vector for f64 {
    const ZERO: Self = 0.0;

    fn norm(self) -> f64 {
        self.abs()
    }

    fn all_finite(self) -> bool {
        self.is_finite()
    }
}

impl Vector for DVec2 {
    const ZERO: Self = DVec2::ZERO;

    fn norm(self) -> f64 {
        self.length()
    }

    fn all_finite(self) -> bool {
        self.is_finite()
    }
}

impl Vector for DVec3 {
    const ZERO: Self = DVec3::ZERO;

    fn norm(self) -> f64 {
        self.length()
    }

    fn all_finite(self) -> bool {
        self.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{dvec2, dvec3};

    #[test]
    fn test_norm() {
        assert_eq!(Vector::norm(-2.5_f64), 2.5);
        assert!((Vector::norm(dvec2(3.0, 4.0)) - 5.0).abs() < 1e-12);
        assert!((Vector::norm(dvec3(2.0, 3.0, 6.0)) - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_all_finite() {
        assert!(Vector::all_finite(1.0_f64));
        assert!(!Vector::all_finite(f64::NAN));
        assert!(!Vector::all_finite(dvec2(0.0, f64::INFINITY)));
        assert!(Vector::all_finite(DVec3::ONE));
    }
}
