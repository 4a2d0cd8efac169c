//! A single cubic polynomial segment.

use serde::{Deserialize, Serialize};
use traj_math::Vector;

/// A cubic polynomial `a0 + a1 u + a2 u^2 + a3 u^3` over the local parameter `u ∈ [0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicSegment<V> {
    pub coefficients: [V; 4],
}

impl<V: Vector> CubicSegment<V> {
    pub fn new(coefficients: [V; 4]) -> Self {
        Self { coefficients }
    }

    /// Build a segment from end values and tangents.
    ///
    /// The tangents `v0` and `v1` are derivatives with respect to the global
    /// parameter; `delta` is the width of the segment's grid interval.
    pub fn from_hermite(x0: V, x1: V, v0: V, v1: V, delta: f64) -> Self {
        // [a0]   [ 1,  0,          0,      0] [x0]
        // [a1] = [ 0,  0,      delta,      0] [x1]
        // [a2]   [-3,  3, -2 * delta, -delta] [v0]
        // [a3]   [ 2, -2,      delta,  delta] [v1]
        Self {
            coefficients: [
                x0,
                v0 * delta,
                x0 * -3.0 + x1 * 3.0 - v0 * (2.0 * delta) - v1 * delta,
                x0 * 2.0 - x1 * 2.0 + v0 * delta + v1 * delta,
            ],
        }
    }

    /// Value at local parameter `u` (Horner's method).
    #[inline]
    pub fn evaluate(&self, u: f64) -> V {
        let [a0, a1, a2, a3] = self.coefficients;
        ((a3 * u + a2) * u + a1) * u + a0
    }

    /// Derivative with respect to the local parameter `u`.
    #[inline]
    pub fn velocity(&self, u: f64) -> V {
        let [_, a1, a2, a3] = self.coefficients;
        (a3 * (3.0 * u) + a2 * 2.0) * u + a1
    }

    pub fn all_finite(&self) -> bool {
        self.coefficients.iter().all(|c| c.all_finite())
    }
}
