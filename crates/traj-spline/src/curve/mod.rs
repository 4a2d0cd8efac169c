//! Curve traits and the piecewise cubic representation.

mod piecewise;
mod segment;

use traj_math::grid::clamp_and_find_segment;
use traj_math::quadrature::gauss_legendre13;
use traj_math::Vector;

pub use piecewise::PiecewiseCubicCurve;
pub use segment::CubicSegment;

/// Trait for curves parametrized over a grid of segment boundaries.
pub trait Curve<Output>: Send + Sync {
    /// Evaluate the curve at parameter `t`.
    ///
    /// Parameters outside of the domain are clamped to it.
    fn evaluate(&self, t: f64) -> Output;

    /// Parameter values at the segment boundaries.
    fn grid(&self) -> &[f64];

    /// Return the parameter domain `(t_min, t_max)`.
    fn domain(&self) -> (f64, f64) {
        let grid = self.grid();
        (grid[0], grid[grid.len() - 1])
    }

    /// Evaluate at each of the given parameters, preserving their order.
    fn evaluate_batch(&self, times: &[f64]) -> Vec<Output> {
        times.iter().map(|&t| self.evaluate(t)).collect()
    }

    /// Clamp `t` to the domain and find the index of its segment.
    fn clamp_parameter_and_find_index(&self, t: f64) -> (f64, usize) {
        clamp_and_find_segment(self.grid(), t)
    }
}

/// A curve that also provides its first derivative.
pub trait CurveWithVelocity<Output, Velocity: Vector>: Curve<Output> {
    /// Derivative with respect to the curve parameter at `t` (clamped).
    fn evaluate_velocity(&self, t: f64) -> Velocity;

    /// Length of the curve within segment `index` between parameters `a <= b`.
    fn integrated_speed(&self, index: usize, a: f64, b: f64) -> f64 {
        debug_assert!(a <= b);
        debug_assert!(self.grid()[index] <= a && b <= self.grid()[index + 1]);
        gauss_legendre13(|t| self.evaluate_velocity(t).norm(), a, b)
    }
}
