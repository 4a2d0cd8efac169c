//! Re-parametrization of a curve by its arc length.

use traj_core::Tolerance;
use traj_math::roots::bisect;
use traj_math::Vector;

use crate::curve::{Curve, CurveWithVelocity, PiecewiseCubicCurve};

/// A curve evaluated by arc length instead of its own parameter.
///
/// The grid holds the cumulative length at every vertex of the wrapped
/// curve, starting at zero. Moving along the parameter moves along the
/// curve with unit speed (except on stationary segments, which have zero
/// length and are skipped).
#[derive(Debug, Clone, PartialEq)]
pub struct ArcLengthCurve<V> {
    inner: PiecewiseCubicCurve<V>,
    grid: Box<[f64]>,
    tolerance: Tolerance,
}

impl<V: Vector> ArcLengthCurve<V> {
    pub fn new(inner: PiecewiseCubicCurve<V>) -> Self {
        Self::with_tolerance(inner, Tolerance::default())
    }

    pub fn with_tolerance(inner: PiecewiseCubicCurve<V>, tolerance: Tolerance) -> Self {
        let mut grid = Vec::with_capacity(inner.grid().len());
        let mut length = 0.0;
        grid.push(length);
        for (index, w) in inner.grid().windows(2).enumerate() {
            length += inner.integrated_speed(index, w[0], w[1]);
            grid.push(length);
        }
        Self {
            inner,
            grid: grid.into(),
            tolerance,
        }
    }

    pub fn inner(&self) -> &PiecewiseCubicCurve<V> {
        &self.inner
    }

    /// Total length of the curve.
    pub fn length(&self) -> f64 {
        self.grid[self.grid.len() - 1]
    }

    /// Parameter of the wrapped curve at arc length `s` (clamped).
    pub fn s2t(&self, s: f64) -> f64 {
        let (s, index) = self.clamp_parameter_and_find_index(s);
        let inner_grid = self.inner.grid();
        let (t0, t1) = (inner_grid[index], inner_grid[index + 1]);
        let s = s - self.grid[index];
        if s <= 0.0 {
            return t0;
        }
        bisect(
            |t| self.inner.integrated_speed(index, t0, t) - s,
            t0,
            t1,
            self.tolerance.absolute(t1 - t0),
            self.tolerance.max_iterations,
        )
    }
}

impl<V: Vector> Curve<V> for ArcLengthCurve<V> {
    fn evaluate(&self, s: f64) -> V {
        self.inner.evaluate(self.s2t(s))
    }

    fn grid(&self) -> &[f64] {
        &self.grid
    }
}

impl<V: Vector> CurveWithVelocity<V, V> for ArcLengthCurve<V> {
    /// Unit tangent at arc length `s`, zero where the curve stands still.
    fn evaluate_velocity(&self, s: f64) -> V {
        let velocity = self.inner.evaluate_velocity(self.s2t(s));
        let speed = velocity.norm();
        if speed == 0.0 {
            V::ZERO
        } else {
            velocity / speed
        }
    }

    fn integrated_speed(&self, index: usize, a: f64, b: f64) -> f64 {
        debug_assert!(self.grid[index] <= a && a <= b && b <= self.grid[index + 1]);
        b - a
    }
}
