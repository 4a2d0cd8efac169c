//! Piecewise cubic curve: an ordered sequence of segments over a parameter grid.

use serde::{Deserialize, Serialize};
use traj_core::{Result, TrajError, Validate};
use traj_math::grid::check_grid;
use traj_math::quadrature::gauss_legendre13;
use traj_math::Vector;

use super::{CubicSegment, Curve, CurveWithVelocity};

/// A curve made of cubic segments joined at the values of a strictly
/// increasing grid.
///
/// Segment `i` covers the parameter interval `grid[i]..=grid[i + 1]`,
/// so there is always exactly one more grid value than segments.
/// Immutable after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PiecewiseCubicCurve<V> {
    segments: Box<[CubicSegment<V>]>,
    grid: Box<[f64]>,
}

impl<V: Vector> PiecewiseCubicCurve<V> {
    pub fn new(
        segments: impl Into<Box<[CubicSegment<V>]>>,
        grid: impl Into<Box<[f64]>>,
    ) -> Result<Self> {
        let curve = Self {
            segments: segments.into(),
            grid: grid.into(),
        };
        curve.validate()?;
        Ok(curve)
    }

    pub fn segments(&self) -> &[CubicSegment<V>] {
        &self.segments
    }

    /// Locate the segment for `t` and map `t` to its local parameter.
    fn locate(&self, t: f64) -> (usize, f64, f64) {
        let (t, idx) = self.clamp_parameter_and_find_index(t);
        let t0 = self.grid[idx];
        let delta = self.grid[idx + 1] - t0;
        (idx, (t - t0) / delta, delta)
    }
}

impl<V: Vector> Validate for PiecewiseCubicCurve<V> {
    fn validate(&self) -> Result<()> {
        if self.segments.is_empty() {
            return Err(TrajError::TooFew {
                what: "segments",
                required: 1,
                actual: 0,
            });
        }
        if self.segments.len() + 1 != self.grid.len() {
            return Err(TrajError::LengthMismatch {
                what: "grid",
                actual: self.grid.len(),
                expected: self.segments.len() + 1,
            });
        }
        check_grid("grid", &self.grid)?;
        if let Some(index) = self.segments.iter().position(|s| !s.all_finite()) {
            return Err(TrajError::NonFinite {
                what: "segment coefficient",
                index,
            });
        }
        Ok(())
    }
}

impl<V: Vector> Curve<V> for PiecewiseCubicCurve<V> {
    fn evaluate(&self, t: f64) -> V {
        let (idx, u, _) = self.locate(t);
        self.segments[idx].evaluate(u)
    }

    fn grid(&self) -> &[f64] {
        &self.grid
    }
}

impl<V: Vector> CurveWithVelocity<V, V> for PiecewiseCubicCurve<V> {
    fn evaluate_velocity(&self, t: f64) -> V {
        let (idx, u, delta) = self.locate(t);
        self.segments[idx].velocity(u) / delta
    }

    fn integrated_speed(&self, index: usize, a: f64, b: f64) -> f64 {
        debug_assert!(a <= b);
        debug_assert!(self.grid[index] <= a && b <= self.grid[index + 1]);
        let segment = &self.segments[index];
        let t0 = self.grid[index];
        let delta = self.grid[index + 1] - t0;
        // Evaluate the segment directly, so that `b == grid[index + 1]`
        // doesn't pick up the velocity of the following segment.
        gauss_legendre13(|t| segment.velocity((t - t0) / delta).norm() / delta, a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use traj_math::DVec3;

    fn make_simple_curve() -> PiecewiseCubicCurve<f64> {
        PiecewiseCubicCurve::new([CubicSegment::new([1.0, 2.5, 3.0, 4.0])], [5.0, 6.0]).unwrap()
    }

    #[test]
    fn test_evaluate_clamps() {
        let curve = make_simple_curve();
        assert_eq!(curve.evaluate(4.5), 1.0); // t < first
        assert_eq!(curve.evaluate(5.0), 1.0); // t == first
        assert_eq!(curve.evaluate(5.5), 3.5);
        assert_eq!(curve.evaluate(6.0), 10.5); // t == last
        assert_eq!(curve.evaluate(6.5), 10.5); // last < t
    }

    #[test]
    fn test_evaluate_velocity() {
        let curve = make_simple_curve();
        assert_eq!(curve.evaluate_velocity(5.0), 2.5);
        assert_eq!(curve.evaluate_velocity(5.5), 8.5);
        assert_eq!(curve.evaluate_velocity(6.0), 20.5);
    }

    #[test]
    fn test_integrated_speed() {
        let curve = make_simple_curve();
        assert_abs_diff_eq!(curve.integrated_speed(0, 5.0, 6.0), 9.5, epsilon = 1e-12);
        assert_abs_diff_eq!(curve.integrated_speed(0, 5.0, 5.5), 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_grid_and_domain() {
        let curve = make_simple_curve();
        assert_eq!(curve.grid(), &[5.0, 6.0]);
        assert_eq!(curve.domain(), (5.0, 6.0));
    }

    #[test]
    fn test_evaluate_batch_preserves_order() {
        let curve = make_simple_curve();
        assert_eq!(
            curve.evaluate_batch(&[6.0, 5.0, 5.5]),
            vec![10.5, 1.0, 3.5]
        );
    }

    #[test]
    fn test_segment_lookup() {
        let segments = [
            CubicSegment::new([DVec3::ZERO, DVec3::X, DVec3::ZERO, DVec3::ZERO]),
            CubicSegment::new([DVec3::X, DVec3::Y, DVec3::ZERO, DVec3::ZERO]),
        ];
        let curve = PiecewiseCubicCurve::new(segments, [0.0, 1.0, 3.0]).unwrap();
        assert!(curve.evaluate(0.5).abs_diff_eq(DVec3::new(0.5, 0.0, 0.0), 1e-12));
        assert!(curve.evaluate(2.0).abs_diff_eq(DVec3::new(1.0, 0.5, 0.0), 1e-12));
        // Local parameter of the second segment is scaled by its width
        assert!(curve
            .evaluate_velocity(2.0)
            .abs_diff_eq(DVec3::new(0.0, 0.5, 0.0), 1e-12));
    }

    #[test]
    fn test_construction_errors() {
        let segment = CubicSegment::new([0.0, 1.0, 0.0, 0.0]);
        assert!(PiecewiseCubicCurve::<f64>::new(Vec::new(), vec![0.0]).is_err());
        assert_eq!(
            PiecewiseCubicCurve::new(vec![segment], vec![0.0, 1.0, 2.0]),
            Err(TrajError::LengthMismatch {
                what: "grid",
                actual: 3,
                expected: 2
            })
        );
        assert_eq!(
            PiecewiseCubicCurve::new(vec![segment, segment], vec![0.0, 2.0, 1.0]),
            Err(TrajError::NotAscending {
                what: "grid",
                index: 2
            })
        );
        assert!(PiecewiseCubicCurve::new(vec![segment], vec![0.0, f64::NAN]).is_err());
    }

    #[test]
    fn test_serde_roundtrip_validates() {
        let curve = make_simple_curve();
        let json = serde_json::to_string(&curve).unwrap();
        let back: PiecewiseCubicCurve<f64> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, curve);
        back.validate().unwrap();

        let broken: PiecewiseCubicCurve<f64> = serde_json::from_str(
            r#"{"segments":[{"coefficients":[0.0,1.0,0.0,0.0]}],"grid":[1.0,0.0]}"#,
        )
        .unwrap();
        assert!(broken.validate().is_err());
    }
}
