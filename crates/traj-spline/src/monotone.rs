//! Monotone (non-decreasing) cubic spline with inverse lookup.

use serde::{Deserialize, Serialize};
use traj_core::{Result, Tolerance, TrajError, Validate};
use traj_math::roots::bisect;

use crate::curve::{Curve, CurveWithVelocity, PiecewiseCubicCurve};

/// A shape-preserving cubic spline through non-decreasing values.
///
/// Because the spline never decreases, it can be inverted: [`invert`]
/// answers "at which grid parameter is this value reached?".
///
/// [`invert`]: MonotoneCubicSpline::invert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonotoneCubicSpline {
    inner: PiecewiseCubicCurve<f64>,
    values: Box<[f64]>,
    #[serde(default)]
    tolerance: Tolerance,
}

impl MonotoneCubicSpline {
    pub fn new(values: &[f64], grid: &[f64]) -> Result<Self> {
        Self::with_slopes(values, &[], grid)
    }

    /// Like [`new`](Self::new), with optional slopes at some (or all) values.
    ///
    /// `slopes` is either empty or has one entry per value.
    pub fn with_slopes(values: &[f64], slopes: &[Option<f64>], grid: &[f64]) -> Result<Self> {
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(TrajError::NonFinite {
                what: "value",
                index,
            });
        }
        if let Some(index) = values.windows(2).position(|w| w[1] < w[0]) {
            return Err(TrajError::Decreasing { index: index + 1 });
        }
        if let Some((index, slope)) = slopes
            .iter()
            .enumerate()
            .find_map(|(i, s)| s.filter(|&s| s < 0.0).map(|s| (i, s)))
        {
            return Err(TrajError::NegativeSlope { index, slope });
        }
        let inner = PiecewiseCubicCurve::new_piecewise_monotone_with_slopes(values, slopes, grid, false)?;
        Ok(Self {
            inner,
            values: values.into(),
            tolerance: Tolerance::default(),
        })
    }

    /// Replace the tolerance used by [`invert`](Self::invert).
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    /// Find the grid parameter at which the spline reaches `value`.
    ///
    /// Values given at construction map exactly to their grid value.
    /// A value that is reached on a flat part of the spline has no unique
    /// solution and is reported as [`TrajError::Ambiguous`].
    pub fn invert(&self, value: f64) -> Result<f64> {
        let values = &self.values;
        let grid = self.inner.grid();
        let (min, max) = (values[0], values[values.len() - 1]);
        if !(min..=max).contains(&value) {
            return Err(TrajError::OutOfRange { value, min, max });
        }
        let lower = values.partition_point(|&v| v < value);
        let upper = values.partition_point(|&v| v <= value);
        match upper - lower {
            0 => {}
            1 => return Ok(grid[lower]),
            _ => return Err(TrajError::Ambiguous { value }),
        }
        // values[lower - 1] < value < values[lower]
        let index = lower - 1;
        let segment = &self.inner.segments()[index];
        let u = bisect(
            |u| segment.evaluate(u) - value,
            0.0,
            1.0,
            self.tolerance.absolute(1.0),
            self.tolerance.max_iterations,
        );
        Ok(grid[index] + u * (grid[index + 1] - grid[index]))
    }

    pub fn inner(&self) -> &PiecewiseCubicCurve<f64> {
        &self.inner
    }

    pub fn into_inner(self) -> PiecewiseCubicCurve<f64> {
        self.inner
    }

    /// Values at the grid parameters.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

impl Validate for MonotoneCubicSpline {
    fn validate(&self) -> Result<()> {
        self.inner.validate()?;
        if self.values.len() != self.inner.grid().len() {
            return Err(TrajError::LengthMismatch {
                what: "values",
                actual: self.values.len(),
                expected: self.inner.grid().len(),
            });
        }
        if let Some(index) = self.values.iter().position(|v| !v.is_finite()) {
            return Err(TrajError::NonFinite {
                what: "value",
                index,
            });
        }
        if let Some(index) = self.values.windows(2).position(|w| w[1] < w[0]) {
            return Err(TrajError::Decreasing { index: index + 1 });
        }
        Ok(())
    }
}

impl Curve<f64> for MonotoneCubicSpline {
    fn evaluate(&self, t: f64) -> f64 {
        self.inner.evaluate(t)
    }

    fn grid(&self) -> &[f64] {
        self.inner.grid()
    }
}

impl CurveWithVelocity<f64, f64> for MonotoneCubicSpline {
    fn evaluate_velocity(&self, t: f64) -> f64 {
        self.inner.evaluate_velocity(t)
    }

    fn integrated_speed(&self, index: usize, a: f64, b: f64) -> f64 {
        self.inner.integrated_speed(index, a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_linear_inverse() {
        let spline = MonotoneCubicSpline::new(&[0.0, 2.0], &[1.0, 3.0]).unwrap();
        assert_eq!(spline.invert(0.0), Ok(1.0));
        assert_eq!(spline.invert(2.0), Ok(3.0));
        assert_abs_diff_eq!(spline.invert(0.5).unwrap(), 1.5, epsilon = 1e-10);
    }

    #[test]
    fn test_inverse_recovers_parameter() {
        let values = [0.0, 0.1, 2.0, 2.0, 2.5, 7.0];
        let grid = [0.0, 1.0, 1.5, 3.0, 3.1, 5.0];
        let spline = MonotoneCubicSpline::new(&values, &grid).unwrap();
        for k in 0..100 {
            let t = 5.0 * k as f64 / 100.0;
            if (1.5..=3.0).contains(&t) {
                continue; // plateau
            }
            let value = spline.evaluate(t);
            assert_abs_diff_eq!(spline.invert(value).unwrap(), t, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_plateau_is_ambiguous() {
        let spline = MonotoneCubicSpline::new(&[1.0, 2.0, 2.0, 3.0], &[0.0, 1.0, 2.0, 3.0]).unwrap();
        assert_eq!(spline.invert(2.0), Err(TrajError::Ambiguous { value: 2.0 }));
        assert!(spline.invert(1.9).unwrap() < 1.0);
        assert!(spline.invert(2.1).unwrap() > 2.0);
    }

    #[test]
    fn test_out_of_range() {
        let spline = MonotoneCubicSpline::new(&[1.0, 2.0], &[0.0, 1.0]).unwrap();
        assert_eq!(
            spline.invert(2.5),
            Err(TrajError::OutOfRange {
                value: 2.5,
                min: 1.0,
                max: 2.0
            })
        );
        assert!(spline.invert(0.5).is_err());
        assert!(spline.invert(f64::NAN).is_err());
    }

    #[test]
    fn test_non_decreasing() {
        let spline = MonotoneCubicSpline::new(&[0.0, 3.0, 3.5, 10.0], &[0.0, 1.0, 4.0, 5.0]).unwrap();
        let mut previous = spline.evaluate(-1.0);
        for k in 0..=200 {
            let value = spline.evaluate(5.0 * k as f64 / 200.0);
            assert!(value >= previous - 1e-12);
            previous = value;
        }
    }

    #[test]
    fn test_construction_errors() {
        assert_eq!(
            MonotoneCubicSpline::new(&[1.0, 0.0], &[0.0, 1.0]),
            Err(TrajError::Decreasing { index: 1 })
        );
        assert_eq!(
            MonotoneCubicSpline::with_slopes(&[0.0, 1.0], &[None, Some(-1.0)], &[0.0, 1.0]),
            Err(TrajError::NegativeSlope {
                index: 1,
                slope: -1.0
            })
        );
        assert!(matches!(
            MonotoneCubicSpline::with_slopes(&[0.0, 1.0], &[Some(4.0), None], &[0.0, 1.0]),
            Err(TrajError::SlopeTooSteep { index: 0, .. })
        ));
        assert!(MonotoneCubicSpline::new(&[0.0, 1.0], &[0.0, 0.0]).is_err());
    }

    #[test]
    fn test_tolerance() {
        let spline = MonotoneCubicSpline::new(&[0.0, 1.0, 4.0], &[0.0, 1.0, 2.0])
            .unwrap()
            .with_tolerance(Tolerance::loose());
        assert_eq!(spline.tolerance(), Tolerance::loose());
        let t = spline.invert(spline.evaluate(1.3)).unwrap();
        assert_abs_diff_eq!(t, 1.3, epsilon = 1e-5);
    }

    #[test]
    fn test_serde_roundtrip() {
        let spline = MonotoneCubicSpline::new(&[0.0, 1.0, 4.0], &[0.0, 1.0, 2.0]).unwrap();
        let json = serde_json::to_string(&spline).unwrap();
        let back: MonotoneCubicSpline = serde_json::from_str(&json).unwrap();
        back.validate().unwrap();
        assert_eq!(back.values(), spline.values());
        for t in [0.0, 0.3, 1.0, 1.7, 2.0] {
            assert_abs_diff_eq!(back.evaluate(t), spline.evaluate(t), epsilon = 1e-12);
        }

        let broken: MonotoneCubicSpline = serde_json::from_str(
            r#"{"inner":{"segments":[{"coefficients":[1.0,-1.0,0.0,0.0]}],"grid":[0.0,1.0]},"values":[1.0,0.0]}"#,
        )
        .unwrap();
        assert_eq!(broken.validate(), Err(TrajError::Decreasing { index: 1 }));
        assert_eq!(broken.tolerance(), Tolerance::default());
    }
}
