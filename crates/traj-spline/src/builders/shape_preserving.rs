//! Shape-preserving cubic construction for scalar values.
//!
//! Between every pair of neighbouring values the curve is monotone, so it
//! never overshoots the given data.

use traj_core::{Result, TrajError};
use traj_math::grid::check_grid;

use crate::curve::PiecewiseCubicCurve;

impl PiecewiseCubicCurve<f64> {
    /// Create a shape-preserving curve, choosing all slopes automatically.
    pub fn new_piecewise_monotone(values: &[f64], grid: &[f64], closed: bool) -> Result<Self> {
        Self::new_piecewise_monotone_with_slopes(values, &[], grid, closed)
    }

    /// Create a shape-preserving curve with optionally given slopes.
    ///
    /// `slopes` is either empty or has one entry per value; `None` entries
    /// are chosen automatically. Given slopes are checked against the
    /// monotonicity constraint but never modified.
    ///
    /// For closed curves, `grid` has one more entry than `values`, the last
    /// one belonging to the first value again.
    pub fn new_piecewise_monotone_with_slopes(
        values: &[f64],
        slopes: &[Option<f64>],
        grid: &[f64],
        closed: bool,
    ) -> Result<Self> {
        let len = values.len();
        if len < 2 {
            return Err(TrajError::TooFew {
                what: "values",
                required: 2,
                actual: len,
            });
        }
        let mut slopes = if slopes.is_empty() {
            vec![None; len]
        } else if slopes.len() == len {
            slopes.to_vec()
        } else {
            return Err(TrajError::LengthMismatch {
                what: "slopes",
                actual: slopes.len(),
                expected: len,
            });
        };
        let expected = if closed { len + 1 } else { len };
        if grid.len() != expected {
            return Err(TrajError::LengthMismatch {
                what: "grid",
                actual: grid.len(),
                expected,
            });
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(TrajError::NonFinite {
                what: "value",
                index,
            });
        }
        if let Some(index) = slopes.iter().position(|s| s.is_some_and(|s| !s.is_finite())) {
            return Err(TrajError::NonFinite {
                what: "slope",
                index,
            });
        }
        check_grid("grid", grid)?;

        let mut values = values.to_vec();
        let mut grid = grid.to_vec();
        if closed {
            // Back to the first value, plus its successor for the wrap slope
            values.push(values[0]);
            values.push(values[1]);
            slopes.push(slopes[0]);
            slopes.push(slopes[1]);
            grid.push(grid[len] + (grid[1] - grid[0]));
        }

        let secants: Vec<f64> = values
            .windows(2)
            .zip(grid.windows(2))
            .map(|(x, t)| (x[1] - x[0]) / (t[1] - t[0]))
            .collect();

        let mut tangents = Vec::with_capacity(values.len());
        for i in 1..values.len() - 1 {
            let (left, right) = (secants[i - 1], secants[i]);
            let slope = match slopes[i] {
                Some(slope) => verify_slope(slope, left, right, i % len)?,
                None => {
                    let h0 = grid[i] - grid[i - 1];
                    let h1 = grid[i + 1] - grid[i];
                    fix_slope(harmonic_slope(left, right, h0, h1), left, right)
                }
            };
            tangents.push(slope);
        }

        if closed {
            // The slope at the wrap belongs to the first value as well
            tangents.rotate_right(1);
            tangents.push(tangents[0]);
            values.pop();
            grid.pop();
        } else if len == 2 {
            let first = calculate_slope(slopes[0], slopes[1], secants[0], 0)?;
            let last = calculate_slope(slopes[1], slopes[0], secants[0], 1)?;
            tangents.push(first);
            tangents.push(last);
        } else {
            let first = calculate_slope(slopes[0], Some(tangents[0]), secants[0], 0)?;
            let last = calculate_slope(
                slopes[len - 1],
                tangents.last().copied(),
                secants[len - 2],
                len - 1,
            )?;
            tangents.insert(0, first);
            tangents.push(last);
        }
        debug_assert_eq!(tangents.len(), values.len());

        // One tangent per vertex: incoming and outgoing are the same
        let tangents: Vec<f64> = tangents
            .windows(2)
            .flat_map(|pair| [pair[0], pair[1]])
            .collect();
        PiecewiseCubicCurve::new_hermite(&values, &tangents, &grid)
    }
}

/// Weighted harmonic mean of the neighbouring secants (Fritsch-Butland).
///
/// `h0` and `h1` are the widths of the left and right interval.
/// Zero at local extrema and next to flat intervals.
pub(crate) fn harmonic_slope(left: f64, right: f64, h0: f64, h1: f64) -> f64 {
    if left * right <= 0.0 {
        return 0.0;
    }
    let w1 = 2.0 * h1 + h0;
    let w2 = h1 + 2.0 * h0;
    (w1 + w2) / (w1 / left + w2 / right)
}

/// Limit a slope to the range that keeps both adjacent segments monotone.
pub(crate) fn fix_slope(slope: f64, left: f64, right: f64) -> f64 {
    if left * right <= 0.0 {
        return 0.0;
    }
    let maximum = 3.0 * left.abs().min(right.abs());
    if left > 0.0 {
        slope.clamp(0.0, maximum)
    } else {
        slope.clamp(-maximum, 0.0)
    }
}

/// Check a given slope against the monotonicity constraint.
pub(crate) fn verify_slope(slope: f64, left: f64, right: f64, index: usize) -> Result<f64> {
    if left * right <= 0.0 {
        if slope != 0.0 {
            return Err(TrajError::SlopeTooSteep {
                index,
                slope,
                maximum: 0.0,
            });
        }
        return Ok(slope);
    }
    if slope * left < 0.0 {
        return Err(TrajError::SlopeWrongSign { index, slope });
    }
    let maximum = 3.0 * left.abs().min(right.abs());
    if slope.abs() > maximum {
        return Err(TrajError::SlopeTooSteep {
            index,
            slope,
            maximum,
        });
    }
    Ok(slope)
}

/// Slope at the free end of a segment, given the slope at its other end.
///
/// The segment's curvature keeps its sign.
pub(crate) fn end_slope(inner: f64, chord: f64) -> f64 {
    if chord < 0.0 {
        return -end_slope(-inner, -chord);
    }
    if inner <= chord {
        3.0 * chord - 2.0 * inner
    } else {
        (3.0 * chord - inner) / 2.0
    }
}

/// Slope at an end vertex: verified if given, otherwise derived from the
/// other end of the segment (or the chord if that is unknown as well).
pub(crate) fn calculate_slope(
    main: Option<f64>,
    other: Option<f64>,
    chord: f64,
    index: usize,
) -> Result<f64> {
    match (main, other) {
        (Some(slope), _) => verify_slope(slope, chord, chord, index),
        (None, Some(other)) => Ok(end_slope(other, chord)),
        (None, None) => Ok(chord),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{Curve, CurveWithVelocity};
    use approx::assert_abs_diff_eq;

    fn assert_monotone_between_values(curve: &PiecewiseCubicCurve<f64>) {
        let grid = curve.grid();
        for w in grid.windows(2) {
            let (a, b) = (curve.evaluate(w[0]), curve.evaluate(w[1]));
            let (low, high) = (a.min(b), a.max(b));
            let steps = 50;
            let mut previous = a;
            for k in 1..=steps {
                let t = w[0] + (w[1] - w[0]) * k as f64 / steps as f64;
                let x = curve.evaluate(t);
                assert!(x >= low - 1e-12 && x <= high + 1e-12, "overshoot at {t}");
                assert!((x - previous) * (b - a) >= -1e-12, "not monotone at {t}");
                previous = x;
            }
        }
    }

    #[test]
    fn test_harmonic_slope() {
        assert_eq!(harmonic_slope(1.0, -1.0, 1.0, 1.0), 0.0);
        assert_eq!(harmonic_slope(0.0, 2.0, 1.0, 1.0), 0.0);
        assert_abs_diff_eq!(harmonic_slope(2.0, 2.0, 1.0, 3.0), 2.0, epsilon = 1e-12);
        // Closer to the smaller secant
        let m = harmonic_slope(1.0, 4.0, 1.0, 1.0);
        assert!(m > 1.0 && m < 2.5);
    }

    #[test]
    fn test_fix_slope() {
        assert_eq!(fix_slope(5.0, 1.0, 2.0), 3.0);
        assert_eq!(fix_slope(-5.0, -1.0, -2.0), -3.0);
        assert_eq!(fix_slope(-1.0, 1.0, 2.0), 0.0);
        assert_eq!(fix_slope(1.5, 1.0, 2.0), 1.5);
        assert_eq!(fix_slope(1.5, 1.0, -2.0), 0.0);
    }

    #[test]
    fn test_verify_slope() {
        assert_eq!(verify_slope(2.0, 1.0, 1.0, 3), Ok(2.0));
        assert_eq!(verify_slope(0.0, 1.0, 1.0, 3), Ok(0.0));
        assert_eq!(
            verify_slope(4.0, 1.0, 2.0, 3),
            Err(TrajError::SlopeTooSteep {
                index: 3,
                slope: 4.0,
                maximum: 3.0
            })
        );
        assert_eq!(
            verify_slope(-1.0, 1.0, 2.0, 3),
            Err(TrajError::SlopeWrongSign {
                index: 3,
                slope: -1.0
            })
        );
        assert!(verify_slope(0.5, 1.0, -1.0, 0).is_err());
    }

    #[test]
    fn test_end_slope() {
        assert_eq!(end_slope(0.0, 1.0), 3.0);
        assert_eq!(end_slope(1.0, 1.0), 1.0);
        assert_eq!(end_slope(3.0, 1.0), 0.0);
        assert_eq!(end_slope(0.0, -1.0), -3.0);
    }

    #[test]
    fn test_two_values_are_linear() {
        let curve = PiecewiseCubicCurve::new_piecewise_monotone(&[1.0, 3.0], &[0.0, 2.0], false).unwrap();
        assert_abs_diff_eq!(curve.evaluate(0.5), 1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(curve.evaluate_velocity(1.7), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_no_overshoot() {
        let values = [0.0, 1.0, 1.0, 5.0, 2.0, 2.5, -1.0];
        let grid = [0.0, 1.0, 1.5, 2.0, 4.0, 4.2, 7.0];
        let curve = PiecewiseCubicCurve::new_piecewise_monotone(&values, &grid, false).unwrap();
        for (&t, &x) in grid.iter().zip(&values) {
            assert_abs_diff_eq!(curve.evaluate(t), x, epsilon = 1e-12);
        }
        assert_monotone_between_values(&curve);
        // Local extrema have zero slope
        assert_abs_diff_eq!(curve.evaluate_velocity(2.0), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_closed() {
        let values = [0.0, 2.0, 3.0, 1.0];
        let grid = [0.0, 1.0, 2.0, 3.0, 4.0];
        let curve = PiecewiseCubicCurve::new_piecewise_monotone(&values, &grid, true).unwrap();
        assert_abs_diff_eq!(curve.evaluate(4.0), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(
            curve.evaluate_velocity(0.0),
            curve.evaluate_velocity(4.0),
            epsilon = 1e-12
        );
        assert_monotone_between_values(&curve);
    }

    #[test]
    fn test_given_slopes() {
        let values = [0.0, 1.0, 2.0];
        let grid = [0.0, 1.0, 2.0];
        let curve = PiecewiseCubicCurve::new_piecewise_monotone_with_slopes(
            &values,
            &[Some(0.0), Some(2.5), None],
            &grid,
            false,
        )
        .unwrap();
        assert_abs_diff_eq!(curve.evaluate_velocity(0.0), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(curve.evaluate_velocity(1.0), 2.5, epsilon = 1e-12);
        assert_abs_diff_eq!(curve.evaluate_velocity(2.0), 0.25, epsilon = 1e-12);
        assert_monotone_between_values(&curve);

        assert_eq!(
            PiecewiseCubicCurve::new_piecewise_monotone_with_slopes(
                &values,
                &[None, Some(3.5), None],
                &grid,
                false,
            ),
            Err(TrajError::SlopeTooSteep {
                index: 1,
                slope: 3.5,
                maximum: 3.0
            })
        );
    }

    #[test]
    fn test_errors() {
        assert!(PiecewiseCubicCurve::new_piecewise_monotone(&[1.0], &[0.0], false).is_err());
        assert!(PiecewiseCubicCurve::new_piecewise_monotone(&[1.0, 2.0], &[0.0, 1.0], true).is_err());
        assert_eq!(
            PiecewiseCubicCurve::new_piecewise_monotone_with_slopes(&[1.0, 2.0], &[None], &[0.0, 1.0], false),
            Err(TrajError::LengthMismatch {
                what: "slopes",
                actual: 1,
                expected: 2
            })
        );
        assert!(matches!(
            PiecewiseCubicCurve::new_piecewise_monotone(&[1.0, 2.0, 3.0], &[0.0, 2.0, 1.0], false),
            Err(TrajError::NotAscending { index: 2, .. })
        ));
    }
}
