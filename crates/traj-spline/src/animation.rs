//! Animation spline: where a path goes, and when it gets there.

use traj_core::{Result, Tolerance, TrajError};
use traj_math::Vector;

use crate::arc_length::ArcLengthCurve;
use crate::builders::Tcb;
use crate::curve::{Curve, CurveWithVelocity, PiecewiseCubicCurve};
use crate::monotone::MonotoneCubicSpline;

/// A geometric path combined with a monotone map from time to arc length.
///
/// The path is traversed with unit speed with respect to arc length, so the
/// speed of the animation at any time is the slope of the time map.
/// The grid holds the time of every vertex (plus the time of returning to
/// the first vertex for closed splines).
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationSpline<V> {
    path: ArcLengthCurve<V>,
    time_map: MonotoneCubicSpline,
    grid: Box<[f64]>,
}

impl<V: Vector> AnimationSpline<V> {
    /// Create an animation through `positions` along a centripetal
    /// Kochanek-Bartels path.
    ///
    /// `times` has one entry per position (one more if `closed`), `speeds`
    /// one entry per position; empty slices mean "nothing given".
    /// Missing times are derived from the arc length of the path.
    pub fn new(
        positions: &[V],
        times: &[Option<f64>],
        speeds: &[Option<f64>],
        tcb: &[Tcb],
        closed: bool,
    ) -> Result<Self> {
        Self::new_with_tolerance(positions, times, speeds, tcb, closed, Tolerance::default())
    }

    pub fn new_with_tolerance(
        positions: &[V],
        times: &[Option<f64>],
        speeds: &[Option<f64>],
        tcb: &[Tcb],
        closed: bool,
        tolerance: Tolerance,
    ) -> Result<Self> {
        let vertices = positions.len();
        check_length("times", times, vertices + closed as usize)?;
        check_length("speeds", speeds, vertices)?;
        let path = PiecewiseCubicCurve::new_centripetal_kochanek_bartels(positions, tcb, closed)?;
        Self::from_curve_with_tolerance(path, times, speeds, closed, tolerance)
    }

    /// Create an animation along a user-specified path.
    ///
    /// Each grid value of `path` is a vertex; for closed paths the last one
    /// denotes the first vertex again.
    pub fn from_curve(
        path: PiecewiseCubicCurve<V>,
        times: &[Option<f64>],
        speeds: &[Option<f64>],
        closed: bool,
    ) -> Result<Self> {
        Self::from_curve_with_tolerance(path, times, speeds, closed, Tolerance::default())
    }

    pub fn from_curve_with_tolerance(
        path: PiecewiseCubicCurve<V>,
        times: &[Option<f64>],
        speeds: &[Option<f64>],
        closed: bool,
        tolerance: Tolerance,
    ) -> Result<Self> {
        let len = path.grid().len();
        if closed && len < 3 {
            return Err(TrajError::TooFew {
                what: "segments in closed path",
                required: 2,
                actual: len - 1,
            });
        }
        let vertices = len - closed as usize;
        check_length("times", times, len)?;
        check_length("speeds", speeds, vertices)?;

        let mut times = if times.is_empty() {
            vec![None; len]
        } else {
            times.to_vec()
        };
        let mut speeds = if speeds.is_empty() {
            vec![None; vertices]
        } else {
            speeds.to_vec()
        };
        if let Some(index) = times.iter().position(|t| t.is_some_and(|t| !t.is_finite())) {
            return Err(TrajError::NonFinite { what: "time", index });
        }
        if let Some(index) = speeds.iter().position(|s| s.is_some_and(|s| !s.is_finite())) {
            return Err(TrajError::NonFinite {
                what: "speed",
                index,
            });
        }
        if let Some(index) = (0..vertices).find(|&i| times[i].is_none() && speeds[i].is_some()) {
            return Err(TrajError::SpeedWithoutTime { index });
        }
        if closed {
            // Returning to the first vertex uses its speed again
            speeds.push(speeds[0]);
        }

        let path = ArcLengthCurve::with_tolerance(path, tolerance);
        let lengths = path.grid();

        if times[0].is_none() {
            times[0] = Some(0.0);
        }
        if times[len - 1].is_none() {
            // Unit average speed over the tail, one time unit per vertex if it has no length
            let (previous, time) = times
                .iter()
                .enumerate()
                .rev()
                .find_map(|(i, t)| t.map(|t| (i, t)))
                .unwrap_or((0, 0.0));
            let remaining = lengths[len - 1] - lengths[previous];
            let duration = if remaining > 0.0 {
                remaining
            } else {
                (len - 1 - previous) as f64
            };
            times[len - 1] = Some(time + duration);
        }

        let mut given = Vec::with_capacity(len);
        let mut given_times = Vec::with_capacity(len);
        for (i, time) in times.iter().enumerate() {
            if let Some(time) = *time {
                given.push(i);
                given_times.push(time);
            }
        }
        if let Some(k) = given_times.windows(2).position(|w| w[0] >= w[1]) {
            return Err(TrajError::NotAscending {
                what: "time",
                index: given[k + 1],
            });
        }
        let given_lengths: Vec<f64> = given.iter().map(|&i| lengths[i]).collect();
        let given_speeds: Vec<Option<f64>> = given.iter().map(|&i| speeds[i]).collect();
        let vertex = |k: usize| given[k] % vertices;
        let time_map = MonotoneCubicSpline::with_slopes(&given_lengths, &given_speeds, &given_times)
            .map_err(|e| match e {
                TrajError::SlopeTooSteep {
                    index,
                    slope,
                    maximum,
                } => TrajError::TooFast {
                    index: vertex(index),
                    speed: slope,
                    maximum,
                },
                TrajError::NegativeSlope { index, slope } => TrajError::NegativeSpeed {
                    index: vertex(index),
                    speed: slope,
                },
                other => other,
            })?
            .with_tolerance(tolerance);

        let mut grid = Vec::with_capacity(len);
        for (i, time) in times.iter().enumerate() {
            let time = match *time {
                Some(time) => time,
                None => time_map.invert(lengths[i]).map_err(|e| match e {
                    TrajError::Ambiguous { .. } => TrajError::DuplicatePositionWithoutTime { index: i },
                    other => other,
                })?,
            };
            grid.push(time);
        }
        if let Some(k) = grid.windows(2).position(|w| w[0] >= w[1]) {
            // Given times are ascending, so one of the two was solved for
            let index = if times[k + 1].is_none() { k + 1 } else { k };
            return Err(TrajError::DuplicatePositionWithoutTime { index });
        }

        log::debug!(
            "animation spline: {} vertices, closed: {}, length {:.6}, times {:?}",
            vertices,
            closed,
            path.length(),
            grid
        );
        Ok(Self {
            path,
            time_map,
            grid: grid.into(),
        })
    }

    /// The path, parametrized by arc length.
    pub fn path(&self) -> &ArcLengthCurve<V> {
        &self.path
    }

    /// The map from time to arc length along [`path`](Self::path).
    pub fn time_map(&self) -> &MonotoneCubicSpline {
        &self.time_map
    }
}

fn check_length(what: &'static str, given: &[Option<f64>], expected: usize) -> Result<()> {
    if !given.is_empty() && given.len() != expected {
        return Err(TrajError::LengthMismatch {
            what,
            actual: given.len(),
            expected,
        });
    }
    Ok(())
}

impl<V: Vector> Curve<V> for AnimationSpline<V> {
    fn evaluate(&self, t: f64) -> V {
        self.path.evaluate(self.time_map.evaluate(t))
    }

    fn grid(&self) -> &[f64] {
        &self.grid
    }
}

impl<V: Vector> CurveWithVelocity<V, V> for AnimationSpline<V> {
    fn evaluate_velocity(&self, t: f64) -> V {
        let s = self.time_map.evaluate(t);
        self.path.evaluate_velocity(s) * self.time_map.evaluate_velocity(t)
    }

    /// Distance travelled between the times `a` and `b`.
    fn integrated_speed(&self, _index: usize, a: f64, b: f64) -> f64 {
        self.time_map.evaluate(b) - self.time_map.evaluate(a)
    }
}
