//! Centripetal Kochanek-Bartels construction.

use serde::{Deserialize, Serialize};
use traj_core::{Result, TrajError};
use traj_math::Vector;

use crate::curve::PiecewiseCubicCurve;

/// Tension, continuity and bias of a Kochanek-Bartels vertex.
///
/// All zero gives a Catmull-Rom-like tangent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Tcb {
    pub tension: f64,
    pub continuity: f64,
    pub bias: f64,
}

impl Tcb {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(tension: f64, continuity: f64, bias: f64) -> Self {
        Self {
            tension,
            continuity,
            bias,
        }
    }

    fn is_finite(&self) -> bool {
        self.tension.is_finite() && self.continuity.is_finite() && self.bias.is_finite()
    }

    /// Blend weights `[a, b, c, d]` of the incoming/outgoing chord.
    fn weights(&self) -> [f64; 4] {
        let Self {
            tension: t,
            continuity: c,
            bias: b,
        } = *self;
        [
            (1.0 - t) * (1.0 + c) * (1.0 + b),
            (1.0 - t) * (1.0 - c) * (1.0 - b),
            (1.0 - t) * (1.0 - c) * (1.0 + b),
            (1.0 - t) * (1.0 + c) * (1.0 - b),
        ]
    }
}

impl From<[f64; 3]> for Tcb {
    fn from([tension, continuity, bias]: [f64; 3]) -> Self {
        Self::new(tension, continuity, bias)
    }
}

/// Expand the accepted TCB layouts to one value per vertex.
///
/// Accepted: none (all zero), one (used for every vertex), one per vertex,
/// or, for open curves, one per interior vertex.
fn tcb_per_vertex(tcb: &[Tcb], vertices: usize, closed: bool) -> Result<Vec<Tcb>> {
    if let Some(index) = tcb.iter().position(|v| !v.is_finite()) {
        return Err(TrajError::NonFinite { what: "TCB", index });
    }
    match tcb.len() {
        0 => Ok(vec![Tcb::ZERO; vertices]),
        1 => Ok(vec![tcb[0]; vertices]),
        n if n == vertices => Ok(tcb.to_vec()),
        n if !closed && n + 2 == vertices => {
            let mut all = Vec::with_capacity(vertices);
            all.push(Tcb::ZERO);
            all.extend_from_slice(tcb);
            all.push(Tcb::ZERO);
            Ok(all)
        }
        n => Err(TrajError::LengthMismatch {
            what: "TCB",
            actual: n,
            expected: vertices,
        }),
    }
}

impl<V: Vector> PiecewiseCubicCurve<V> {
    /// Create a Kochanek-Bartels spline through `positions` with centripetal
    /// parametrization.
    ///
    /// The grid starts at zero and each segment's width is the square root of
    /// its chord length. A closed curve gets one more grid value than there
    /// are positions; the last one belongs to the first position again.
    ///
    /// Open curves use "natural" end tangents (zero second derivative at the
    /// first and last vertex); a curve with two positions is a straight line.
    /// Consecutive identical positions produce a stationary segment.
    pub fn new_centripetal_kochanek_bartels(
        positions: &[V],
        tcb: &[Tcb],
        closed: bool,
    ) -> Result<Self> {
        let vertices = positions.len();
        if vertices < 2 {
            return Err(TrajError::TooFew {
                what: "positions",
                required: 2,
                actual: vertices,
            });
        }
        if let Some(index) = positions.iter().position(|x| !x.all_finite()) {
            return Err(TrajError::NonFinite {
                what: "position",
                index,
            });
        }
        let tcb = tcb_per_vertex(tcb, vertices, closed)?;
        let segments_len = if closed { vertices } else { vertices - 1 };

        let mut positions = positions.to_vec();
        if closed {
            // Wrap around: back to the first vertex, plus one more for its tangent
            positions.push(positions[0]);
            positions.push(positions[1]);
        }

        // Centripetal parametrization
        let deltas: Vec<f64> = positions
            .windows(2)
            .map(|w| (w[1] - w[0]).norm().sqrt())
            .collect();
        let degenerate: Vec<bool> = deltas.iter().map(|&d| d == 0.0).collect();
        let (sum, count) = deltas
            .iter()
            .filter(|&&d| d > 0.0)
            .fold((0.0, 0usize), |(sum, count), &d| (sum + d, count + 1));
        let fallback = if count > 0 { sum / count as f64 } else { 1.0 };

        let mut grid = Vec::with_capacity(positions.len());
        grid.push(0.0);
        for (i, &delta) in deltas.iter().enumerate() {
            let delta = if degenerate[i] {
                if i < segments_len {
                    log::warn!(
                        "repeated position at index {}, segment {} becomes stationary",
                        (i + 1) % vertices,
                        i
                    );
                }
                fallback
            } else {
                delta
            };
            grid.push(grid[i] + delta);
        }

        let mut tangents = Vec::with_capacity(2 * segments_len);
        for i in 0..positions.len() - 2 {
            let (x_1, x0, x1) = (positions[i], positions[i + 1], positions[i + 2]);
            let (t_1, t0, t1) = (grid[i], grid[i + 1], grid[i + 2]);
            let [a, b, c, d] = tcb[(i + 1) % vertices].weights();

            let denominator = (t1 - t0) * (t0 - t_1) * (t1 - t_1);
            let w_in = (t1 - t0).powi(2);
            let w_out = (t0 - t_1).powi(2);
            let incoming = ((x0 - x_1) * (c * w_in) + (x1 - x0) * (d * w_out)) / denominator;
            let outgoing = ((x0 - x_1) * (a * w_in) + (x1 - x0) * (b * w_out)) / denominator;
            tangents.push(incoming);
            tangents.push(outgoing);
        }

        if closed {
            // The last (outgoing) tangent belongs to the first vertex
            tangents.rotate_right(1);
            positions.pop();
            grid.pop();
        } else if vertices == 2 {
            let tangent = (positions[1] - positions[0]) / (grid[1] - grid[0]);
            tangents.push(tangent);
            tangents.push(tangent);
        } else {
            let first = natural_end_tangent(positions[0], positions[1], grid[1] - grid[0], tangents[0]);
            let n = positions.len();
            let last = natural_end_tangent(
                positions[n - 2],
                positions[n - 1],
                grid[n - 1] - grid[n - 2],
                tangents[tangents.len() - 1],
            );
            tangents.insert(0, first);
            tangents.push(last);
        }
        debug_assert_eq!(tangents.len(), 2 * segments_len);

        for segment in (0..segments_len).filter(|&i| degenerate[i]) {
            tangents[2 * segment] = V::ZERO;
            tangents[2 * segment + 1] = V::ZERO;
        }

        log::debug!(
            "centripetal Kochanek-Bartels curve: {} segments, closed: {}, domain: {:?}",
            segments_len,
            closed,
            (grid[0], grid[grid.len() - 1])
        );
        PiecewiseCubicCurve::new_hermite(&positions, &tangents, &grid)
    }
}

/// End tangent with zero second derivative at the end of a segment.
///
/// The formula is symmetric: it serves both the start of the first and the
/// end of the last segment, given the tangent at the segment's other end.
fn natural_end_tangent<V: Vector>(x0: V, x1: V, delta: f64, inner_tangent: V) -> V {
    ((x1 - x0) * 3.0 - inner_tangent * delta) / (2.0 * delta)
}
