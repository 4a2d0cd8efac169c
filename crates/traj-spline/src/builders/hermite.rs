//! Cubic Hermite construction from positions, tangents and a grid.

use traj_core::{Result, TrajError};
use traj_math::Vector;

use crate::curve::{CubicSegment, PiecewiseCubicCurve};

impl<V: Vector> PiecewiseCubicCurve<V> {
    /// Create a curve through `positions` at the parameters in `grid`.
    ///
    /// `tangents` holds two derivatives per segment: the outgoing tangent at
    /// the segment's start followed by the incoming tangent at its end.
    /// Different incoming/outgoing tangents at a vertex produce a corner.
    pub fn new_hermite(positions: &[V], tangents: &[V], grid: &[f64]) -> Result<Self> {
        if positions.len() < 2 {
            return Err(TrajError::TooFew {
                what: "positions",
                required: 2,
                actual: positions.len(),
            });
        }
        let segments_len = positions.len() - 1;
        if tangents.len() != 2 * segments_len {
            return Err(TrajError::LengthMismatch {
                what: "tangents",
                actual: tangents.len(),
                expected: 2 * segments_len,
            });
        }
        if grid.len() != positions.len() {
            return Err(TrajError::LengthMismatch {
                what: "grid",
                actual: grid.len(),
                expected: positions.len(),
            });
        }
        if let Some(index) = positions.iter().position(|x| !x.all_finite()) {
            return Err(TrajError::NonFinite {
                what: "position",
                index,
            });
        }
        if let Some(index) = tangents.iter().position(|v| !v.all_finite()) {
            return Err(TrajError::NonFinite {
                what: "tangent",
                index,
            });
        }

        let segments: Vec<_> = (0..segments_len)
            .map(|i| {
                CubicSegment::from_hermite(
                    positions[i],
                    positions[i + 1],
                    tangents[2 * i],
                    tangents[2 * i + 1],
                    grid[i + 1] - grid[i],
                )
            })
            .collect();
        PiecewiseCubicCurve::new(segments, grid)
    }
}
