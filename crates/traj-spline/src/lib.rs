//! TrajEngine splines: piecewise cubic curves and the builders that create them.
//!
//! - [`PiecewiseCubicCurve`]: segments + grid, evaluated by segment lookup and Horner's method
//! - [`builders`]: cubic Hermite, centripetal Kochanek-Bartels and shape-preserving constructions
//! - [`MonotoneCubicSpline`]: non-decreasing scalar spline with inverse lookup
//! - [`ArcLengthCurve`]: a curve re-parametrized by its arc length
//! - [`AnimationSpline`]: geometric path combined with a monotone time-to-arc-length map

pub mod animation;
pub mod arc_length;
pub mod builders;
pub mod curve;
pub mod monotone;

pub use animation::AnimationSpline;
pub use arc_length::ArcLengthCurve;
pub use builders::Tcb;
pub use curve::{CubicSegment, Curve, CurveWithVelocity, PiecewiseCubicCurve};
pub use monotone::MonotoneCubicSpline;
