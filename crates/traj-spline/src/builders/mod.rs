//! Constructions that turn control data into a [`PiecewiseCubicCurve`](crate::PiecewiseCubicCurve).

mod hermite;
mod kochanek_bartels;
mod shape_preserving;

pub use kochanek_bartels::Tcb;
