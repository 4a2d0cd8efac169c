//! TrajEngine math: curve value types, grid lookup, root finding and quadrature.

pub mod grid;
pub mod quadrature;
pub mod roots;
pub mod vector;

pub use glam::{DVec2, DVec3};
pub use vector::Vector;
