use crate::error::Result;

/// Validate structural integrity of a curve or spline.
///
/// Construction already enforces these invariants; this is for values that
/// bypassed the constructors (e.g. deserialized data).
pub trait Validate {
    fn validate(&self) -> Result<()>;
}
