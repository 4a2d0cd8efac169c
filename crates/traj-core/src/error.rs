use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrajError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Too few {what}: at least {required} required, got {actual}")]
    TooFew {
        what: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("Length mismatch: {what} has {actual} elements, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        actual: usize,
        expected: usize,
    },

    #[error("Index {index}: {what} values must be finite")]
    NonFinite { what: &'static str, index: usize },

    #[error("Index {index}: {what} values must be strictly ascending")]
    NotAscending { what: &'static str, index: usize },

    #[error("Index {index}: values must not be decreasing")]
    Decreasing { index: usize },

    #[error("Slope at index {index} too steep ({slope:?}; maximum: {maximum:?})")]
    SlopeTooSteep {
        index: usize,
        slope: f64,
        maximum: f64,
    },

    #[error("Slope at index {index} has wrong sign ({slope:?})")]
    SlopeWrongSign { index: usize, slope: f64 },

    #[error("Negative slope ({slope:?}) at index {index}")]
    NegativeSlope { index: usize, slope: f64 },

    #[error("Speed at index {index} too fast ({speed:?}; maximum: {maximum:?})")]
    TooFast {
        index: usize,
        speed: f64,
        maximum: f64,
    },

    #[error("Negative speed ({speed:?}) at index {index}")]
    NegativeSpeed { index: usize, speed: f64 },

    #[error("Index {index}: speed is only allowed if time is given")]
    SpeedWithoutTime { index: usize },

    #[error("Index {index}: duplicate position without time")]
    DuplicatePositionWithoutTime { index: usize },

    #[error("Value {value:?} is outside of the range [{min:?}, {max:?}]")]
    OutOfRange { value: f64, min: f64, max: f64 },

    #[error("Value {value:?} is reached on a plateau, the solution is not unique")]
    Ambiguous { value: f64 },
}

/// Coarse classification of [`TrajError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Wrong array lengths, too few points, non-finite numbers.
    MalformedInput,
    /// A grid or time sequence that is not (strictly) increasing.
    OrderingViolation,
    /// A requested slope or speed conflicts with monotonicity.
    InfeasibleConstraint,
    /// An inverse query outside of the invertible range.
    OutOfDomain,
}

impl TrajError {
    pub fn kind(&self) -> ErrorKind {
        use TrajError::*;
        match self {
            InvalidInput(_)
            | TooFew { .. }
            | LengthMismatch { .. }
            | NonFinite { .. }
            | SpeedWithoutTime { .. } => ErrorKind::MalformedInput,
            NotAscending { .. } | Decreasing { .. } => ErrorKind::OrderingViolation,
            SlopeTooSteep { .. }
            | SlopeWrongSign { .. }
            | NegativeSlope { .. }
            | TooFast { .. }
            | NegativeSpeed { .. }
            | DuplicatePositionWithoutTime { .. } => ErrorKind::InfeasibleConstraint,
            OutOfRange { .. } | Ambiguous { .. } => ErrorKind::OutOfDomain,
        }
    }
}

pub type Result<T> = std::result::Result<T, TrajError>;
