pub mod error;
pub mod tolerance;
pub mod traits;

pub use error::{ErrorKind, Result, TrajError};
pub use tolerance::Tolerance;
pub use traits::Validate;
