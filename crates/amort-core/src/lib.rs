pub mod error;
pub mod schedule;
pub mod types;

pub use error::AmortError;
pub use types::*;

/// Standard result type for all amortization operations
pub type AmortResult<T> = Result<T, AmortError>;
