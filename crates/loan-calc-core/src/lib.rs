pub mod amortization;
pub mod error;
pub mod format;
pub mod types;

pub use error::LoanCalcError;
pub use types::*;

/// Standard result type for all loan-calc operations
pub type LoanCalcResult<T> = Result<T, LoanCalcError>;
