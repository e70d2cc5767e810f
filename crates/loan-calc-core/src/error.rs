use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoanCalcError {
    #[error("Invalid loan term: {field} — {reason}")]
    InvalidTerm { field: String, reason: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl LoanCalcError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        LoanCalcError::InvalidTerm {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for LoanCalcError {
    fn from(e: serde_json::Error) -> Self {
        LoanCalcError::SerializationError(e.to_string())
    }
}
