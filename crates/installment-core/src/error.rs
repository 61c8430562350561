use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstallmentError {
    #[error("Plan index {index} out of range (plan set holds {len} plans)")]
    PlanIndexOutOfRange { index: usize, len: usize },

    #[error("Invalid field: {field} — {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Unknown interest type: {0}")]
    UnknownInterestModel(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for InstallmentError {
    fn from(e: serde_json::Error) -> Self {
        InstallmentError::SerializationError(e.to_string())
    }
}
