use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdvisoryError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid configuration: {table} — {reason}")]
    InvalidConfiguration { table: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for AdvisoryError {
    fn from(e: serde_json::Error) -> Self {
        AdvisoryError::SerializationError(e.to_string())
    }
}

impl AdvisoryError {
    pub(crate) fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        AdvisoryError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_config(table: &str, reason: impl Into<String>) -> Self {
        AdvisoryError::InvalidConfiguration {
            table: table.to_string(),
            reason: reason.into(),
        }
    }
}
