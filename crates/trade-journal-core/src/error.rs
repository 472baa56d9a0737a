use thiserror::Error;

#[derive(Debug, Error)]
pub enum JournalError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for JournalError {
    fn from(e: serde_json::Error) -> Self {
        JournalError::SerializationError(e.to_string())
    }
}

impl From<serde_yaml::Error> for JournalError {
    fn from(e: serde_yaml::Error) -> Self {
        JournalError::SerializationError(e.to_string())
    }
}
