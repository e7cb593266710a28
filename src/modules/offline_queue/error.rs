use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueueError {
    /// Local store missing, full or failing
    #[error("Local queue storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Server rejected report ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<sqlx::Error> for QueueError {
    fn from(err: sqlx::Error) -> Self {
        QueueError::StorageUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for QueueError {
    fn from(err: serde_json::Error) -> Self {
        QueueError::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for QueueError {
    fn from(err: reqwest::Error) -> Self {
        QueueError::Network(err.to_string())
    }
}
