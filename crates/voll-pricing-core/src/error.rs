use thiserror::Error;

#[derive(Debug, Error)]
pub enum PricingError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Snapshot not found: {0}")]
    SnapshotNotFound(String),

    #[error("Owner '{owner_id}' is not allowed to modify snapshot {snapshot_id}")]
    Unauthorized {
        owner_id: String,
        snapshot_id: String,
    },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for PricingError {
    fn from(e: serde_json::Error) -> Self {
        PricingError::SerializationError(e.to_string())
    }
}
