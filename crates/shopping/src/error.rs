use thiserror::Error;

/// Failures of the storage collaborator.
///
/// Parsing, canonicalization, categorization and conversion never fail;
/// only reading or writing the persisted list can.
#[derive(Debug, Error)]
pub enum GroceryError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for grocery storage operations
pub type GroceryResult<T> = Result<T, GroceryError>;
