//! Store error types

use thiserror::Error;

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique constraint violation (email, provider identity)
    #[error("Duplicate record: {0}")]
    Duplicate(String),

    /// Referenced record does not exist
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Could not reach the backing store
    #[error("Connection error: {0}")]
    Connection(String),

    /// The store rejected or failed the operation
    #[error("Query error: {0}")]
    Query(String),
}
