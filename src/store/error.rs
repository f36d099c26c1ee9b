//! Contact Store Errors
//!
//! Error types for contact persistence.

/// Errors that can occur in the contact store
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The storage medium could not be reached (pool exhausted, connection refused, ...)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row could not be mapped to a contact
    #[error("Invalid contact row: {0}")]
    InvalidRow(String),
}

impl StorageError {
    /// Check if this error happened before any data was exchanged
    pub fn is_unavailable(&self) -> bool {
        match self {
            StorageError::Unavailable(_) => true,
            StorageError::Database(e) => matches!(
                e,
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
            ),
            StorageError::InvalidRow(_) => false,
        }
    }
}
