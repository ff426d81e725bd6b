//! Error types for the record store.

use thiserror::Error;

/// Result type for record store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced to callers of the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The remote call failed; carries the remote error.
    #[error(transparent)]
    Remote(#[from] fieldsync_remote::RemoteError),

    /// The durable queue failed.
    #[error(transparent)]
    Outbox(#[from] fieldsync_outbox::OutboxError),

    /// An offline read found no cached entry for the requested filters.
    #[error("no cached data available")]
    CacheMiss,

    /// File transfers have no offline path.
    #[error("file transfer is unavailable offline")]
    OfflineTransfer,

    /// The table name was empty.
    #[error("table name must not be empty")]
    EmptyTableName,

    /// A typed row did not serialize to a JSON object.
    #[error("invalid row: {0}")]
    InvalidRow(String),

    /// Typed-layer serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
