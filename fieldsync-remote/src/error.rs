//! Error types for the remote store layer.

use thiserror::Error;

/// Result type for remote store operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Errors that can occur talking to the remote store.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The remote rejected the call; carries the remote-supplied message.
    #[error("remote rejected request ({status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body text, as supplied by the remote.
        message: String,
    },

    /// The request could not be delivered.
    #[error("network error: {0}")]
    Network(String),

    /// The request timed out.
    #[error("remote unreachable: request timed out")]
    Unreachable,

    /// The target row does not exist.
    #[error("row not found: {0}")]
    NotFound(String),

    /// The remote returned a response the client could not interpret.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
