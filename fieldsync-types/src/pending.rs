//! Pending operations.
//!
//! A pending operation is a mutation that was attempted while offline. It is
//! durably queued and replayed against the remote store once connectivity
//! returns, then removed. An operation whose replay keeps failing stays
//! queued; there is no expiry and no dead-letter handling.

use crate::ids::OperationId;
use crate::record::Fields;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The payload of a pending operation.
///
/// `Update` and `Delete` carry the target row identifier exactly as the
/// caller supplied it; no local validation is performed against the remote
/// store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "data")]
pub enum OperationPayload {
    /// A row should be inserted.
    Create {
        /// The caller-supplied fields, without an identifier.
        fields: Fields,
    },

    /// A row should be partially updated.
    Update {
        /// The target row identifier.
        id: String,
        /// The fields to change.
        changes: Fields,
    },

    /// A row should be deleted.
    Delete {
        /// The target row identifier.
        id: String,
    },
}

/// The kind of a pending operation, for display and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationKind {
    Create,
    Update,
    Delete,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// A durably queued mutation awaiting replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingOperation {
    /// Unique, time-ordered identifier.
    pub id: OperationId,
    /// The target table name.
    pub table: String,
    /// What to replay.
    pub payload: OperationPayload,
    /// When the mutation was originally attempted.
    pub enqueued_at: DateTime<Utc>,
}

impl PendingOperation {
    /// Creates a pending insert.
    #[must_use]
    pub fn create(table: impl Into<String>, fields: Fields) -> Self {
        Self::with_payload(table, OperationPayload::Create { fields })
    }

    /// Creates a pending partial update.
    #[must_use]
    pub fn update(table: impl Into<String>, id: impl Into<String>, changes: Fields) -> Self {
        Self::with_payload(
            table,
            OperationPayload::Update {
                id: id.into(),
                changes,
            },
        )
    }

    /// Creates a pending delete.
    #[must_use]
    pub fn delete(table: impl Into<String>, id: impl Into<String>) -> Self {
        Self::with_payload(table, OperationPayload::Delete { id: id.into() })
    }

    fn with_payload(table: impl Into<String>, payload: OperationPayload) -> Self {
        Self {
            id: OperationId::new(),
            table: table.into(),
            payload,
            enqueued_at: Utc::now(),
        }
    }

    /// Returns the operation kind.
    #[must_use]
    pub fn kind(&self) -> OperationKind {
        match self.payload {
            OperationPayload::Create { .. } => OperationKind::Create,
            OperationPayload::Update { .. } => OperationKind::Update,
            OperationPayload::Delete { .. } => OperationKind::Delete,
        }
    }
}
