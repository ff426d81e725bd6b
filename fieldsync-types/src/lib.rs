//! Core type definitions for FieldSync.
//!
//! This crate defines the fundamental, table-agnostic types used throughout
//! the data layer:
//! - Records and equality filter sets (opaque JSON field maps)
//! - Operation identifiers (UUID v7)
//! - Pending operations awaiting replay against the remote store
//!
//! Domain-specific row shapes (surveys, volunteers, donors, ...) belong to
//! the applications built on top of the data layer, not here.

mod ids;
mod pending;
mod record;

pub use ids::OperationId;
pub use pending::{OperationKind, OperationPayload, PendingOperation};
pub use record::{FilterSet, Fields, Record};
