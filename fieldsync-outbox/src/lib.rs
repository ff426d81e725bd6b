//! Durable pending-operation queue for FieldSync.
//!
//! Mutations attempted while offline are persisted here, one SQLite row per
//! operation, and replayed in enqueue order once connectivity returns. The
//! file survives process restart; an operation is removed only after its
//! replay succeeds.

mod error;
mod outbox;

pub use error::{OutboxError, OutboxResult};
pub use outbox::Outbox;
