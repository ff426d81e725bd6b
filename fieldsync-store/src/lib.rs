//! Offline-aware record store for FieldSync.
//!
//! The data-access layer for field programs that cannot count on
//! connectivity: CRUD over named tables in a remote store, degrading to a
//! durable local queue when offline and reconciling on reconnect.
//!
//! # Architecture
//!
//! - **Connectivity**: a process-wide Online/Offline flag, driven only by
//!   the host environment's connectivity signal
//! - **Dispatch**: every primitive reads the flag and takes the remote or
//!   the local path
//! - **Outbox**: offline mutations are persisted durably and survive
//!   restarts
//! - **Replay**: on reconnect the queue is replayed oldest first; failures
//!   are retained for the next pass
//! - **Read cache**: successful online reads are kept per `(table, filters)`
//!   and serve offline reads
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use fieldsync_outbox::Outbox;
//! use fieldsync_remote::{HttpRemoteStore, RemoteConfig};
//! use fieldsync_store::RecordStore;
//! use fieldsync_types::FilterSet;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let remote = HttpRemoteStore::new(RemoteConfig {
//!     base_url: "https://project.example.co".to_string(),
//!     api_key: "anon-key".to_string(),
//!     ..Default::default()
//! });
//! let outbox = Outbox::open("outbox.db")?;
//! let store = Arc::new(RecordStore::new(Arc::new(remote), Arc::new(outbox)));
//!
//! let active = FilterSet::new().eq("status", "active");
//! let volunteers = store.read("volunteers", &active).await?;
//! # Ok(())
//! # }
//! ```

mod cache;
mod connectivity;
mod error;
mod manager;
mod typed;

pub use connectivity::ConnectivityState;
pub use error::{StoreError, StoreResult};
pub use manager::{RecordStore, StoreConfig};
pub use typed::TableHandle;
