//! The offline-aware record store.
//!
//! Provides uniform create/read/update/delete primitives over arbitrary
//! named tables, transparently degrading to the durable outbox when
//! connectivity is unavailable and reconciling the queue back to the
//! remote store once it returns.

use crate::cache::ReadCache;
use crate::connectivity::ConnectivityState;
use crate::error::{StoreError, StoreResult};
use crate::typed::TableHandle;
use fieldsync_outbox::Outbox;
use fieldsync_remote::{RemoteError, RemoteStore};
use fieldsync_types::{Fields, FilterSet, OperationPayload, PendingOperation, Record};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{RwLock, watch};
use tracing::{debug, info, warn};

/// Configuration for the record store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Connectivity sampled from the host environment at startup.
    pub initial_connectivity: ConnectivityState,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            initial_connectivity: ConnectivityState::Online,
        }
    }
}

/// The offline-aware record store.
///
/// Constructed once at application start with its remote and outbox
/// collaborators injected, then shared (`Arc`) by every caller. Online
/// mutations and reads map 1:1 onto remote calls; offline mutations are
/// queued durably and replayed in enqueue order on reconnect; offline
/// reads are served from the last-known-good read cache.
pub struct RecordStore {
    remote: Arc<dyn RemoteStore>,
    outbox: Arc<Outbox>,
    cache: RwLock<ReadCache>,
    connectivity: RwLock<ConnectivityState>,
    sync_running: AtomicBool,
}

impl RecordStore {
    /// Creates a record store that starts online.
    pub fn new(remote: Arc<dyn RemoteStore>, outbox: Arc<Outbox>) -> Self {
        Self::with_config(remote, outbox, StoreConfig::default())
    }

    /// Creates a record store with explicit configuration.
    pub fn with_config(
        remote: Arc<dyn RemoteStore>,
        outbox: Arc<Outbox>,
        config: StoreConfig,
    ) -> Self {
        Self {
            remote,
            outbox,
            cache: RwLock::new(ReadCache::default()),
            connectivity: RwLock::new(config.initial_connectivity),
            sync_running: AtomicBool::new(false),
        }
    }

    /// Returns the current connectivity state.
    pub async fn connectivity(&self) -> ConnectivityState {
        *self.connectivity.read().await
    }

    /// Returns true when the remote store is reachable.
    pub async fn is_online(&self) -> bool {
        self.connectivity().await.is_online()
    }

    // ── Connectivity signal ──────────────────────────────────────

    /// Handles the environment's "became online" event.
    ///
    /// An Offline→Online transition triggers exactly one replay pass;
    /// a redundant delivery while already online triggers nothing.
    pub async fn set_online(&self) {
        {
            let mut state = self.connectivity.write().await;
            if state.is_online() {
                return;
            }
            *state = ConnectivityState::Online;
        }
        info!("connectivity restored, replaying pending operations");
        self.sync_pending_changes().await;
    }

    /// Handles the environment's "became offline" event.
    pub async fn set_offline(&self) {
        let mut state = self.connectivity.write().await;
        if !state.is_online() {
            return;
        }
        *state = ConnectivityState::Offline;
        info!("connectivity lost, mutations will be queued locally");
    }

    /// Subscribes to the host's connectivity signal.
    ///
    /// Spawns a task that drives `set_online`/`set_offline` from the watch
    /// channel; the host publishes state changes on the sender side. The
    /// task ends when the sender is dropped.
    pub fn watch_connectivity(
        self: &Arc<Self>,
        mut signal: watch::Receiver<ConnectivityState>,
    ) -> tokio::task::JoinHandle<()> {
        let store = Arc::clone(self);
        tokio::spawn(async move {
            while signal.changed().await.is_ok() {
                let state = *signal.borrow_and_update();
                match state {
                    ConnectivityState::Online => store.set_online().await,
                    ConnectivityState::Offline => store.set_offline().await,
                }
            }
        })
    }

    // ── CRUD primitives ──────────────────────────────────────────

    /// Creates a record in the named table.
    ///
    /// Online: a single remote insert; the returned record carries the
    /// store-assigned identifier. A rejected online insert surfaces the
    /// remote error and is **not** queued.
    ///
    /// Offline: queues a pending create and echoes the caller's payload as
    /// a success; the echoed record has no identifier.
    pub async fn create(&self, table: &str, fields: Fields) -> StoreResult<Record> {
        ensure_table(table)?;
        if self.is_online().await {
            Ok(self.remote.insert(table, &fields).await?)
        } else {
            let op = PendingOperation::create(table, fields.clone());
            self.outbox.push(&op)?;
            debug!("queued offline create on {table}");
            Ok(Record::from_fields(fields))
        }
    }

    /// Reads the records matching an equality filter conjunction.
    ///
    /// Online: a single remote select whose result, in backend order,
    /// overwrites the cache entry for `(table, filters)`.
    ///
    /// Offline: served from the cache; a missing entry is a cache miss,
    /// even for a semantically overlapping filter combination.
    pub async fn read(&self, table: &str, filters: &FilterSet) -> StoreResult<Vec<Record>> {
        ensure_table(table)?;
        if self.is_online().await {
            let rows = self.remote.select(table, filters).await?;
            self.cache.write().await.store(table, filters, rows.clone());
            Ok(rows)
        } else {
            self.cache
                .read()
                .await
                .get(table, filters)
                .map(<[Record]>::to_vec)
                .ok_or(StoreError::CacheMiss)
        }
    }

    /// Partially updates a record by identifier.
    ///
    /// Online: a single remote update returning the updated row.
    ///
    /// Offline: queues a pending update and echoes `{id, ...changes}` —
    /// the caller sees what it sent, not the merged state. The identifier
    /// is not validated locally.
    pub async fn update(&self, table: &str, id: &str, changes: Fields) -> StoreResult<Record> {
        ensure_table(table)?;
        if self.is_online().await {
            Ok(self.remote.update(table, id, &changes).await?)
        } else {
            let op = PendingOperation::update(table, id, changes.clone());
            self.outbox.push(&op)?;
            debug!("queued offline update on {table}/{id}");
            let mut echoed = changes;
            echoed.insert("id".to_string(), id.into());
            Ok(Record::from_fields(echoed))
        }
    }

    /// Deletes a record by identifier.
    pub async fn delete(&self, table: &str, id: &str) -> StoreResult<()> {
        ensure_table(table)?;
        if self.is_online().await {
            Ok(self.remote.delete(table, id).await?)
        } else {
            let op = PendingOperation::delete(table, id);
            self.outbox.push(&op)?;
            debug!("queued offline delete on {table}/{id}");
            Ok(())
        }
    }

    // ── File objects ─────────────────────────────────────────────

    /// Uploads a file object. No offline path: the binary payload is not
    /// queued, the call fails immediately while offline.
    pub async fn upload_object(
        &self,
        bucket: &str,
        path: &str,
        content: Vec<u8>,
    ) -> StoreResult<()> {
        if !self.is_online().await {
            return Err(StoreError::OfflineTransfer);
        }
        Ok(self.remote.upload_object(bucket, path, content).await?)
    }

    /// Downloads a file object's content. No offline path.
    pub async fn download_object(&self, bucket: &str, path: &str) -> StoreResult<Vec<u8>> {
        if !self.is_online().await {
            return Err(StoreError::OfflineTransfer);
        }
        Ok(self.remote.download_object(bucket, path).await?)
    }

    // ── Replay ───────────────────────────────────────────────────

    /// Replays the pending queue against the remote store.
    ///
    /// Runs automatically on the Offline→Online transition and may be
    /// invoked manually. Operations are replayed oldest first; a success
    /// removes the operation, a failure is logged and the operation stays
    /// queued for the next pass without blocking later ones. A pass
    /// entered while another is running is a no-op.
    pub async fn sync_pending_changes(&self) {
        if self.sync_running.swap(true, Ordering::SeqCst) {
            debug!("replay pass already running, skipping");
            return;
        }

        let ops = match self.outbox.load() {
            Ok(ops) => ops,
            Err(e) => {
                warn!("failed to load pending operations: {e}");
                self.sync_running.store(false, Ordering::SeqCst);
                return;
            }
        };

        if ops.is_empty() {
            debug!("no pending operations to replay");
            self.sync_running.store(false, Ordering::SeqCst);
            return;
        }

        let total = ops.len();
        let mut replayed = 0;
        for op in ops {
            match self.replay(&op).await {
                Ok(()) => match self.outbox.remove(&op.id) {
                    Ok(_) => replayed += 1,
                    Err(e) => warn!("failed to remove replayed operation {}: {e}", op.id),
                },
                Err(e) => {
                    warn!(
                        "replay of {} on {} failed, keeping queued: {e}",
                        op.kind(),
                        op.table
                    );
                }
            }
        }

        info!("replayed {replayed}/{total} pending operations");
        self.sync_running.store(false, Ordering::SeqCst);
    }

    async fn replay(&self, op: &PendingOperation) -> Result<(), RemoteError> {
        match &op.payload {
            OperationPayload::Create { fields } => {
                self.remote.insert(&op.table, fields).await.map(|_| ())
            }
            OperationPayload::Update { id, changes } => {
                self.remote.update(&op.table, id, changes).await.map(|_| ())
            }
            OperationPayload::Delete { id } => self.remote.delete(&op.table, id).await,
        }
    }

    // ── Queue introspection ──────────────────────────────────────

    /// Returns the queued operations, oldest first.
    pub fn pending_operations(&self) -> StoreResult<Vec<PendingOperation>> {
        Ok(self.outbox.load()?)
    }

    /// Returns the number of queued operations.
    pub fn pending_count(&self) -> StoreResult<usize> {
        Ok(self.outbox.len()?)
    }

    // ── Typed access ─────────────────────────────────────────────

    /// Returns a typed handle over one named table.
    pub fn table<T>(self: &Arc<Self>, name: impl Into<String>) -> TableHandle<T> {
        TableHandle::new(Arc::clone(self), name.into())
    }
}

fn ensure_table(table: &str) -> StoreResult<()> {
    if table.is_empty() {
        Err(StoreError::EmptyTableName)
    } else {
        Ok(())
    }
}
