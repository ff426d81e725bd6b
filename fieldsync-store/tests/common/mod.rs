//! Shared test helpers: an in-memory remote store fake.

#![allow(dead_code)]

use async_trait::async_trait;
use fieldsync_outbox::Outbox;
use fieldsync_remote::{RemoteError, RemoteResult, RemoteStore};
use fieldsync_store::{ConnectivityState, RecordStore, StoreConfig};
use fieldsync_types::{Fields, FilterSet, Record};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Builds a field map from a `json!` object literal.
pub fn fields(value: Value) -> Fields {
    value.as_object().expect("object literal").clone()
}

/// Creates a fresh in-memory outbox.
pub fn new_outbox() -> Arc<Outbox> {
    Arc::new(Outbox::open_in_memory().unwrap())
}

/// Builds a record store over the given collaborators.
pub fn make_store(
    remote: Arc<MockRemote>,
    outbox: Arc<Outbox>,
    initial: ConnectivityState,
) -> Arc<RecordStore> {
    Arc::new(RecordStore::with_config(
        remote,
        outbox,
        StoreConfig {
            initial_connectivity: initial,
        },
    ))
}

/// In-memory remote store with a call log, per-table failure injection,
/// and optional per-call latency.
pub struct MockRemote {
    tables: Mutex<HashMap<String, Vec<Record>>>,
    objects: Mutex<HashMap<String, Vec<u8>>>,
    calls: Mutex<Vec<String>>,
    fail_tables: Mutex<HashSet<String>>,
    latency: Mutex<Option<Duration>>,
    next_id: AtomicU64,
}

impl MockRemote {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(HashMap::new()),
            objects: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            fail_tables: Mutex::new(HashSet::new()),
            latency: Mutex::new(None),
            next_id: AtomicU64::new(1),
        }
    }

    /// Makes every call against the given table fail with a rejection.
    pub fn fail_table(&self, table: &str) {
        self.fail_tables.lock().unwrap().insert(table.to_string());
    }

    /// Clears all injected failures.
    pub fn clear_failures(&self) {
        self.fail_tables.lock().unwrap().clear();
    }

    /// Adds artificial latency to every call.
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap() = Some(latency);
    }

    /// Returns the calls issued so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Returns the current rows of a table.
    pub fn rows(&self, table: &str) -> Vec<Record> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    async fn begin(&self, call: String, table: &str) -> RemoteResult<()> {
        self.calls.lock().unwrap().push(call);
        let latency = *self.latency.lock().unwrap();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        if self.fail_tables.lock().unwrap().contains(table) {
            return Err(RemoteError::Rejected {
                status: 500,
                message: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

fn matches(record: &Record, filters: &FilterSet) -> bool {
    filters
        .iter()
        .all(|(field, value)| record.get(field) == Some(value))
}

#[async_trait]
impl RemoteStore for MockRemote {
    async fn insert(&self, table: &str, fields: &Fields) -> RemoteResult<Record> {
        self.begin(format!("insert {table}"), table).await?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut row = fields.clone();
        row.insert("id".to_string(), Value::from(id));
        let record = Record::from_fields(row);
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn select(&self, table: &str, filters: &FilterSet) -> RemoteResult<Vec<Record>> {
        self.begin(format!("select {table}"), table).await?;
        Ok(self
            .tables
            .lock()
            .unwrap()
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| matches(row, filters))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn update(&self, table: &str, id: &str, changes: &Fields) -> RemoteResult<Record> {
        self.begin(format!("update {table}/{id}"), table).await?;
        let mut tables = self.tables.lock().unwrap();
        let rows = tables
            .get_mut(table)
            .ok_or_else(|| RemoteError::NotFound(format!("{table}/{id}")))?;
        for row in rows.iter_mut() {
            if row.id().as_deref() == Some(id) {
                for (field, value) in changes {
                    row.set(field.clone(), value.clone());
                }
                return Ok(row.clone());
            }
        }
        Err(RemoteError::NotFound(format!("{table}/{id}")))
    }

    async fn delete(&self, table: &str, id: &str) -> RemoteResult<()> {
        self.begin(format!("delete {table}/{id}"), table).await?;
        if let Some(rows) = self.tables.lock().unwrap().get_mut(table) {
            rows.retain(|row| row.id().as_deref() != Some(id));
        }
        Ok(())
    }

    async fn upload_object(&self, bucket: &str, path: &str, content: Vec<u8>) -> RemoteResult<()> {
        self.begin(format!("upload {bucket}/{path}"), bucket).await?;
        self.objects
            .lock()
            .unwrap()
            .insert(format!("{bucket}/{path}"), content);
        Ok(())
    }

    async fn download_object(&self, bucket: &str, path: &str) -> RemoteResult<Vec<u8>> {
        self.begin(format!("download {bucket}/{path}"), bucket).await?;
        self.objects
            .lock()
            .unwrap()
            .get(&format!("{bucket}/{path}"))
            .cloned()
            .ok_or_else(|| RemoteError::NotFound(format!("{bucket}/{path}")))
    }
}
