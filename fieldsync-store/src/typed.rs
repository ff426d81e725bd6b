//! Typed table handles.
//!
//! A thin, serde-backed view over one named table: callers define their row
//! type once and shape mismatches surface at the serialization boundary
//! instead of deep inside UI code.

use crate::error::{StoreError, StoreResult};
use crate::manager::RecordStore;
use fieldsync_types::{Fields, FilterSet, Record};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;

/// A typed view over one named table.
pub struct TableHandle<T> {
    store: Arc<RecordStore>,
    table: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> TableHandle<T> {
    pub(crate) fn new(store: Arc<RecordStore>, table: String) -> Self {
        Self {
            store,
            table,
            _marker: PhantomData,
        }
    }

    /// Returns the table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.table
    }
}

impl<T: Serialize + DeserializeOwned> TableHandle<T> {
    /// Creates a row from a typed value.
    ///
    /// The value must serialize to a JSON object. The returned record is
    /// untyped because an offline create carries no identifier.
    pub async fn insert(&self, row: &T) -> StoreResult<Record> {
        self.store.create(&self.table, to_fields(row)?).await
    }

    /// Reads the rows matching the filters, decoded into the row type.
    pub async fn find(&self, filters: &FilterSet) -> StoreResult<Vec<T>> {
        let records = self.store.read(&self.table, filters).await?;
        records
            .into_iter()
            .map(|record| Ok(serde_json::from_value(Value::Object(record.into_fields()))?))
            .collect()
    }

    /// Partially updates a row by identifier.
    pub async fn update(&self, id: &str, changes: Fields) -> StoreResult<Record> {
        self.store.update(&self.table, id, changes).await
    }

    /// Deletes a row by identifier.
    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        self.store.delete(&self.table, id).await
    }
}

fn to_fields<T: Serialize>(row: &T) -> StoreResult<Fields> {
    match serde_json::to_value(row)? {
        Value::Object(fields) => Ok(fields),
        _ => Err(StoreError::InvalidRow(
            "row must serialize to a JSON object".to_string(),
        )),
    }
}
