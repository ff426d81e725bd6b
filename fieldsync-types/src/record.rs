//! Records and filter sets.
//!
//! A record is an opaque JSON object: the data layer imposes no schema and
//! performs no validation. The remote store assigns the `"id"` field when a
//! row is persisted; records echoed back from offline mutations may not
//! carry one.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A mutation payload: field name to JSON value.
pub type Fields = Map<String, Value>;

/// One row of a named table, as an opaque field map.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Fields,
}

impl Record {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a record from an existing field map.
    #[must_use]
    pub fn from_fields(fields: Fields) -> Self {
        Self { fields }
    }

    /// Returns the store-assigned identifier, if present.
    ///
    /// Backends hand out both string and integer primary keys; either is
    /// rendered to its string form.
    #[must_use]
    pub fn id(&self) -> Option<String> {
        match self.fields.get("id") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Returns a field value.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Sets a field value, replacing any previous one.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Returns the underlying field map.
    #[must_use]
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Consumes the record, returning the field map.
    #[must_use]
    pub fn into_fields(self) -> Fields {
        self.fields
    }
}

impl From<Fields> for Record {
    fn from(fields: Fields) -> Self {
        Self::from_fields(fields)
    }
}

/// An equality filter conjunction: every `field = value` pair must match.
///
/// Backed by an ordered map so that two filter sets with the same pairs
/// produce the same canonical form regardless of insertion order. There is
/// no range or partial matching.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet {
    filters: BTreeMap<String, Value>,
}

impl FilterSet {
    /// Creates an empty filter set (matches every row).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an equality condition, returning the filter set for chaining.
    #[must_use]
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.insert(field.into(), value.into());
        self
    }

    /// Returns true if no conditions are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Iterates over the `field = value` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.filters.iter()
    }

    /// Canonical serialized form, used as the read-cache key.
    /// Field order is normalized by the underlying ordered map.
    #[must_use]
    pub fn canonical_key(&self) -> String {
        serde_json::to_string(&self.filters).unwrap_or_default()
    }
}
