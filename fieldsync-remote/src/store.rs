//! Remote store abstraction trait.
//!
//! Defines the common interface for tabular backends.

use crate::error::RemoteResult;
use async_trait::async_trait;
use fieldsync_types::{Fields, FilterSet, Record};
use serde::{Deserialize, Serialize};

/// Configuration for the remote store connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the backend (e.g. `https://project.example.co`).
    pub base_url: String,
    /// Static API key sent with every request.
    pub api_key: String,
    /// Per-request timeout (in seconds).
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            timeout_secs: 30,
        }
    }
}

/// Abstract remote tabular store interface.
///
/// Tables are addressed by name; rows are opaque field maps with a
/// store-assigned `"id"`. Buckets hold file objects addressed by path.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Inserts a row and returns it with its store-assigned identifier.
    async fn insert(&self, table: &str, fields: &Fields) -> RemoteResult<Record>;

    /// Selects the rows matching the equality filter conjunction,
    /// in backend order.
    async fn select(&self, table: &str, filters: &FilterSet) -> RemoteResult<Vec<Record>>;

    /// Partially updates a row by identifier and returns the updated row.
    async fn update(&self, table: &str, id: &str, changes: &Fields) -> RemoteResult<Record>;

    /// Deletes a row by identifier.
    async fn delete(&self, table: &str, id: &str) -> RemoteResult<()>;

    /// Uploads a file object into a bucket.
    async fn upload_object(&self, bucket: &str, path: &str, content: Vec<u8>) -> RemoteResult<()>;

    /// Downloads a file object's content.
    async fn download_object(&self, bucket: &str, path: &str) -> RemoteResult<Vec<u8>>;
}
