//! HTTPS remote store implementation.
//!
//! Speaks a PostgREST-style REST dialect: rows live under
//! `/rest/v1/{table}` with `field=eq.value` query filters, file objects
//! under `/storage/v1/object/{bucket}/{path}`.

use crate::error::{RemoteError, RemoteResult};
use crate::store::{RemoteConfig, RemoteStore};
use async_trait::async_trait;
use fieldsync_types::{Fields, FilterSet, Record};
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Remote store client over HTTPS.
pub struct HttpRemoteStore {
    config: RemoteConfig,
    client: Client,
}

impl HttpRemoteStore {
    /// Creates a new client for the configured backend.
    pub fn new(config: RemoteConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("failed to create HTTP client");

        Self { config, client }
    }

    fn table_url(&self, table: &str) -> String {
        format!(
            "{}/rest/v1/{}",
            self.config.base_url.trim_end_matches('/'),
            table
        )
    }

    fn object_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            bucket,
            path.trim_start_matches('/')
        )
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
    }

    /// Reads the representation array returned by a mutating call.
    async fn read_rows(response: Response) -> RemoteResult<Vec<Record>> {
        let response = check_status(response).await?;
        response
            .json::<Vec<Record>>()
            .await
            .map_err(|e| RemoteError::InvalidResponse(format!("failed to decode rows: {e}")))
    }
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn insert(&self, table: &str, fields: &Fields) -> RemoteResult<Record> {
        debug!("insert into {table}");
        let response = self
            .authed(self.client.post(self.table_url(table)))
            .header("Prefer", "return=representation")
            .json(fields)
            .send()
            .await
            .map_err(request_error)?;

        let rows = Self::read_rows(response).await?;
        rows.into_iter().next().ok_or_else(|| {
            RemoteError::InvalidResponse(format!("insert into {table} returned no row"))
        })
    }

    async fn select(&self, table: &str, filters: &FilterSet) -> RemoteResult<Vec<Record>> {
        debug!("select from {table}");
        let mut query: Vec<(String, String)> = vec![("select".into(), "*".into())];
        for (field, value) in filters.iter() {
            query.push((field.clone(), format!("eq.{}", filter_value(value))));
        }

        let response = self
            .authed(self.client.get(self.table_url(table)))
            .query(&query)
            .send()
            .await
            .map_err(request_error)?;

        Self::read_rows(response).await
    }

    async fn update(&self, table: &str, id: &str, changes: &Fields) -> RemoteResult<Record> {
        debug!("update {table}/{id}");
        let response = self
            .authed(self.client.patch(self.table_url(table)))
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(changes)
            .send()
            .await
            .map_err(request_error)?;

        let rows = Self::read_rows(response).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| RemoteError::NotFound(format!("{table}/{id}")))
    }

    async fn delete(&self, table: &str, id: &str) -> RemoteResult<()> {
        debug!("delete {table}/{id}");
        let response = self
            .authed(self.client.delete(self.table_url(table)))
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await
            .map_err(request_error)?;

        check_status(response).await?;
        Ok(())
    }

    async fn upload_object(&self, bucket: &str, path: &str, content: Vec<u8>) -> RemoteResult<()> {
        debug!("upload {bucket}/{path} ({} bytes)", content.len());
        let response = self
            .authed(self.client.post(self.object_url(bucket, path)))
            .header("Content-Type", "application/octet-stream")
            .body(content)
            .send()
            .await
            .map_err(request_error)?;

        check_status(response).await?;
        Ok(())
    }

    async fn download_object(&self, bucket: &str, path: &str) -> RemoteResult<Vec<u8>> {
        debug!("download {bucket}/{path}");
        let response = self
            .authed(self.client.get(self.object_url(bucket, path)))
            .send()
            .await
            .map_err(request_error)?;

        let response = check_status(response).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| RemoteError::Network(format!("failed to read object body: {e}")))?;
        Ok(bytes.to_vec())
    }
}

/// Renders a filter value for the query string.
/// Strings are used bare; other scalars keep their JSON form.
fn filter_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn request_error(e: reqwest::Error) -> RemoteError {
    if e.is_timeout() {
        RemoteError::Unreachable
    } else {
        RemoteError::Network(e.to_string())
    }
}

async fn check_status(response: Response) -> RemoteResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(RemoteError::Rejected {
        status: status.as_u16(),
        message,
    })
}
