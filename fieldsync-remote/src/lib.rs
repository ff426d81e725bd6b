//! Remote tabular store interface for FieldSync.
//!
//! Defines the generic backend surface the data layer talks to — row
//! insert/select/update/delete on named tables plus file objects in named
//! buckets — and an HTTPS implementation against a hosted PostgREST-style
//! backend. Authentication is a static API key; the backend's own schema
//! and query language are out of scope.

mod error;
mod http;
mod store;

pub use error::{RemoteError, RemoteResult};
pub use http::HttpRemoteStore;
pub use store::{RemoteConfig, RemoteStore};
