//! Document-store backends for the trade collection
//!
//! The controller only ever talks to a [`TradeStore`]: list everything,
//! insert, full-document update, delete. Three backends implement it —
//! an HTTP client for a remote document store, a local SQLite file,
//! and an in-memory store used by tests.

use async_trait::async_trait;
use thiserror::Error;

use crate::types::TradeRecord;

pub mod http;
pub mod memory;
pub mod sqlite;

pub use http::HttpStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Errors surfaced by a store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("network error: {0}")]
    Network(String),

    #[error("store API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("no record with id {0}")]
    NotFound(String),

    #[error("malformed store response: {0}")]
    Parse(String),

    #[error("database error: {0}")]
    Database(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::Parse(err.to_string())
        } else {
            StoreError::Network(err.to_string())
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// CRUD contract over one trade collection.
///
/// `update` has full-document replace semantics: the stored document
/// afterwards contains exactly the fields of `record`, nothing merged
/// in from the previous version.
#[async_trait]
pub trait TradeStore: Send + Sync {
    /// Every record in the collection, no filtering, no paging.
    async fn list_all(&self) -> StoreResult<Vec<TradeRecord>>;

    /// Insert a new document; returns the store-assigned identifier.
    async fn insert(&self, record: &TradeRecord) -> StoreResult<String>;

    /// Replace the document with the given identifier.
    async fn update(&self, id: &str, record: &TradeRecord) -> StoreResult<()>;

    /// Remove the document with the given identifier.
    async fn delete(&self, id: &str) -> StoreResult<()>;
}

#[async_trait]
impl<T: TradeStore + ?Sized> TradeStore for std::sync::Arc<T> {
    async fn list_all(&self) -> StoreResult<Vec<TradeRecord>> {
        (**self).list_all().await
    }

    async fn insert(&self, record: &TradeRecord) -> StoreResult<String> {
        (**self).insert(record).await
    }

    async fn update(&self, id: &str, record: &TradeRecord) -> StoreResult<()> {
        (**self).update(id, record).await
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        (**self).delete(id).await
    }
}

#[async_trait]
impl<T: TradeStore + ?Sized> TradeStore for Box<T> {
    async fn list_all(&self) -> StoreResult<Vec<TradeRecord>> {
        (**self).list_all().await
    }

    async fn insert(&self, record: &TradeRecord) -> StoreResult<String> {
        (**self).insert(record).await
    }

    async fn update(&self, id: &str, record: &TradeRecord) -> StoreResult<()> {
        (**self).update(id, record).await
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        (**self).delete(id).await
    }
}
