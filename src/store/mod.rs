//! A document store with live collection snapshots.
//!
//! Documents are schemaless JSON objects grouped into collections. Each
//! collection belongs to a single user and subscribers receive the whole
//! collection again every time it changes.

mod document;
mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio_stream::{StreamExt, wrappers::WatchStream};

pub use document::{CollectionPath, Document, DocumentId};
pub use sqlite::{SqliteDocumentStore, create_document_table};

/// Errors that occur when reading from or writing to a [DocumentStore].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    /// The document does not exist in the collection.
    #[error("the document could not be found")]
    NotFound,

    /// The collection belongs to an identity the store does not recognise.
    #[error("permission denied for the collection")]
    PermissionDenied,

    /// An unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    Sql(String),

    /// A document could not be converted to or from JSON.
    #[error("could not serialize the document: {0}")]
    Serialization(String),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    Lock,
}

impl From<rusqlite::Error> for StoreError {
    fn from(error: rusqlite::Error) -> Self {
        match error {
            rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {error}");
                StoreError::Sql(error.to_string())
            }
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(error: serde_json::Error) -> Self {
        StoreError::Serialization(error.to_string())
    }
}

/// Every document in a collection at one point in time, or the error that
/// prevented reading them.
pub type Snapshot = Result<Arc<[Document]>, StoreError>;

/// Stores JSON documents in per-user collections.
#[async_trait]
pub trait DocumentStore: std::fmt::Debug + Send + Sync {
    /// Add `data` as a new document and return its store-assigned ID.
    async fn add(&self, collection: &CollectionPath, data: Value) -> Result<DocumentId, StoreError>;

    /// Get the document with `id`.
    async fn get(&self, collection: &CollectionPath, id: &DocumentId)
    -> Result<Document, StoreError>;

    /// Replace the contents of the document with `id`.
    ///
    /// Returns [StoreError::NotFound] if the document does not exist.
    async fn update(
        &self,
        collection: &CollectionPath,
        id: &DocumentId,
        data: Value,
    ) -> Result<(), StoreError>;

    /// Remove the document with `id`. Removing a missing document is not an error.
    async fn delete(&self, collection: &CollectionPath, id: &DocumentId) -> Result<(), StoreError>;

    /// Follow the contents of `collection`.
    ///
    /// The subscription yields the current snapshot immediately and a new one
    /// after every change to the collection. Dropping the subscription
    /// unsubscribes.
    fn subscribe(&self, collection: &CollectionPath) -> Subscription;
}

/// A live view of a collection, see [DocumentStore::subscribe].
pub struct Subscription {
    snapshots: WatchStream<Snapshot>,
}

impl Subscription {
    pub(crate) fn new(snapshots: WatchStream<Snapshot>) -> Self {
        Self { snapshots }
    }

    /// Wait for the next snapshot.
    ///
    /// Returns `None` once the store stops publishing for the collection.
    pub async fn next(&mut self) -> Option<Snapshot> {
        self.snapshots.next().await
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
