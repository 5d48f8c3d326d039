//! A [DocumentStore] kept in the application's SQLite database.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension};
use serde_json::Value;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::store::{
    CollectionPath, Document, DocumentId, DocumentStore, Snapshot, StoreError, Subscription,
};

/// Stores documents in the `document` table and publishes a fresh snapshot
/// of a collection to its subscribers after every write.
///
/// Only collections owned by identities in the `identity` table can be read
/// or written, any other owner gets [StoreError::PermissionDenied].
#[derive(Debug, Clone)]
pub struct SqliteDocumentStore {
    connection: Arc<Mutex<Connection>>,
    channels: Arc<Mutex<HashMap<String, watch::Sender<Snapshot>>>>,
}

impl SqliteDocumentStore {
    /// Create a store for the database behind `connection`.
    ///
    /// The `document` and `identity` tables must already exist, see [crate::initialize_db].
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self {
            connection,
            channels: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn lock_connection(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            StoreError::Lock
        })
    }

    /// Send the current contents of `collection` to its subscribers.
    ///
    /// Must be called while holding the connection lock so that snapshots are
    /// published in the same order as the writes that produced them.
    fn publish(&self, connection: &Connection, collection: &CollectionPath) {
        let mut channels = match self.channels.lock() {
            Ok(channels) => channels,
            Err(error) => {
                tracing::error!("could not acquire subscription lock: {error}");
                return;
            }
        };

        let Some(sender) = channels.get(collection.as_str()) else {
            return;
        };

        if sender.receiver_count() == 0 {
            tracing::debug!("Removing channel for {collection}, no subscribers left");
            channels.remove(collection.as_str());
            return;
        }

        sender.send_replace(load_snapshot(connection, collection));
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn add(&self, collection: &CollectionPath, data: Value) -> Result<DocumentId, StoreError> {
        let connection = self.lock_connection()?;
        check_access(&connection, collection)?;

        let id = DocumentId::new_random();
        connection.execute(
            "INSERT INTO document (collection, id, data) VALUES (?1, ?2, ?3)",
            (collection.as_str(), id.as_str(), serde_json::to_string(&data)?),
        )?;

        self.publish(&connection, collection);

        Ok(id)
    }

    async fn get(
        &self,
        collection: &CollectionPath,
        id: &DocumentId,
    ) -> Result<Document, StoreError> {
        let connection = self.lock_connection()?;
        check_access(&connection, collection)?;

        let data = connection
            .query_row(
                "SELECT data FROM document WHERE collection = ?1 AND id = ?2",
                (collection.as_str(), id.as_str()),
                |row| row.get::<_, String>(0),
            )
            .optional()?
            .ok_or(StoreError::NotFound)?;

        Ok(Document {
            id: id.clone(),
            data: serde_json::from_str(&data)?,
        })
    }

    async fn update(
        &self,
        collection: &CollectionPath,
        id: &DocumentId,
        data: Value,
    ) -> Result<(), StoreError> {
        let connection = self.lock_connection()?;
        check_access(&connection, collection)?;

        let rows_affected = connection.execute(
            "UPDATE document SET data = ?1 WHERE collection = ?2 AND id = ?3",
            (serde_json::to_string(&data)?, collection.as_str(), id.as_str()),
        )?;

        if rows_affected == 0 {
            return Err(StoreError::NotFound);
        }

        self.publish(&connection, collection);

        Ok(())
    }

    async fn delete(&self, collection: &CollectionPath, id: &DocumentId) -> Result<(), StoreError> {
        let connection = self.lock_connection()?;
        check_access(&connection, collection)?;

        connection.execute(
            "DELETE FROM document WHERE collection = ?1 AND id = ?2",
            (collection.as_str(), id.as_str()),
        )?;

        self.publish(&connection, collection);

        Ok(())
    }

    fn subscribe(&self, collection: &CollectionPath) -> Subscription {
        let connection = match self.lock_connection() {
            Ok(connection) => connection,
            Err(error) => {
                let (_, receiver) = watch::channel(Err(error));
                return Subscription::new(WatchStream::new(receiver));
            }
        };

        let snapshot = load_snapshot(&connection, collection);

        let mut channels = match self.channels.lock() {
            Ok(channels) => channels,
            Err(error) => {
                tracing::error!("could not acquire subscription lock: {error}");
                let (_, receiver) = watch::channel(Err(StoreError::Lock));
                return Subscription::new(WatchStream::new(receiver));
            }
        };

        let receiver = match channels.get(collection.as_str()) {
            Some(sender) => {
                sender.send_replace(snapshot);
                sender.subscribe()
            }
            None => {
                let (sender, receiver) = watch::channel(snapshot);
                channels.insert(collection.as_str().to_owned(), sender);
                receiver
            }
        };

        Subscription::new(WatchStream::new(receiver))
    }
}

fn check_access(connection: &Connection, collection: &CollectionPath) -> Result<(), StoreError> {
    let is_known_owner: bool = connection.query_row(
        "SELECT EXISTS (SELECT 1 FROM identity WHERE uid = ?1)",
        [collection.owner().as_str()],
        |row| row.get(0),
    )?;

    if is_known_owner {
        Ok(())
    } else {
        tracing::warn!("Denied access to {collection} for unknown owner");
        Err(StoreError::PermissionDenied)
    }
}

fn load_snapshot(connection: &Connection, collection: &CollectionPath) -> Snapshot {
    check_access(connection, collection)?;

    let mut statement =
        connection.prepare("SELECT id, data FROM document WHERE collection = ?1 ORDER BY id")?;

    let documents = statement
        .query_map([collection.as_str()], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?
        .map(|row| {
            let (id, data) = row?;
            Ok(Document {
                id: DocumentId::new(id),
                data: serde_json::from_str(&data)?,
            })
        })
        .collect::<Result<Vec<_>, StoreError>>()?;

    Ok(Arc::from(documents))
}

/// Create the document table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_document_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS document (
                collection TEXT NOT NULL,
                id TEXT NOT NULL,
                data TEXT NOT NULL,
                PRIMARY KEY (collection, id)
                )",
        (),
    )?;

    Ok(())
}
