//! An identity provider that keeps its identities in the application database.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension};
use tokio::sync::watch;

use crate::identity::{IdentityError, IdentityProvider, UserId};

/// Issues identities stored in the `identity` table.
///
/// Anonymous sign-in always returns the same identity, created on first use,
/// so the ledger survives restarts. Custom tokens must be registered with
/// [LocalIdentityProvider::register_custom_token] before they can be used.
#[derive(Debug, Clone)]
pub struct LocalIdentityProvider {
    connection: Arc<Mutex<Connection>>,
    current: Arc<watch::Sender<Option<UserId>>>,
}

impl LocalIdentityProvider {
    /// Create a provider for the database behind `connection`.
    ///
    /// The `identity` table must already exist, see [crate::initialize_db].
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self {
            connection,
            current: Arc::new(watch::Sender::new(None)),
        }
    }

    /// Register `token` so that it can be exchanged for an identity.
    ///
    /// Registering the same token twice returns the identity from the first
    /// registration.
    ///
    /// # Errors
    /// Returns [IdentityError::Unavailable] if the database cannot be queried.
    pub fn register_custom_token(&self, token: &str) -> Result<UserId, IdentityError> {
        let connection = self.lock()?;

        connection
            .execute(
                "INSERT OR IGNORE INTO identity (uid, kind, token) VALUES (?1, 'custom', ?2)",
                (UserId::random().as_str(), token),
            )
            .map_err(unavailable)?;

        connection
            .query_row(
                "SELECT uid FROM identity WHERE token = ?1",
                [token],
                |row| row.get::<_, String>(0),
            )
            .map(UserId::new)
            .map_err(unavailable)
    }

    /// Sign the current user out, which notifies listeners of the change.
    #[cfg(test)]
    pub fn sign_out(&self) {
        self.current.send_replace(None);
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, IdentityError> {
        self.connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            IdentityError::Unavailable("could not acquire the database lock".to_owned())
        })
    }

    fn signed_in(&self, user_id: UserId) -> UserId {
        self.current.send_replace(Some(user_id.clone()));
        user_id
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn sign_in_with_custom_token(&self, token: &str) -> Result<UserId, IdentityError> {
        let user_id = {
            let connection = self.lock()?;

            connection
                .query_row(
                    "SELECT uid FROM identity WHERE kind = 'custom' AND token = ?1",
                    [token],
                    |row| row.get::<_, String>(0),
                )
                .optional()
                .map_err(unavailable)?
                .map(UserId::new)
                .ok_or(IdentityError::InvalidToken)?
        };

        Ok(self.signed_in(user_id))
    }

    async fn sign_in_anonymously(&self) -> Result<UserId, IdentityError> {
        let user_id = {
            let connection = self.lock()?;

            let existing = connection
                .query_row(
                    "SELECT uid FROM identity WHERE kind = 'anonymous' ORDER BY rowid LIMIT 1",
                    [],
                    |row| row.get::<_, String>(0),
                )
                .optional()
                .map_err(unavailable)?;

            match existing {
                Some(uid) => UserId::new(uid),
                None => {
                    let user_id = UserId::random();
                    connection
                        .execute(
                            "INSERT INTO identity (uid, kind) VALUES (?1, 'anonymous')",
                            [user_id.as_str()],
                        )
                        .map_err(unavailable)?;
                    tracing::info!("Created anonymous identity {user_id}");
                    user_id
                }
            }
        };

        Ok(self.signed_in(user_id))
    }

    fn changes(&self) -> watch::Receiver<Option<UserId>> {
        self.current.subscribe()
    }
}

fn unavailable(error: rusqlite::Error) -> IdentityError {
    tracing::error!("identity query failed: {error}");
    IdentityError::Unavailable(error.to_string())
}

/// Create the identity table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_identity_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS identity (
                uid TEXT PRIMARY KEY,
                kind TEXT NOT NULL CHECK (kind IN ('anonymous', 'custom')),
                token TEXT UNIQUE
                )",
        (),
    )?;

    Ok(())
}
