//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use rusqlite::Connection;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{
    Error,
    auth::{Authenticator, DEFAULT_COOKIE_DURATION},
    db::initialize,
    identity::{IdentityBinding, LocalIdentityProvider},
    preferences::{Preferences, SharedPreferences},
    store::{DocumentStore, SqliteDocumentStore},
    timezone::get_local_offset,
    transaction::{DeleteConfirmation, TransactionFeed},
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,

    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,

    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    pub local_timezone: String,

    /// Namespaces every collection in the document store.
    pub app_id: String,

    /// Checks the shopkeeper's username and password.
    pub authenticator: Arc<dyn Authenticator>,

    /// Where transactions are kept.
    pub store: Arc<dyn DocumentStore>,

    /// The identity whose transactions are shown.
    pub identity: IdentityBinding,

    /// The live ledger of the bound identity.
    pub feed: TransactionFeed,

    /// The language and theme.
    pub preferences: SharedPreferences,

    /// The transaction waiting for the user to confirm its deletion.
    pub delete_confirmation: Arc<Mutex<DeleteConfirmation>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for
    /// the identity provider and the document store, then start signing in
    /// in the background. `bootstrap_token` is tried before anonymous
    /// sign-in. `local_timezone` should be a valid, canonical timezone name,
    /// e.g. "Asia/Kolkata".
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized or the timezone
    /// is not recognised.
    pub fn new(
        db_connection: Connection,
        cookie_secret: &str,
        local_timezone: &str,
        app_id: &str,
        authenticator: Arc<dyn Authenticator>,
        bootstrap_token: Option<String>,
    ) -> Result<Self, Error> {
        if get_local_offset(local_timezone).is_none() {
            return Err(Error::InvalidTimezoneError(local_timezone.to_owned()));
        }

        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));
        let provider = Arc::new(LocalIdentityProvider::new(connection.clone()));
        let store: Arc<dyn DocumentStore> = Arc::new(SqliteDocumentStore::new(connection));

        let identity = IdentityBinding::spawn(provider, bootstrap_token);
        let feed = TransactionFeed::spawn(store.clone(), app_id.to_owned(), identity.subscribe());

        Ok(Self {
            cookie_key: create_cookie_key(cookie_secret),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            local_timezone: local_timezone.to_owned(),
            app_id: app_id.to_owned(),
            authenticator,
            store,
            identity,
            feed,
            preferences: Arc::new(Mutex::new(Preferences::default())),
            delete_confirmation: Arc::new(Mutex::new(DeleteConfirmation::default())),
        })
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Create a signing key for cookies from a `secret`s string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}
