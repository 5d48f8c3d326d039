//! Checks the username and password entered on the log-in page.

use std::fmt::Debug;

use crate::auth::{AuthError, PasswordHash};

/// Decides whether a username and password pair may log in.
pub trait Authenticator: Debug + Send + Sync {
    /// Succeeds only for the accepted pair. Both fields are compared
    /// case-sensitively.
    ///
    /// # Errors
    ///
    /// Returns [AuthError::InvalidCredentials] for any other pair, or
    /// [AuthError::HashingError] if the password could not be checked.
    fn authenticate(&self, username: &str, password: &str) -> Result<(), AuthError>;
}

/// Accepts a single shopkeeper account whose password is stored as a
/// bcrypt hash.
#[derive(Debug, Clone)]
pub struct PasswordAuthenticator {
    username: String,
    password_hash: PasswordHash,
}

impl PasswordAuthenticator {
    pub fn new(username: impl Into<String>, password_hash: PasswordHash) -> Self {
        Self {
            username: username.into(),
            password_hash,
        }
    }
}

impl Authenticator for PasswordAuthenticator {
    fn authenticate(&self, username: &str, password: &str) -> Result<(), AuthError> {
        // The hash is checked even for an unknown username so both cases take
        // as long to answer.
        let password_matches = self.password_hash.verify(password).map_err(|error| {
            tracing::error!("could not verify password: {error}");
            AuthError::HashingError
        })?;

        if password_matches && username == self.username {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

/// The demo account used by the handler tests.
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct FixedCredentials;

#[cfg(test)]
impl FixedCredentials {
    pub const USERNAME: &str = "mushahid";
    pub const PASSWORD: &str = "hisab";
}

#[cfg(test)]
impl Authenticator for FixedCredentials {
    fn authenticate(&self, username: &str, password: &str) -> Result<(), AuthError> {
        if username == Self::USERNAME && password == Self::PASSWORD {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}
