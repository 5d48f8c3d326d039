//! Binds the application to a user identity.
//!
//! The identity decides which document collection the ledger reads from and
//! writes to. It comes from an [IdentityProvider] and falls back to a random,
//! detached identifier when the provider cannot sign in.

mod binding;
mod local;

use std::fmt::Display;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use uuid::Uuid;

pub use binding::IdentityBinding;
pub use local::{LocalIdentityProvider, create_identity_table};

/// An opaque identifier for a user issued by an [IdentityProvider].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create a user ID from a string issued by an identity provider.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a random user ID that no identity provider knows about.
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The user ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors reported by an [IdentityProvider].
///
/// None of these are fatal: they drive the fallback from custom-token sign-in
/// to anonymous sign-in to a detached identity.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IdentityError {
    /// The custom token was not issued by the provider.
    #[error("the custom token is not recognised by the identity provider")]
    InvalidToken,

    /// The provider could not complete the request.
    #[error("the identity provider is unavailable: {0}")]
    Unavailable(String),
}

/// Signs users in and reports changes to the signed-in user.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchange a custom token for the identity it was issued to.
    async fn sign_in_with_custom_token(&self, token: &str) -> Result<UserId, IdentityError>;

    /// Sign in without credentials.
    async fn sign_in_anonymously(&self) -> Result<UserId, IdentityError>;

    /// The signed-in user, updated whenever it changes.
    ///
    /// `None` means nobody is signed in.
    fn changes(&self) -> watch::Receiver<Option<UserId>>;
}

/// Whether a bound identity is recognised by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backing {
    /// The provider issued the identity, so the document store accepts it.
    Provider,
    /// The identity was generated locally after sign-in failed.
    ///
    /// The document store does not recognise detached identities, so reads
    /// and writes against their collections fail.
    Detached,
}

/// The identity the application is currently bound to.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundIdentity {
    /// The ID used to scope the user's documents.
    pub user_id: UserId,
    /// Where the ID came from.
    pub backing: Backing,
}

impl BoundIdentity {
    /// An identity issued by the identity provider.
    pub fn backed(user_id: UserId) -> Self {
        Self {
            user_id,
            backing: Backing::Provider,
        }
    }

    /// A random identity with no backing from the identity provider.
    pub fn detached() -> Self {
        Self {
            user_id: UserId::random(),
            backing: Backing::Detached,
        }
    }
}

/// The state of the identity binding.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum IdentityState {
    /// Sign-in has not resolved yet.
    #[default]
    Pending,
    /// Sign-in resolved, either successfully or by falling back.
    Ready(BoundIdentity),
}

impl IdentityState {
    /// The bound identity, if sign-in has resolved.
    pub fn bound(&self) -> Option<&BoundIdentity> {
        match self {
            IdentityState::Pending => None,
            IdentityState::Ready(identity) => Some(identity),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_provider {
    //! An identity provider whose responses are scripted by the test.

    use async_trait::async_trait;
    use tokio::sync::watch;

    use super::{IdentityError, IdentityProvider, UserId};

    pub(crate) struct ScriptedProvider {
        pub(crate) custom_token: Result<UserId, IdentityError>,
        pub(crate) anonymous: Result<UserId, IdentityError>,
        pub(crate) current: watch::Sender<Option<UserId>>,
    }

    impl ScriptedProvider {
        pub(crate) fn new(
            custom_token: Result<UserId, IdentityError>,
            anonymous: Result<UserId, IdentityError>,
        ) -> Self {
            Self {
                custom_token,
                anonymous,
                current: watch::Sender::new(None),
            }
        }
    }

    #[async_trait]
    impl IdentityProvider for ScriptedProvider {
        async fn sign_in_with_custom_token(&self, _token: &str) -> Result<UserId, IdentityError> {
            let result = self.custom_token.clone();
            if let Ok(user_id) = &result {
                self.current.send_replace(Some(user_id.clone()));
            }
            result
        }

        async fn sign_in_anonymously(&self) -> Result<UserId, IdentityError> {
            let result = self.anonymous.clone();
            if let Ok(user_id) = &result {
                self.current.send_replace(Some(user_id.clone()));
            }
            result
        }

        fn changes(&self) -> watch::Receiver<Option<UserId>> {
            self.current.subscribe()
        }
    }
}
