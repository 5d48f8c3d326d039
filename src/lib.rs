//! Shop Book is a web app for shopkeepers to keep a ledger of their income
//! and expenses.
//!
//! This library provides a REST API that directly serves HTML pages. The
//! ledger lives in a document store scoped to the signed-in identity and is
//! pushed to the dashboard live as it changes.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod auth;
mod background_task;
mod dashboard;
mod db;
mod endpoints;
mod error_page;
mod html;
mod identity;
mod logging;
mod navigation;
mod preferences;
mod routing;
mod store;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::{AppState, create_cookie_key};
pub use auth::{Authenticator, PasswordAuthenticator, PasswordHash, ValidatedPassword};
pub use db::initialize as initialize_db;
pub use identity::{IdentityProvider, LocalIdentityProvider};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;

use crate::{
    alert::Alert,
    auth::AuthError,
    error_page::{generic_error_response, internal_server_error_response, not_found_response},
    store::StoreError,
    transaction::ValidationError,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// Logging in or checking the session failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The configured password hash is not a bcrypt hash.
    #[error("\"{0}\" is not a valid bcrypt hash")]
    InvalidPasswordHash(String),

    /// A submitted transaction was rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Reading from or writing to the document store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Sign-in has not finished, so there is no collection to use yet.
    #[error("the identity is not ready yet")]
    IdentityNotReady,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the lock on the named piece of shared state.
    #[error("could not acquire the {0} lock")]
    LockError(&'static str),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

fn invalid_timezone_fix(timezone: &str) -> String {
    format!(
        "Could not get local timezone \"{timezone}\". Check your server settings and \
        ensure the timezone has been set to valid, canonical timezone string"
    )
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Store(StoreError::NotFound) => not_found_response(),
            Error::Auth(error) => error.into_response(),
            Error::InvalidTimezoneError(timezone) => internal_server_error_response(
                "Invalid Timezone Settings",
                &invalid_timezone_fix(&timezone),
            ),
            Error::IdentityNotReady => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Still signing in, try again in a moment.",
            )
                .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                generic_error_response()
            }
        }
    }
}

impl Error {
    /// Render the error as an alert fragment for htmx to swap into the alert
    /// container.
    pub(crate) fn into_alert_response(self) -> Response {
        match self {
            Error::InvalidTimezoneError(timezone) => Alert::error(
                "Invalid Timezone Settings",
                &invalid_timezone_fix(&timezone),
            )
            .render(StatusCode::INTERNAL_SERVER_ERROR),
            Error::Store(StoreError::NotFound) => Alert::error(
                "Could not find transaction",
                "The transaction could not be found. \
                Try refreshing the page to see if the transaction has been deleted.",
            )
            .render(StatusCode::NOT_FOUND),
            Error::IdentityNotReady => Alert::error(
                "Still signing in",
                "Your account is not ready yet. Wait a moment and try again.",
            )
            .render(StatusCode::SERVICE_UNAVAILABLE),
            Error::Validation(error) => {
                Alert::error("Invalid transaction", &error.to_string()).render(StatusCode::BAD_REQUEST)
            }
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                Alert::error(
                    "Something went wrong",
                    "An unexpected error occurred, check the server logs for more details.",
                )
                .render(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}
