//! Log-in for the shopkeeper: credential checks, the session cookie and the
//! middleware that guards the other pages.

mod authenticator;
mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod password;
mod redirect;
mod token;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

pub use authenticator::{Authenticator, PasswordAuthenticator};
pub use cookie::{DEFAULT_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie};
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{AuthState, auth_guard, auth_guard_hx};
pub use password::{PasswordHash, ValidatedPassword};
pub(crate) use redirect::{build_log_in_redirect_url, normalize_redirect_url};
pub(crate) use token::Token;

#[cfg(test)]
pub(crate) use authenticator::FixedCredentials;
#[cfg(test)]
pub(crate) use cookie::COOKIE_TOKEN;
#[cfg(test)]
pub(crate) use redirect::log_in_url_with_redirect;

/// Why a log-in or session check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The username and password pair was not accepted.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The password could not be compared with the stored hash.
    #[error("could not check the password hash")]
    HashingError,

    /// The request has no auth cookie.
    #[error("the auth cookie is missing")]
    CookieMissing,

    /// The auth cookie does not hold a valid, unexpired token.
    #[error("the auth token is invalid or has expired")]
    InvalidToken,

    /// The session expiry could not be calculated.
    #[error("the session expiry is out of range")]
    DateError,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match self {
            AuthError::InvalidCredentials | AuthError::CookieMissing | AuthError::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::HashingError | AuthError::DateError => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string()).into_response()
    }
}
