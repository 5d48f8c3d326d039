//! Ends the shopkeeper's session.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::PrivateCookieJar;

use crate::{auth::invalidate_auth_cookie, endpoints};

/// Invalidate the auth cookie and send the client back to the log-in page.
pub async fn get_log_out(jar: PrivateCookieJar) -> Response {
    tracing::info!("logging out");
    let jar = invalidate_auth_cookie(jar);

    (jar, Redirect::to(endpoints::LOG_IN_VIEW)).into_response()
}
