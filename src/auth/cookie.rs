//! Reads and writes the private cookie that keeps the shopkeeper logged in.

use std::cmp::max;

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::auth::{AuthError, Token};

pub(crate) const COOKIE_TOKEN: &str = "token";
/// How long a session lasts without activity.
pub const DEFAULT_COOKIE_DURATION: Duration = Duration::minutes(5);

/// Add a session token for `username` to `jar` that expires after `duration`.
///
/// # Errors
///
/// Returns [AuthError::DateError] if the expiry overflows, or
/// [AuthError::InvalidToken] if the token cannot be serialized.
pub fn set_auth_cookie(
    jar: PrivateCookieJar,
    username: &str,
    duration: Duration,
) -> Result<PrivateCookieJar, AuthError> {
    let expires_at = OffsetDateTime::now_utc()
        .checked_add(duration)
        .ok_or(AuthError::DateError)?;

    let token = Token {
        username: username.to_owned(),
        expires_at,
    };

    add_token_cookie(jar, &token)
}

fn add_token_cookie(jar: PrivateCookieJar, token: &Token) -> Result<PrivateCookieJar, AuthError> {
    let token_string = serde_json::to_string(token).map_err(|error| {
        tracing::error!("could not serialize auth token: {error}");
        AuthError::InvalidToken
    })?;

    Ok(jar.add(
        Cookie::build((COOKIE_TOKEN, token_string))
            .path("/")
            .expires(token.expires_at)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    ))
}

/// Replace the auth cookie with one the browser deletes straight away.
pub fn invalidate_auth_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_TOKEN, "deleted"))
            .path("/")
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Get the session token from `jar`.
///
/// # Errors
///
/// Returns:
/// - [AuthError::CookieMissing] if there is no auth cookie.
/// - [AuthError::InvalidToken] if the cookie does not hold a token or the
///   token has expired.
pub(crate) fn get_token_from_cookies(jar: &PrivateCookieJar) -> Result<Token, AuthError> {
    let cookie = jar.get(COOKIE_TOKEN).ok_or(AuthError::CookieMissing)?;
    let token: Token =
        serde_json::from_str(cookie.value_trimmed()).map_err(|_| AuthError::InvalidToken)?;

    if token.is_valid_at(OffsetDateTime::now_utc()) {
        Ok(token)
    } else {
        Err(AuthError::InvalidToken)
    }
}

/// Push the token's expiry out to at least `duration` from now.
///
/// # Errors
///
/// The cookie jar is not modified if an error is returned. Errors are those
/// of [get_token_from_cookies] plus [AuthError::DateError] if the new expiry
/// overflows.
pub(crate) fn extend_auth_cookie_duration_if_needed(
    jar: PrivateCookieJar,
    duration: Duration,
) -> Result<PrivateCookieJar, AuthError> {
    let mut token = get_token_from_cookies(&jar)?;

    let new_expiry = OffsetDateTime::now_utc()
        .checked_add(duration)
        .ok_or(AuthError::DateError)?;

    token.expires_at = max(token.expires_at, new_expiry);

    add_token_cookie(jar, &token)
}

#[cfg(test)]
mod cookie_tests {
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::{Cookie, Key},
    };
    use sha2::{Digest, Sha512};
    use time::{Duration, OffsetDateTime};

    use crate::auth::{AuthError, Token};

    use super::{
        COOKIE_TOKEN, DEFAULT_COOKIE_DURATION, extend_auth_cookie_duration_if_needed,
        get_token_from_cookies, invalidate_auth_cookie, set_auth_cookie,
    };

    fn get_jar() -> PrivateCookieJar {
        let hash = Sha512::digest(b"dukaan");
        let key = Key::from(&hash);

        PrivateCookieJar::new(key)
    }

    #[track_caller]
    fn assert_date_time_close(left: OffsetDateTime, right: OffsetDateTime) {
        assert!(
            (left - right).abs() < Duration::seconds(1),
            "got date time {left:?}, want {right:?}"
        );
    }

    #[test]
    fn set_cookie_holds_token() {
        let jar = set_auth_cookie(get_jar(), "mushahid", DEFAULT_COOKIE_DURATION).unwrap();

        let token = get_token_from_cookies(&jar).unwrap();
        let cookie = jar.get(COOKIE_TOKEN).unwrap();

        assert_eq!(token.username, "mushahid");
        assert_date_time_close(
            token.expires_at,
            OffsetDateTime::now_utc() + DEFAULT_COOKIE_DURATION,
        );
        assert_eq!(cookie.expires_datetime(), Some(token.expires_at));
    }

    #[test]
    fn missing_cookie_is_an_error() {
        assert_eq!(
            get_token_from_cookies(&get_jar()),
            Err(AuthError::CookieMissing)
        );
    }

    #[test]
    fn garbage_cookie_is_invalid() {
        let jar = get_jar().add(Cookie::new(COOKIE_TOKEN, "FOOBAR"));

        assert_eq!(get_token_from_cookies(&jar), Err(AuthError::InvalidToken));
    }

    #[test]
    fn expired_token_is_invalid() {
        let token = Token {
            username: "mushahid".to_owned(),
            expires_at: OffsetDateTime::now_utc() - Duration::seconds(1),
        };
        let jar = get_jar().add(Cookie::new(
            COOKIE_TOKEN,
            serde_json::to_string(&token).unwrap(),
        ));

        assert_eq!(get_token_from_cookies(&jar), Err(AuthError::InvalidToken));
    }

    #[test]
    fn extends_short_session() {
        let jar = set_auth_cookie(get_jar(), "mushahid", Duration::seconds(5)).unwrap();

        let jar = extend_auth_cookie_duration_if_needed(jar, Duration::minutes(10)).unwrap();

        let token = get_token_from_cookies(&jar).unwrap();
        let cookie = jar.get(COOKIE_TOKEN).unwrap();
        let want = OffsetDateTime::now_utc() + Duration::minutes(10);
        assert_date_time_close(token.expires_at, want);
        assert_date_time_close(cookie.expires_datetime().unwrap(), want);
    }

    #[test]
    fn does_not_shorten_long_session() {
        let jar = set_auth_cookie(get_jar(), "mushahid", Duration::days(7)).unwrap();
        let want = get_token_from_cookies(&jar).unwrap().expires_at;

        let jar = extend_auth_cookie_duration_if_needed(jar, Duration::seconds(5)).unwrap();

        assert_eq!(get_token_from_cookies(&jar).unwrap().expires_at, want);
    }

    #[test]
    fn invalidated_cookie_is_expired() {
        let jar = set_auth_cookie(get_jar(), "mushahid", DEFAULT_COOKIE_DURATION).unwrap();

        let jar = invalidate_auth_cookie(jar);
        let cookie = jar.get(COOKIE_TOKEN).unwrap();

        assert_eq!(cookie.value(), "deleted");
        assert_eq!(cookie.expires_datetime(), Some(OffsetDateTime::UNIX_EPOCH));
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
        assert_eq!(get_token_from_cookies(&jar), Err(AuthError::InvalidToken));
    }
}
