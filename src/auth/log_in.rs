//! The log-in page and the handler for the log-in form.

use std::sync::Arc;

use axum::{
    Form,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use maud::{Markup, html};
use serde::Deserialize;
use time::Duration;

use crate::{
    AppState,
    alert::Alert,
    auth::{AuthError, Authenticator, normalize_redirect_url, set_auth_cookie},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, base, loading_spinner, log_in_card,
        password_input, text_input,
    },
    preferences::{Preferences, SharedPreferences, Text, read_preferences},
};

/// How long the next page waits before replacing the success message.
const SUCCESS_MESSAGE_DELAY: &str = "1500ms";

/// How long the session lasts if the shopkeeper ticks "remember me".
const REMEMBER_ME_COOKIE_DURATION: Duration = Duration::days(7);

/// The state needed to log in.
#[derive(Debug, Clone)]
pub struct LoginState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// How long a session lasts without "remember me".
    pub cookie_duration: Duration,
    pub authenticator: Arc<dyn Authenticator>,
    pub preferences: SharedPreferences,
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            authenticator: state.authenticator.clone(),
            preferences: state.preferences.clone(),
        }
    }
}

impl FromRef<LoginState> for Key {
    fn from_ref(state: &LoginState) -> Self {
        state.cookie_key.clone()
    }
}

#[derive(Deserialize)]
pub struct RedirectQuery {
    pub redirect_url: Option<String>,
}

/// The raw data entered in the log-in form.
#[derive(Deserialize)]
pub struct LogInData {
    pub username: String,
    pub password: String,

    /// A checkbox, so any value means "yes" and a missing field means "no".
    pub remember_me: Option<String>,

    /// Where to go after logging in, carried over from the log-in page URL.
    pub redirect_url: Option<String>,
}

fn log_in_form(
    preferences: &Preferences,
    username: &str,
    error_message: Option<&str>,
    redirect_url: Option<&str>,
) -> Markup {
    html! {
        form
            hx-post=(endpoints::LOG_IN_API)
            hx-swap="outerHTML"
            hx-indicator="#indicator"
            hx-disabled-elt="#username, #password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            @if let Some(redirect_url) = redirect_url {
                input type="hidden" name="redirect_url" value=(redirect_url);
            }

            (text_input("username", preferences.text(Text::Username), username, None, true))

            (password_input(preferences.text(Text::Password), "", error_message))

            div class="flex items-center gap-x-3"
            {
                input type="checkbox" name="remember_me" id="remember_me" class="rounded-xs";

                label for="remember_me" class=(FORM_LABEL_STYLE)
                {
                    (preferences.text(Text::RememberMe))
                }
            }

            button type="submit" id="submit-button" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                (preferences.text(Text::LoginButton))
            }
        }
    }
}

/// Shown in place of the form after a successful log-in. Once the delay is
/// up, htmx swaps in the page at `redirect_url`.
fn log_in_success(preferences: &Preferences, redirect_url: &str) -> Markup {
    html! {
        div
            id="log-in-success"
            class="space-y-4"
            hx-get=(redirect_url)
            hx-trigger={ "load delay:" (SUCCESS_MESSAGE_DELAY) }
            hx-target="body"
            hx-swap="innerHTML"
            hx-push-url="true"
        {
            (Alert::success(preferences.text(Text::LoginSuccess), "").into_html())
        }
    }
}

fn parse_redirect_url(raw_url: Option<&str>) -> Option<String> {
    let raw_url = raw_url?;
    let redirect_url = normalize_redirect_url(raw_url);

    if redirect_url.is_none() {
        tracing::warn!("ignoring unsafe redirect URL {raw_url}");
    }

    redirect_url
}

/// Display the log-in page.
pub async fn get_log_in_page(
    State(state): State<LoginState>,
    Query(query): Query<RedirectQuery>,
) -> Response {
    let preferences = read_preferences(&state.preferences);
    let redirect_url = parse_redirect_url(query.redirect_url.as_deref());

    let form = log_in_form(&preferences, "", None, redirect_url.as_deref());
    let content = log_in_card(&preferences, &form);

    base(preferences.text(Text::LoginTitle), &preferences, &content).into_response()
}

/// Handler for the log-in form.
///
/// On success the auth cookie is set and the form is replaced with a success
/// message that loads the dashboard, or the page the shopkeeper was sent from,
/// after a short delay. Otherwise the form is returned with an error message
/// and the username filled in.
pub async fn post_log_in(
    State(state): State<LoginState>,
    jar: PrivateCookieJar,
    Form(data): Form<LogInData>,
) -> Response {
    let preferences = read_preferences(&state.preferences);
    let redirect_url = parse_redirect_url(data.redirect_url.as_deref());

    let error_message = match state
        .authenticator
        .authenticate(&data.username, &data.password)
    {
        Ok(()) => None,
        Err(AuthError::InvalidCredentials) => Some(preferences.text(Text::LoginFailed)),
        Err(error) => {
            tracing::error!("could not check credentials: {error}");
            Some(preferences.text(Text::InternalError))
        }
    };

    if let Some(error_message) = error_message {
        return log_in_form(
            &preferences,
            &data.username,
            Some(error_message),
            redirect_url.as_deref(),
        )
        .into_response();
    }

    let cookie_duration = if data.remember_me.is_some() {
        REMEMBER_ME_COOKIE_DURATION
    } else {
        state.cookie_duration
    };

    match set_auth_cookie(jar, &data.username, cookie_duration) {
        Ok(jar) => {
            tracing::info!("{} logged in", data.username);
            let redirect_url = redirect_url.as_deref().unwrap_or(endpoints::DASHBOARD_VIEW);

            (jar, log_in_success(&preferences, redirect_url)).into_response()
        }
        Err(error) => {
            tracing::error!("could not set auth cookie: {error}");
            log_in_form(
                &preferences,
                &data.username,
                Some(preferences.text(Text::InternalError)),
                redirect_url.as_deref(),
            )
            .into_response()
        }
    }
}
