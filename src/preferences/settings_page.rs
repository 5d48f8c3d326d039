//! The settings page, where the shopkeeper picks the language and theme.

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error, endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base, card_style},
    navigation::NavBar,
    preferences::{Language, Preferences, SharedPreferences, Text, Theme, read_preferences},
};

/// The state needed for the settings page.
#[derive(Debug, Clone)]
pub struct SettingsState {
    pub preferences: SharedPreferences,
}

impl FromRef<AppState> for SettingsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            preferences: state.preferences.clone(),
        }
    }
}

/// The form data for changing preferences. Unknown values are rejected
/// when the form is parsed.
#[derive(Debug, Deserialize)]
pub struct PreferencesForm {
    pub language: Language,
    pub theme: Theme,
}

fn preferences_form(preferences: &Preferences) -> Markup {
    html! {
        form
            hx-post=(endpoints::PREFERENCES_API)
            hx-trigger="change, submit"
            class="space-y-6"
        {
            div
            {
                label for="language" class=(FORM_LABEL_STYLE)
                {
                    (preferences.text(Text::SelectLanguage))
                }

                select name="language" id="language" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for language in Language::ALL {
                        option
                            value=(language.as_str())
                            selected[language == preferences.language]
                        {
                            (language.name())
                        }
                    }
                }
            }

            div
            {
                label for="theme" class=(FORM_LABEL_STYLE)
                {
                    (preferences.text(Text::SelectTheme))
                }

                select name="theme" id="theme" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for theme in Theme::ALL {
                        option
                            value=(theme.as_str())
                            selected[theme == preferences.theme]
                        {
                            (preferences.text(theme.label()))
                        }
                    }
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE)
            {
                (preferences.text(Text::Save))
            }
        }
    }
}

/// Display the settings page.
pub async fn get_settings_page(State(state): State<SettingsState>) -> Response {
    let preferences = read_preferences(&state.preferences);
    let nav_bar = NavBar::new(endpoints::SETTINGS_VIEW, preferences).into_html();

    let content = html! {
        (nav_bar)

        main class="max-w-md mx-auto p-4"
        {
            div class=(card_style(&preferences))
            {
                h2 class="text-2xl font-bold mb-6" { (preferences.text(Text::Settings)) }

                (preferences_form(&preferences))
            }
        }
    };

    base(preferences.text(Text::Settings), &preferences, &content).into_response()
}

/// Save the chosen language and theme, then reload the settings page so
/// every element picks up the change.
pub async fn update_preferences(
    State(state): State<SettingsState>,
    Form(form): Form<PreferencesForm>,
) -> Response {
    let updated = Preferences {
        language: form.language,
        theme: form.theme,
    };

    match state.preferences.lock() {
        Ok(mut preferences) => *preferences = updated,
        Err(error) => {
            tracing::error!("could not acquire preferences lock: {error}");
            return Error::LockError("preferences").into_alert_response();
        }
    }

    tracing::info!(
        "preferences set to {} with the {} theme",
        updated.language.as_str(),
        updated.theme.as_str()
    );

    (
        HxRedirect(endpoints::SETTINGS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Form, Router, extract::State, http::StatusCode, routing::post};
    use axum_test::TestServer;
    use scraper::Selector;

    use crate::{
        endpoints,
        preferences::{Language, Preferences, Theme},
        test_utils::{
            assert_hx_endpoint, assert_hx_redirect, assert_valid_html, must_get_form,
            parse_html_document,
        },
    };

    use super::{PreferencesForm, SettingsState, get_settings_page, update_preferences};

    fn get_state(preferences: Preferences) -> SettingsState {
        SettingsState {
            preferences: Arc::new(Mutex::new(preferences)),
        }
    }

    #[tokio::test]
    async fn settings_page_selects_current_preferences() {
        let state = get_state(Preferences {
            language: Language::Hinglish,
            theme: Theme::Blue,
        });

        let response = get_settings_page(State(state)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        let form = must_get_form(&document);
        assert_hx_endpoint(&form, endpoints::PREFERENCES_API, "hx-post");

        let selected: Vec<&str> = document
            .select(&Selector::parse("option[selected]").unwrap())
            .filter_map(|option| option.value().attr("value"))
            .collect();
        assert_eq!(selected, ["hinglish", "blue"]);

        let body_class = document
            .select(&Selector::parse("body").unwrap())
            .next()
            .unwrap()
            .value()
            .attr("class")
            .unwrap();
        assert!(body_class.contains("bg-blue-900"), "got {body_class:?}");
    }

    #[tokio::test]
    async fn update_changes_preferences_and_reloads() {
        let state = get_state(Preferences::default());

        let response = update_preferences(
            State(state.clone()),
            Form(PreferencesForm {
                language: Language::Hinglish,
                theme: Theme::Dark,
            }),
        )
        .await;

        assert_hx_redirect(&response, endpoints::SETTINGS_VIEW);
        assert_eq!(
            *state.preferences.lock().unwrap(),
            Preferences {
                language: Language::Hinglish,
                theme: Theme::Dark,
            }
        );
    }

    #[tokio::test]
    async fn rejects_unknown_theme() {
        let state = get_state(Preferences::default());
        let app = Router::new()
            .route(endpoints::PREFERENCES_API, post(update_preferences))
            .with_state(state.clone());
        let server = TestServer::try_new(app).expect("Could not create test server.");

        let response = server
            .post(endpoints::PREFERENCES_API)
            .form(&[("language", "english"), ("theme", "purple")])
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(*state.preferences.lock().unwrap(), Preferences::default());
    }
}
