//! Display preferences: the UI language and the colour theme.
//!
//! Preferences are held in memory for the lifetime of the server.

mod settings_page;
mod text;

use std::sync::{Arc, Mutex};

use serde::Deserialize;

pub use settings_page::{get_settings_page, update_preferences};
pub use text::Text;

/// The language the UI is shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    /// Hindi written in the Latin alphabet.
    Hinglish,
}

impl Language {
    /// Every language, in the order they are offered.
    pub const ALL: [Language; 2] = [Language::English, Language::Hinglish];

    /// The form value for the language.
    pub fn as_str(self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Hinglish => "hinglish",
        }
    }

    /// The name of the language, written in that language.
    pub fn name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hinglish => "Hinglish",
        }
    }

    /// The value for the `lang` attribute of the page.
    pub fn html_lang(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hinglish => "hi-Latn",
        }
    }
}

/// The colour scheme of the pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Blue,
}

impl Theme {
    /// Every theme, in the order they are offered.
    pub const ALL: [Theme; 3] = [Theme::Light, Theme::Dark, Theme::Blue];

    /// The form value for the theme.
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Blue => "blue",
        }
    }

    /// The label for the theme.
    pub fn label(self) -> Text {
        match self {
            Theme::Light => Text::ThemeLight,
            Theme::Dark => Text::ThemeDark,
            Theme::Blue => Text::ThemeBlue,
        }
    }

    /// Classes for the page background and text.
    pub fn page_classes(self) -> &'static str {
        match self {
            Theme::Light => "bg-gray-100 text-gray-900",
            Theme::Dark => "bg-gray-900 text-gray-100",
            Theme::Blue => "bg-blue-900 text-blue-100",
        }
    }

    /// Classes for the background and border of cards.
    pub fn card_classes(self) -> &'static str {
        match self {
            Theme::Light => "bg-white border-gray-200",
            Theme::Dark => "bg-gray-800 border-gray-700",
            Theme::Blue => "bg-blue-800 border-blue-700",
        }
    }

    /// Whether `dark:` styles should apply, e.g. for form inputs.
    pub fn is_dark(self) -> bool {
        !matches!(self, Theme::Light)
    }
}

/// The language and theme chosen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Preferences {
    /// The UI language.
    pub language: Language,
    /// The colour theme.
    pub theme: Theme,
}

impl Preferences {
    /// Shortcut for `self.language.text(key)`.
    pub fn text(&self, key: Text) -> &'static str {
        self.language.text(key)
    }
}

/// Preferences shared between request handlers.
pub type SharedPreferences = Arc<Mutex<Preferences>>;

/// Get a copy of the current preferences.
///
/// Falls back to the default preferences if the lock is poisoned, since
/// preferences only affect how pages look.
pub fn read_preferences(preferences: &SharedPreferences) -> Preferences {
    match preferences.lock() {
        Ok(preferences) => *preferences,
        Err(error) => {
            tracing::error!("could not acquire preferences lock: {error}");
            Preferences::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Language, Theme};

    #[test]
    fn theme_classes_match_theme() {
        assert_eq!(Theme::Light.page_classes(), "bg-gray-100 text-gray-900");
        assert_eq!(Theme::Dark.card_classes(), "bg-gray-800 border-gray-700");
        assert_eq!(Theme::Blue.page_classes(), "bg-blue-900 text-blue-100");
    }

    #[test]
    fn form_values_round_trip_through_serde() {
        for language in Language::ALL {
            let json = format!("\"{}\"", language.as_str());
            assert_eq!(serde_json::from_str::<Language>(&json).unwrap(), language);
        }

        for theme in Theme::ALL {
            let json = format!("\"{}\"", theme.as_str());
            assert_eq!(serde_json::from_str::<Theme>(&json).unwrap(), theme);
        }
    }
}
