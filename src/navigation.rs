//! The navigation bar shown at the top of every page after log-in.

use maud::{Markup, html};

use crate::{
    endpoints,
    preferences::{Preferences, Text},
};

/// A link in the navigation bar. Only one link should be current at a time.
#[derive(Clone)]
struct Link<'a> {
    url: &'a str,
    title: &'a str,
    is_current: bool,
}

impl Link<'_> {
    fn into_html(self) -> Markup {
        let style = if self.is_current {
            "block py-2 px-3 rounded-sm font-semibold underline underline-offset-4"
        } else {
            "block py-2 px-3 rounded-sm opacity-75 hover:opacity-100"
        };

        html! {
            a
                href=(self.url)
                class=(style)
                aria-current=[self.is_current.then_some("page")]
            {
                (self.title)
            }
        }
    }
}

pub struct NavBar<'a> {
    links: Vec<Link<'a>>,
    preferences: Preferences,
}

impl NavBar<'_> {
    /// Get the navigation bar, with the link for `active_endpoint` marked as
    /// the current page and link text in the chosen language.
    pub fn new(active_endpoint: &str, preferences: Preferences) -> NavBar<'_> {
        let links = vec![
            Link {
                url: endpoints::DASHBOARD_VIEW,
                title: preferences.text(Text::Dashboard),
                is_current: active_endpoint == endpoints::DASHBOARD_VIEW,
            },
            Link {
                url: endpoints::SETTINGS_VIEW,
                title: preferences.text(Text::Settings),
                is_current: active_endpoint == endpoints::SETTINGS_VIEW,
            },
            Link {
                url: endpoints::LOG_OUT,
                title: preferences.text(Text::Logout),
                is_current: false,
            },
        ];

        NavBar { links, preferences }
    }

    pub fn into_html(self) -> Markup {
        html! {
            nav class={ "border-b " (self.preferences.theme.card_classes()) }
            {
                div
                    class="max-w-screen-xl flex flex-wrap items-center justify-between mx-auto p-4"
                {
                    a href=(endpoints::DASHBOARD_VIEW) class="text-2xl font-semibold whitespace-nowrap"
                    {
                        (self.preferences.text(Text::DashboardTitle))
                    }

                    ul class="font-medium flex flex-row gap-x-4"
                    {
                        @for link in self.links {
                            li { (link.into_html()) }
                        }
                    }
                }
            }
        }
    }
}
