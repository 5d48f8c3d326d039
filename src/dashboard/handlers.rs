//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - The route handler for the dashboard page
//! - The server-sent event stream that pushes the re-rendered ledger
//! - The state used by both

use std::convert::Infallible;

use axum::{
    extract::{FromRef, State},
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
};
use maud::{Markup, html};
use tokio::sync::watch;
use tokio_stream::{Stream, StreamExt, wrappers::WatchStream};

use crate::{
    AppState,
    dashboard::ledger::{LEDGER_ID, ledger_view},
    endpoints,
    html::{base, loading_spinner},
    identity::{IdentityBinding, UserId},
    navigation::NavBar,
    preferences::{Preferences, SharedPreferences, Text, read_preferences},
    transaction::{Ledger, TransactionFeed, blank_transaction_form},
};

/// How long the loading view waits before asking for the dashboard again.
const LOADING_POLL_DELAY: &str = "1s";
/// The name of the server-sent event that carries the ledger.
const LEDGER_EVENT: &str = "ledger";

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub identity: IdentityBinding,
    pub feed: TransactionFeed,
    pub preferences: SharedPreferences,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            identity: state.identity.clone(),
            feed: state.feed.clone(),
            preferences: state.preferences.clone(),
        }
    }
}

/// Display the ledger of the bound user and the form for adding entries.
///
/// While sign-in is still running a loading view is shown instead, which
/// polls until the identity is ready.
pub async fn get_dashboard_page(State(state): State<DashboardState>) -> Response {
    let preferences = read_preferences(&state.preferences);
    let title = preferences.text(Text::DashboardTitle);

    let content = match state.identity.current().bound() {
        Some(identity) => {
            dashboard_view(&identity.user_id, &state.feed.current(), &preferences)
        }
        None => loading_view(&preferences),
    };

    base(title, &preferences, &content).into_response()
}

fn loading_view(preferences: &Preferences) -> Markup {
    html! {
        div
            id="dashboard"
            hx-get=(endpoints::DASHBOARD_VIEW)
            hx-trigger={ "load delay:" (LOADING_POLL_DELAY) }
            hx-select="#dashboard"
            hx-target="this"
            hx-swap="outerHTML"
            class="flex flex-col items-center justify-center min-h-screen gap-4"
        {
            (loading_spinner())
            p class="text-lg" { (preferences.text(Text::Loading)) }
        }
    }
}

fn dashboard_view(user_id: &UserId, ledger: &Ledger, preferences: &Preferences) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW, *preferences).into_html();

    // The nav bar lives inside #dashboard so the loading view swaps it in too.
    html! {
        div id="dashboard"
        {
            (nav_bar)

            div class="max-w-screen-xl mx-auto px-4 py-8 space-y-6"
            {
                header
                {
                    h1 class="text-3xl font-bold" { (preferences.text(Text::DashboardTitle)) }
                    p class="text-sm opacity-75"
                    {
                        (preferences.text(Text::UserId)) " "
                        code id="user-id" class="break-all" { (user_id.as_str()) }
                    }
                }

                div class="grid grid-cols-1 lg:grid-cols-3 gap-6"
                {
                    div class="lg:col-span-1"
                    {
                        (blank_transaction_form(preferences))
                    }

                    div
                        class="lg:col-span-2"
                        hx-ext="sse"
                        sse-connect=(endpoints::LEDGER_EVENTS)
                    {
                        div id=(LEDGER_ID) sse-swap=(LEDGER_EVENT)
                        {
                            (ledger_view(ledger, preferences))
                        }
                    }
                }
            }
        }
    }
}

/// The rendered ledger, once for the current value and again every time the
/// feed publishes a new one.
fn rendered_ledgers(
    ledger: watch::Receiver<Ledger>,
    preferences: SharedPreferences,
) -> impl Stream<Item = String> {
    WatchStream::new(ledger).map(move |ledger| {
        let preferences = read_preferences(&preferences);
        ledger_view(&ledger, &preferences).into_string()
    })
}

/// Stream the ledger to the dashboard as server-sent events.
///
/// The stream ends when the client disconnects.
pub async fn get_ledger_events(
    State(state): State<DashboardState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    tracing::debug!("Client connected to the ledger stream");

    let events = rendered_ledgers(state.feed.subscribe(), state.preferences)
        .map(|markup| Ok(Event::default().event(LEDGER_EVENT).data(markup)));

    Sse::new(events).keep_alive(KeepAlive::default())
}
