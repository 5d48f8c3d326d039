//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router,
    http::StatusCode,
    middleware,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post, put},
};

use crate::{
    AppState,
    auth::{auth_guard, auth_guard_hx, get_log_in_page, get_log_out, post_log_in},
    dashboard::{get_dashboard_page, get_ledger_events},
    endpoints,
    error_page::get_404_not_found,
    preferences::{get_settings_page, update_preferences},
    transaction::{
        cancel_delete_endpoint, confirm_delete_endpoint, create_transaction_endpoint,
        edit_transaction_endpoint, get_edit_transaction_form, get_new_transaction_form,
        request_delete_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::COFFEE, get(get_coffee))
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out));

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::SETTINGS_VIEW, get(get_settings_page))
        // EventSource cannot follow HX-Redirect, so the stream uses a plain redirect.
        .route(endpoints::LEDGER_EVENTS, get(get_ledger_events))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // These routes are called by htmx and need the HX-REDIRECT header for auth redirects to work properly.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(endpoints::PREFERENCES_API, post(update_preferences))
            .route(
                endpoints::TRANSACTIONS_API,
                post(create_transaction_endpoint),
            )
            .route(endpoints::TRANSACTION, put(edit_transaction_endpoint))
            .route(
                endpoints::EDIT_TRANSACTION_FORM,
                get(get_edit_transaction_form),
            )
            .route(
                endpoints::NEW_TRANSACTION_FORM,
                get(get_new_transaction_form),
            )
            .route(
                endpoints::DELETE_TRANSACTION_REQUEST,
                get(request_delete_endpoint),
            )
            .route(
                endpoints::DELETE_TRANSACTION_CONFIRM,
                post(confirm_delete_endpoint),
            )
            .route(
                endpoints::DELETE_TRANSACTION_CANCEL,
                post(cancel_delete_endpoint),
            )
            .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Attempt to get a cup of coffee from the server.
async fn get_coffee() -> Response {
    (StatusCode::IM_A_TEAPOT, Html("I'm a teapot")).into_response()
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
