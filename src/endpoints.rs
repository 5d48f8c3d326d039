//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/transactions/{transaction_id}',
//! use [format_endpoint].

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The landing page for logged in users.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The page for choosing the language and theme.
pub const SETTINGS_VIEW: &str = "/settings";
/// Try to get a cup of coffee.
pub const COFFEE: &str = "/coffee";

/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route to update the language and theme.
pub const PREFERENCES_API: &str = "/api/preferences";
/// The route to create transactions.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route to update a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route for the transaction form in edit mode.
pub const EDIT_TRANSACTION_FORM: &str = "/api/transactions/{transaction_id}/edit";
/// The route for a blank transaction form.
pub const NEW_TRANSACTION_FORM: &str = "/api/transactions/form";
/// The route to ask for confirmation before deleting a transaction.
pub const DELETE_TRANSACTION_REQUEST: &str = "/api/transactions/{transaction_id}/delete";
/// The route to confirm the pending delete.
pub const DELETE_TRANSACTION_CONFIRM: &str = "/api/transactions/delete/confirm";
/// The route to cancel the pending delete.
pub const DELETE_TRANSACTION_CANCEL: &str = "/api/transactions/delete/cancel";
/// The server-sent event stream of ledger updates.
pub const LEDGER_EVENTS: &str = "/api/transactions/events";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/users/{user_id}', '{user_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: impl std::fmt::Display) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
