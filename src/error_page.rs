//! Full pages for requests that could not be served.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// The fallback handler for unknown routes.
pub async fn get_404_not_found() -> Response {
    not_found_response()
}

pub fn not_found_response() -> Response {
    let page = error_view(
        "Not Found",
        "404",
        "Something's missing.",
        "Sorry, we can't find that page.",
    );

    (StatusCode::NOT_FOUND, Html(page.into_string())).into_response()
}

/// A 500 page explaining what went wrong and how to fix it.
pub fn internal_server_error_response(description: &str, fix: &str) -> Response {
    let page = error_view("Internal Server Error", "500", description, fix);

    (StatusCode::INTERNAL_SERVER_ERROR, Html(page.into_string())).into_response()
}

/// A 500 page for errors the user cannot do anything about.
pub fn generic_error_response() -> Response {
    internal_server_error_response(
        "Sorry, something went wrong.",
        "Try again later or check the server logs",
    )
}
