//! Alert system for displaying success and error messages to users.
//!
//! Alerts are HTML fragments that htmx swaps into the `#alert-container`
//! element of the base page, or directly into the element that made the
//! request.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

/// Alert message types for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertType {
    Success,
    Error,
}

/// An alert message with optional details.
#[derive(Debug, Clone)]
pub struct Alert<'a> {
    pub alert_type: AlertType,
    pub message: &'a str,
    pub details: &'a str,
}

impl<'a> Alert<'a> {
    /// Create a new success alert
    pub fn success(message: &'a str, details: &'a str) -> Self {
        Self {
            alert_type: AlertType::Success,
            message,
            details,
        }
    }

    /// Create a new error alert
    pub fn error(message: &'a str, details: &'a str) -> Self {
        Self {
            alert_type: AlertType::Error,
            message,
            details,
        }
    }

    pub fn into_html(self) -> Markup {
        let style = match self.alert_type {
            AlertType::Success => {
                "flex items-start gap-3 p-4 rounded-lg border text-green-800 \
                border-green-300 bg-green-50 dark:bg-gray-800 dark:text-green-400 \
                dark:border-green-800"
            }
            AlertType::Error => {
                "flex items-start gap-3 p-4 rounded-lg border text-red-800 \
                border-red-300 bg-red-50 dark:bg-gray-800 dark:text-red-400 \
                dark:border-red-800"
            }
        };

        html! {
            div id="alert" role="alert" class=(style)
            {
                div class="flex-1"
                {
                    p class="font-semibold" { (self.message) }

                    @if !self.details.is_empty()
                    {
                        p class="text-sm" { (self.details) }
                    }
                }

                button
                    type="button"
                    aria-label="Close"
                    onclick="this.parentElement.remove()"
                    class="bg-transparent border-none cursor-pointer"
                {
                    "×"
                }
            }
        }
    }

    /// Render the alert as a response with `status`.
    pub fn render(self, status: StatusCode) -> Response {
        (status, self.into_html()).into_response()
    }
}
