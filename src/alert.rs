//! Alert system for displaying success and error messages to users.
//!
//! Alerts are rendered into the `#alert-container` element that [crate::html::base]
//! places on every page, either as the target of an `hx-target-error`
//! attribute or as an out-of-band swap.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

/// A message shown to the user after an HTMX request.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    SuccessSimple { message: String },
    Error { message: String, details: String },
}

impl Alert {
    pub fn into_html(self) -> Markup {
        let (message, details, is_error) = match self {
            Alert::SuccessSimple { message } => (message, String::new(), false),
            Alert::Error { message, details } => (message, details, true),
        };

        let container_style = if is_error {
            "flex items-start p-4 mb-4 text-red-800 border border-red-300 rounded-lg \
            bg-red-50 dark:bg-gray-800 dark:text-red-400 dark:border-red-800"
        } else {
            "flex items-start p-4 mb-4 text-green-800 border border-green-300 rounded-lg \
            bg-green-50 dark:bg-gray-800 dark:text-green-400 dark:border-green-800"
        };

        html! {
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div class=(container_style) role="alert"
                {
                    div class="ms-3 text-sm"
                    {
                        p class="font-semibold" { (message) }

                        @if !details.is_empty() {
                            p class="mt-1" { (details) }
                        }
                    }

                    button
                        type="button"
                        class="ms-auto -mx-1.5 -my-1.5 rounded-lg p-1.5 inline-flex
                            items-center justify-center h-8 w-8 hover:opacity-75"
                        aria-label="Dismiss"
                        onclick="this.closest('[role=alert]').remove()"
                    {
                        "✕"
                    }
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}
