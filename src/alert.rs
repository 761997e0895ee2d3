//! Alert messages that are swapped into the alert container at the bottom of every page.

use maud::{Markup, html};

/// A short message shown to the user after an action succeeded or failed.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    Success { message: String, details: String },
    Error { message: String, details: String },
}

impl Alert {
    pub fn into_html(self) -> Markup {
        let (message, details, container_style, icon) = match self {
            Alert::Success { message, details } => (
                message,
                details,
                "flex items-start gap-3 p-4 rounded-lg shadow border border-green-300 \
                bg-green-50 text-green-800 dark:bg-gray-800 dark:text-green-400 \
                dark:border-green-800",
                "✓",
            ),
            Alert::Error { message, details } => (
                message,
                details,
                "flex items-start gap-3 p-4 rounded-lg shadow border border-red-300 \
                bg-red-50 text-red-800 dark:bg-gray-800 dark:text-red-400 \
                dark:border-red-800",
                "!",
            ),
        };

        html! {
            div
                role="alert"
                class=(container_style)
            {
                span class="font-bold" { (icon) }

                div
                {
                    p class="text-sm font-medium" { (message) }

                    @if !details.is_empty() {
                        p class="text-sm" { (details) }
                    }
                }

                button
                    type="button"
                    aria-label="Tutup"
                    class="ms-auto text-sm font-semibold opacity-70 hover:opacity-100"
                    onclick="this.closest('[role=alert]').remove()"
                {
                    "×"
                }
            }
        }
    }
}
