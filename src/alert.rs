//! Alert messages swapped into the fixed alert container at the bottom of the page.
//!
//! Every page rendered through [crate::html::base] includes an empty
//! `#alert-container` element. Handlers that respond to HTMX requests return
//! these alerts with `hx-target-error="#alert-container"` set on the
//! triggering form so errors appear without a full page reload.

use maud::{Markup, html};

const ALERT_STYLE: &str =
    "flex items-center p-4 mb-4 text-sm rounded-lg shadow-lg text-red-800 bg-red-50 dark:bg-gray-800 dark:text-red-400";

/// A dismissible error message displayed in the alert container.
pub struct Alert {
    message: String,
    details: String,
}

impl Alert {
    /// Creates an alert describing a failed operation.
    pub fn error(message: &str, details: &str) -> Self {
        Self {
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    /// Render the alert as HTML.
    pub fn into_html(self) -> Markup {
        html!(
            div
                role="alert"
                class=(ALERT_STYLE)
            {
                div
                {
                    span class="font-medium" { (self.message) }

                    @if !self.details.is_empty() {
                        p class="mt-1" { (self.details) }
                    }
                }

                button
                    type="button"
                    class="ms-auto -mx-1.5 -my-1.5 p-1.5 rounded-lg focus:ring-2 inline-flex items-center justify-center h-8 w-8"
                    aria-label="Close"
                    onclick="this.closest('[role=alert]').remove(); document.getElementById('alert-container').classList.add('hidden');"
                {
                    "✕"
                }
            }

            script
            {
                "document.getElementById('alert-container').classList.remove('hidden');"
            }
        )
    }
}

#[cfg(test)]
mod alert_tests {
    use super::Alert;

    #[test]
    fn alert_renders_message_and_details() {
        let html = Alert::error("Could not load dashboard data", "database is locked")
            .into_html()
            .into_string();

        assert!(html.contains("Could not load dashboard data"));
        assert!(html.contains("database is locked"));
        assert!(html.contains("text-red-800"));
    }

    #[test]
    fn empty_details_are_not_rendered() {
        let html = Alert::error("Something went wrong", "")
            .into_html()
            .into_string();

        assert!(!html.contains("<p"));
    }

    #[test]
    fn alert_reveals_the_alert_container() {
        let html = Alert::error("Something went wrong", "")
            .into_html()
            .into_string();

        assert!(html.contains("classList.remove('hidden')"));
    }
}
