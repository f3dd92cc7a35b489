//! Defines the templates and route handlers for the 404 Not Found page.
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// The content of the 404 Not Found page.
pub struct NotFoundError;

impl NotFoundError {
    /// Render the error page as HTML.
    pub fn into_html(self) -> Html<String> {
        Html(
            error_view(
                "Not Found",
                "404",
                "Something's missing.",
                "Sorry, we can't find that page. Head back to the dashboard to find your way.",
            )
            .into_string(),
        )
    }
}

impl IntoResponse for NotFoundError {
    fn into_response(self) -> Response {
        (StatusCode::NOT_FOUND, self.into_html()).into_response()
    }
}

/// Display the 404 Not Found page. Used as the router's fallback handler.
pub async fn get_404_not_found() -> Response {
    NotFoundError.into_response()
}
