//! Defines the template and route handler for the 500 Internal Server Error page.
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// The content of the 500 Internal Server Error page.
pub struct InternalServerError {
    description: String,
    fix: String,
}

impl InternalServerError {
    /// A 500 page with a specific explanation and a suggested fix.
    pub fn new(description: &str, fix: &str) -> Self {
        Self {
            description: description.to_owned(),
            fix: fix.to_owned(),
        }
    }

    /// The catch-all 500 page for errors the user cannot act on themselves.
    pub fn generic() -> Self {
        Self::new(
            "Sorry, something went wrong.",
            "Try again later or check the server logs",
        )
    }

    /// Render the error page as HTML.
    pub fn into_html(self) -> Html<String> {
        Html(error_view("Internal Server Error", "500", &self.description, &self.fix).into_string())
    }
}

impl IntoResponse for InternalServerError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.into_html()).into_response()
    }
}

/// Display the generic 500 Internal Server Error page.
pub async fn get_internal_server_error_page() -> Response {
    InternalServerError::generic().into_response()
}

#[cfg(test)]
mod tests {
    use axum::response::Html;

    use super::InternalServerError;

    #[test]
    fn page_shows_the_description_and_fix() {
        let Html(page) =
            InternalServerError::new("The dashboard hit a snag.", "Try refreshing").into_html();

        assert!(page.contains("500"));
        assert!(page.contains("The dashboard hit a snag."));
        assert!(page.contains("Try refreshing"));
    }
}
