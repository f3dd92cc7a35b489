//! Defines the endpoints (routes) for the server.

/// The root of the website.
///
/// Redirects to the dashboard page.
pub const ROOT: &str = "/";

/// The page that summarises sales, inventory, production and expenses for the workshop.
pub const DASHBOARD_VIEW: &str = "/dashboard";

/// The page that lists the workshop's expenses with filter and sort controls.
pub const EXPENSES_VIEW: &str = "/expenses";

/// The API endpoint that returns the latest dashboard snapshot as JSON.
pub const DASHBOARD_API: &str = "/api/dashboard";

/// The page displayed when an unrecoverable error has occurred.
pub const INTERNAL_ERROR_VIEW: &str = "/error";

/// The route for static files such as the CSS stylesheet.
pub const STATIC: &str = "/static";

#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::DASHBOARD_VIEW);
        assert_endpoint_is_valid_uri(endpoints::EXPENSES_VIEW);
        assert_endpoint_is_valid_uri(endpoints::DASHBOARD_API);
        assert_endpoint_is_valid_uri(endpoints::INTERNAL_ERROR_VIEW);
        assert_endpoint_is_valid_uri(endpoints::STATIC);
    }

    #[track_caller]
    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok(), "{uri} is not a valid URI");
    }
}
