//! The navigation bar shared by every page.

use maud::{Markup, html};

use crate::endpoints;

/// The pages reachable from the navigation bar, as (title, endpoint) pairs.
const NAV_PAGES: [(&str, &str); 2] = [
    ("Dashboard", endpoints::DASHBOARD_VIEW),
    ("Expenses", endpoints::EXPENSES_VIEW),
];

const LINK_STYLE: &str = "rounded-md px-3 py-2 text-sm font-medium text-gray-700
    hover:bg-gray-100 hover:text-blue-700 dark:text-gray-200
    dark:hover:bg-gray-800 dark:hover:text-blue-300";
const ACTIVE_LINK_STYLE: &str = "rounded-md px-3 py-2 text-sm font-medium
    bg-blue-100 text-blue-700 dark:bg-blue-900/40 dark:text-blue-200";

/// Renders the top navigation bar, highlighting the link whose endpoint
/// matches `active_endpoint`.
pub fn nav_bar(active_endpoint: &str) -> Markup {
    html! {
        nav class="bg-white border-b border-gray-200 dark:bg-gray-900 dark:border-gray-700" {
            div class="mx-auto flex max-w-screen-xl items-center justify-between p-4" {
                a
                    href="/"
                    class="text-2xl font-semibold whitespace-nowrap text-gray-900 dark:text-white"
                {
                    "Atelier"
                }

                div class="flex items-center gap-1 sm:gap-2" {
                    @for (title, url) in NAV_PAGES {
                        @let is_current = url == active_endpoint;
                        a
                            href=(url)
                            class=(if is_current { ACTIVE_LINK_STYLE } else { LINK_STYLE })
                            aria-current=[is_current.then_some("page")]
                        {
                            (title)
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use crate::endpoints;

    use super::nav_bar;

    fn render(active_endpoint: &str) -> Html {
        Html::parse_fragment(&nav_bar(active_endpoint).into_string())
    }

    #[test]
    fn shows_a_link_to_every_page() {
        let html = render(endpoints::DASHBOARD_VIEW);
        let links = Selector::parse("a").unwrap();

        let hrefs: Vec<&str> = html
            .select(&links)
            .filter_map(|a| a.value().attr("href"))
            .collect();

        assert!(hrefs.contains(&endpoints::DASHBOARD_VIEW));
        assert!(hrefs.contains(&endpoints::EXPENSES_VIEW));
    }

    #[test]
    fn highlights_only_the_current_page() {
        let html = render(endpoints::EXPENSES_VIEW);
        let current = Selector::parse(r#"a[aria-current="page"]"#).unwrap();

        let marked: Vec<&str> = html
            .select(&current)
            .filter_map(|a| a.value().attr("href"))
            .collect();

        assert_eq!(marked, vec![endpoints::EXPENSES_VIEW]);
    }

    #[test]
    fn highlights_nothing_on_unlinked_pages() {
        let html = render(endpoints::INTERNAL_ERROR_VIEW);
        let current = Selector::parse(r#"a[aria-current="page"]"#).unwrap();

        assert_eq!(html.select(&current).count(), 0);
    }
}
