use maud::{DOCTYPE, Markup, PreEscaped, html};

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

use crate::endpoints;

// Form styles
pub const FORM_LABEL_STYLE: &str = "block mb-2 text-sm font-medium text-gray-900 dark:text-white";
pub const FORM_SELECT_STYLE: &str = "block w-full p-2.5 rounded text-sm \
    text-gray-900 dark:text-white bg-gray-50 \
    dark:bg-gray-700 border border-gray-300 dark:border-gray-600 \
    focus:ring-blue-600 focus:border-blue-600 \
    focus:dark:border-blue-500 focus:dark:ring-blue-500";

// Table styles
pub const TABLE_HEADER_STYLE: &str = "text-xs text-gray-700 uppercase \
    bg-gray-50 dark:bg-gray-700 dark:text-gray-400";

pub const TABLE_ROW_STYLE: &str = "bg-white border-b dark:bg-gray-800 dark:border-gray-700";

pub const TABLE_CELL_STYLE: &str = "px-6 py-4";

// Badge style for statuses and categories. The background colour is set with
// an inline style so the palette hex codes pass through unchanged.
pub const BADGE_STYLE: &str = "inline-flex items-center px-2.5 py-0.5 \
    text-xs font-semibold text-white rounded-full";

// Page container
pub const PAGE_CONTAINER_STYLE: &str =
    "flex flex-col items-center px-6 py-8 mx-auto lg:py-5 text-gray-900 dark:text-white";

pub enum HeadElement {
    /// The file path or URL to a JavaScript script.
    ScriptLink(String),
    /// JavaScript source code.
    ScriptSource(PreEscaped<String>),
    #[allow(dead_code)]
    /// CSS source code.
    Style(PreEscaped<String>),
}

pub fn base(title: &str, head_elements: &[HeadElement], content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Atelier" }
                link href="/static/main.css" rel="stylesheet";

                script src="https://unpkg.com/htmx.org@2.0.8/dist/htmx.min.js" integrity="sha384-/TgkGk7p307TH7EXJDuUlgG3Ce1UVolAOFopFekQkkXihi5u/6OCvVKyz1W+idaz" crossorigin="anonymous" {}
                script src="https://unpkg.com/htmx-ext-response-targets@2.0.4/response-targets.js" integrity="sha384-T41oglUPvXLGBVyRdZsVRxNWnOOqCynaPubjUVjxhsjFTKrFJGEMm3/0KGmNQ+Pg" crossorigin="anonymous" {}

                style
                {
                    r#"
                    /* Chart tooltips must not cover the fixed alert container. */
                    .echarts-tooltip {
                        z-index: 30 !important;
                    }
                    "#
                }

                @for element in head_elements
                {
                    @match element
                    {
                        HeadElement::ScriptLink(path) => script src=(path) {}
                        HeadElement::ScriptSource(text) => script { (text) }
                        HeadElement::Style(text) => style { (text) }
                    }
                }
            }

            body
                hx-ext="response-targets"
                class="min-h-screen bg-gray-50 dark:bg-gray-900"
            {
                (content)

                // Failed htmx swaps render their alert into this container,
                // which the alert itself unhides.
                div
                    id="alert-container"
                    class="hidden w-full max-w-md px-4"
                    style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
                {}
            }
        }
    }
}

pub fn error_view(title: &str, status: &str, description: &str, fix: &str) -> Markup {
    // Layout based on https://flowbite.com/blocks/marketing/404/
    let content = html!(
        section class="py-16 px-4 mx-auto max-w-screen-sm text-center
            text-gray-900 dark:text-white"
        {
            h1
                class="mb-4 text-7xl lg:text-9xl font-extrabold tracking-tight
                    text-blue-600 dark:text-blue-500"
            {
                (status)
            }

            p class="mb-4 text-3xl md:text-4xl font-bold tracking-tight" { (description) }

            p class="mb-6 text-lg md:text-xl text-gray-600 dark:text-gray-400" { (fix) }

            a
                href=(endpoints::ROOT)
                class="inline-flex text-white bg-blue-600 hover:bg-blue-800
                    focus:ring-4 focus:outline-hidden focus:ring-blue-300
                    font-medium rounded text-sm px-5 py-2.5 text-center
                    dark:focus:ring-blue-900"
            {
                "Back to the dashboard"
            }
        }
    );

    base(title, &[], &content)
}

fn euro_formatter(prefix: &str, precision: Precision) -> Formatter {
    Formatter::currency(prefix).unwrap().precision(precision)
}

/// Formats an amount as euros with cents, e.g. "€12.30".
pub fn format_currency(amount: f64) -> String {
    static EURO: OnceLock<Formatter> = OnceLock::new();
    static EURO_NEGATIVE: OnceLock<Formatter> = OnceLock::new();

    if amount == 0.0 {
        // numfmt renders zero as a bare "0".
        return "€0.00".to_owned();
    }

    let formatter = if amount < 0.0 {
        EURO_NEGATIVE.get_or_init(|| euro_formatter("-€", Precision::Decimals(2)))
    } else {
        EURO.get_or_init(|| euro_formatter("€", Precision::Decimals(2)))
    };

    let mut formatted = formatter.fmt_string(amount.abs());

    // numfmt drops the final trailing zero, rendering 12.30 as "12.3".
    if formatted.as_bytes()[formatted.len() - 3] != b'.' {
        formatted.push('0');
    }

    formatted
}

/// Formats an amount as whole euros, e.g. "€12".
pub fn format_currency_rounded(amount: f64) -> String {
    static EURO: OnceLock<Formatter> = OnceLock::new();
    static EURO_NEGATIVE: OnceLock<Formatter> = OnceLock::new();

    let amount = amount.round();

    if amount == 0.0 {
        return "€0".to_owned();
    }

    let formatter = if amount < 0.0 {
        EURO_NEGATIVE.get_or_init(|| euro_formatter("-€", Precision::Decimals(0)))
    } else {
        EURO.get_or_init(|| euro_formatter("€", Precision::Decimals(0)))
    };

    formatter.fmt_string(amount.abs())
}

/// Creates a span with `amount` rounded to the nearest whole number and a
/// tooltip (title) that shows `amount` rounded to two decimal places.
pub fn currency_rounded_with_tooltip(amount: f64) -> Markup {
    html!(
        span title=(format_currency(amount)) { (format_currency_rounded(amount)) }
    )
}

#[cfg(test)]
mod tests {
    use super::{error_view, format_currency, format_currency_rounded};

    #[test]
    fn currency_keeps_two_decimal_places() {
        assert_eq!(format_currency(12.3), "€12.30");
        assert_eq!(format_currency(7.25), "€7.25");
    }

    #[test]
    fn currency_handles_zero_and_negatives() {
        assert_eq!(format_currency(0.0), "€0.00");
        assert_eq!(format_currency(-5.0), "-€5.00");
    }

    #[test]
    fn rounded_currency_drops_the_cents() {
        assert_eq!(format_currency_rounded(19.6), "€20");
        assert_eq!(format_currency_rounded(0.0), "€0");
        assert_eq!(format_currency_rounded(-2.5), "-€3");
    }

    #[test]
    fn error_page_shows_the_status_code() {
        let page = error_view("Not Found", "404", "Nothing here.", "Go back").into_string();

        assert!(page.contains("404"));
        assert!(page.contains("Nothing here."));
    }
}
