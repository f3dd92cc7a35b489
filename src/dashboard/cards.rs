//! Metric cards for the top of the dashboard.
//!
//! Provides card-based summaries showing:
//! - Sales in the current window with growth against the previous one
//! - Net income and pending orders
//! - The expense headline, stock alerts and production load

use maud::{Markup, html};

use crate::{
    dashboard::snapshot::DashboardSnapshot,
    html::{currency_rounded_with_tooltip, format_currency},
};

const CARD_STYLE: &str = "bg-white dark:bg-gray-800 border border-gray-200
                   dark:border-gray-700 rounded-lg p-4 shadow-md
                   hover:shadow-lg transition-shadow
                   flex flex-col justify-between";
const CARD_VALUE_STYLE: &str = "text-3xl font-bold mb-1";
const CARD_NOTE_STYLE: &str = "text-sm text-gray-600 dark:text-gray-400";

/// Formats a percentage value, avoiding "-0%" display.
fn format_percentage(value: f64) -> String {
    let rounded = value.round();
    if rounded.abs() < 0.5 {
        "0".to_string()
    } else {
        format!("{:.0}", rounded)
    }
}

/// Renders the grid of metric cards for a snapshot.
pub(super) fn metric_cards_view(snapshot: &DashboardSnapshot) -> Markup {
    html! {
        section class="w-full mx-auto mb-4" {
            div class="grid grid-cols-1 sm:grid-cols-2 md:grid-cols-3 lg:grid-cols-3 gap-4" {
                (sales_card(snapshot))
                (net_income_card(snapshot))
                (pending_card(snapshot))
                (expenses_card(snapshot))
                (inventory_card(snapshot))
                (production_card(snapshot))
            }
        }
    }
}

/// Renders the sale count with its growth against the previous window.
fn sales_card(snapshot: &DashboardSnapshot) -> Markup {
    let growth = snapshot.metrics.growth_percent;
    let (arrow, growth_style) = if growth > 0.0 {
        ("▲", "text-sm font-medium text-green-600 dark:text-green-400")
    } else if growth < 0.0 {
        ("▼", "text-sm font-medium text-red-600 dark:text-red-400")
    } else {
        ("→", "text-sm font-medium text-gray-600 dark:text-gray-400")
    };

    html! {
        div class=(CARD_STYLE) {
            div {
                h4 class="text-lg font-semibold mb-3" { "Sales" }
                div class=(CARD_VALUE_STYLE) { (snapshot.metrics.sale_count) }
                div class=(CARD_NOTE_STYLE) { (snapshot.metrics.window_label) }
            }
            div class="mt-3" {
                span class=(growth_style) {
                    (arrow) " " (format_percentage(growth)) "%"
                }
                span class=(CARD_NOTE_STYLE) {
                    " vs previous " (snapshot.period.label().to_lowercase())
                }
            }
        }
    }
}

/// Renders net income along with how the window's sales were paid.
fn net_income_card(snapshot: &DashboardSnapshot) -> Markup {
    let paid_with = snapshot
        .metrics
        .payment_histogram
        .iter()
        .map(|entry| format!("{} {}", entry.count, entry.method))
        .collect::<Vec<_>>()
        .join(", ");

    html! {
        div class=(CARD_STYLE) {
            div {
                h4 class="text-lg font-semibold mb-3" { "Net income" }
                div class=(CARD_VALUE_STYLE) { (format_currency(snapshot.metrics.net_income)) }
                div class=(CARD_NOTE_STYLE) { (snapshot.metrics.window_label) }
            }
            @if !paid_with.is_empty() {
                div class="mt-3" {
                    div class=(CARD_NOTE_STYLE) { "Paid with: " (paid_with) }
                }
            }
        }
    }
}

fn pending_card(snapshot: &DashboardSnapshot) -> Markup {
    html! {
        div class=(CARD_STYLE) {
            div {
                h4 class="text-lg font-semibold mb-3" { "Pending" }
                div class=(CARD_VALUE_STYLE) { (snapshot.metrics.pending_count) }
                div class=(CARD_NOTE_STYLE) { "Sales awaiting production" }
            }
        }
    }
}

/// Renders the operating spend for the current window.
///
/// Salaries stay out of this figure; the expense breakdown table below
/// carries the full total.
fn expenses_card(snapshot: &DashboardSnapshot) -> Markup {
    html! {
        div class=(CARD_STYLE) {
            div {
                h4 class="text-lg font-semibold mb-3" { "Expenses" }
                div class=(CARD_VALUE_STYLE) {
                    (currency_rounded_with_tooltip(snapshot.expenses.headline_total))
                }
                div class=(CARD_NOTE_STYLE) { "Materials and repairs, excluding salaries" }
            }
        }
    }
}

fn inventory_card(snapshot: &DashboardSnapshot) -> Markup {
    let inventory = &snapshot.inventory;

    html! {
        div class=(CARD_STYLE) {
            div {
                h4 class="text-lg font-semibold mb-3" { "Inventory" }
                div class="space-y-1" {
                    div class="text-sm font-medium text-red-600 dark:text-red-400" {
                        (inventory.out_of_stock) " out of stock"
                    }
                    div class="text-sm font-medium text-amber-600 dark:text-amber-400" {
                        (inventory.low_stock) " running low"
                    }
                    div class="text-sm font-medium text-green-600 dark:text-green-400" {
                        (inventory.in_stock) " in stock"
                    }
                }
            }
        }
    }
}

fn production_card(snapshot: &DashboardSnapshot) -> Markup {
    html! {
        div class=(CARD_STYLE) {
            div {
                h4 class="text-lg font-semibold mb-3" { "Production" }
                div class=(CARD_VALUE_STYLE) { (snapshot.production.active_orders) }
                div class=(CARD_NOTE_STYLE) { "Active orders" }
            }
            div class="mt-3" {
                @match snapshot.production.average_lead_time_days {
                    Some(days) => {
                        div class=(CARD_NOTE_STYLE) {
                            "Avg: " (format!("{days:.1}")) " days to delivery"
                        }
                    }
                    None => {
                        div class=(CARD_NOTE_STYLE) { "No completed deliveries yet" }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::format_percentage;

    #[test]
    fn formats_whole_percentages() {
        assert_eq!(format_percentage(100.0), "100");
        assert_eq!(format_percentage(-50.0), "-50");
    }

    #[test]
    fn rounds_to_whole_numbers() {
        assert_eq!(format_percentage(4.4), "4");
        assert_eq!(format_percentage(5.5), "6");
        assert_eq!(format_percentage(-5.5), "-6");
    }

    #[test]
    fn avoids_negative_zero() {
        assert_eq!(format_percentage(-0.2), "0");
        assert_eq!(format_percentage(0.0), "0");
        assert_eq!(format_percentage(0.4), "0");
    }
}
