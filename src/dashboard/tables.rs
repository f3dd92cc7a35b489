//! Table and list views for dashboard data display.
//!
//! Provides the recent sales table, the categorical breakdown lists and
//! the expense breakdown table.

use maud::{Markup, html};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    analytics::RankingEntry,
    dashboard::snapshot::{DistributionSlice, ExpenseSummary, RecentSale},
    html::{BADGE_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency},
};

/// The max number of graphemes to display for client and product names
/// before truncating and displaying ellipses.
const MAX_NAME_GRAPHEMES: usize = 24;

fn format_name(name: &str) -> (String, Option<&str>) {
    let name_length = name.graphemes(true).count();

    if name_length <= MAX_NAME_GRAPHEMES {
        (name.to_owned(), None)
    } else {
        let truncated: String = name.graphemes(true).take(MAX_NAME_GRAPHEMES - 3).collect();
        let truncated = truncated + "...";
        (truncated, Some(name))
    }
}

/// Renders the table of the newest sales.
///
/// Shows a prompt row when no sales exist yet instead of an empty table.
pub(super) fn recent_sales_table(recent_sales: &[RecentSale]) -> Markup {
    html! {
        div {
            h3 class="text-xl font-semibold mb-4" { "Recent sales" }

            div class="overflow-x-auto rounded-lg shadow" {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400" {
                    thead class=(TABLE_HEADER_STYLE) {
                        tr {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Client" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Product" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Qty" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Payment" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        }
                    }
                    tbody {
                        @if recent_sales.is_empty() {
                            tr class=(TABLE_ROW_STYLE) {
                                td class=(TABLE_CELL_STYLE) colspan="7" {
                                    "No sales recorded for this period."
                                }
                            }
                        }
                        @for sale in recent_sales {
                            (recent_sale_row(sale))
                        }
                    }
                }
            }
        }
    }
}

fn recent_sale_row(sale: &RecentSale) -> Markup {
    let (client_name, full_client_name) = format_name(&sale.client_name);
    let (product_name, full_product_name) = format_name(&sale.product_name);

    html! {
        tr class=(TABLE_ROW_STYLE) {
            th
                scope="row"
                class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                title=[full_client_name]
            {
                (client_name)
            }
            td class=(TABLE_CELL_STYLE) title=[full_product_name] { (product_name) }
            td class=(TABLE_CELL_STYLE) { (sale.quantity) }
            td class=(TABLE_CELL_STYLE) { (format_currency(sale.net_amount)) }
            td class=(TABLE_CELL_STYLE) {
                span
                    class=(BADGE_STYLE)
                    style=(format!("background-color: {}", sale.status_color))
                {
                    (sale.status)
                }
            }
            td class=(TABLE_CELL_STYLE) { (sale.payment_method) }
            td class=(TABLE_CELL_STYLE) { (sale.date) }
        }
    }
}

/// Renders a categorical breakdown as a dotted list, largest slice first.
pub(super) fn distribution_list(title: &str, slices: &[DistributionSlice]) -> Markup {
    html! {
        div class="bg-white dark:bg-gray-800 rounded-lg shadow p-4" {
            h3 class="text-xl font-semibold mb-4" { (title) }

            @if slices.is_empty() {
                p class="text-sm text-gray-600 dark:text-gray-400" {
                    "Nothing recorded for this period."
                }
            }
            ul class="space-y-2" {
                @for slice in slices {
                    li class="flex items-center justify-between text-sm" {
                        span class="flex items-center" {
                            span
                                class="w-2.5 h-2.5 rounded-full mr-2"
                                style=(format!("background-color: {}", slice.color))
                            {}
                            (slice.label)
                        }
                        span class="font-semibold" { (slice.count) }
                    }
                }
            }
        }
    }
}

/// Renders a top-N ranking as an ordered list.
pub(super) fn ranking_list(title: &str, unit: &str, entries: &[RankingEntry]) -> Markup {
    html! {
        div class="bg-white dark:bg-gray-800 rounded-lg shadow p-4" {
            h3 class="text-xl font-semibold mb-4" { (title) }

            @if entries.is_empty() {
                p class="text-sm text-gray-600 dark:text-gray-400" { "Nothing to rank yet." }
            }
            ol class="space-y-2 list-decimal list-inside" {
                @for entry in entries {
                    @let (name, full_name) = format_name(&entry.name);
                    li class="text-sm" title=[full_name] {
                        (name) " "
                        span class="text-gray-600 dark:text-gray-400" {
                            "(" (entry.count) " " (unit) ")"
                        }
                    }
                }
            }
        }
    }
}

/// Renders the per-category spending table for the current window.
///
/// Salaries are part of this table and its total, unlike the headline
/// expense card above it.
pub(super) fn expense_breakdown_table(expenses: &ExpenseSummary) -> Markup {
    html! {
        div {
            h3 class="text-xl font-semibold mb-4" { "Expense breakdown" }

            div class="overflow-x-auto rounded-lg shadow" {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400" {
                    thead class=(TABLE_HEADER_STYLE) {
                        tr {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Entries" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Spent" }
                        }
                    }
                    tbody {
                        @for total in &expenses.categories {
                            tr class=(TABLE_ROW_STYLE) {
                                td class=(TABLE_CELL_STYLE) {
                                    span
                                        class=(BADGE_STYLE)
                                        style=(format!("background-color: {}", total.color))
                                    {
                                        (total.category.as_str())
                                    }
                                }
                                td class=(TABLE_CELL_STYLE) { (total.count) }
                                td class=(TABLE_CELL_STYLE) { (format_currency(total.total)) }
                            }
                        }
                        tr class=(TABLE_ROW_STYLE) {
                            th
                                scope="row"
                                class="px-6 py-4 font-semibold text-gray-900 dark:text-white"
                            {
                                "Total"
                            }
                            td class=(TABLE_CELL_STYLE) {}
                            td class={(TABLE_CELL_STYLE) " font-semibold"} {
                                (format_currency(expenses.breakdown_total))
                            }
                        }
                    }
                }
            }
        }
    }
}
