//! Expense page HTTP handler and view rendering.
//!
//! This module contains:
//! - The route handler for the expenses page
//! - HTML view functions for the expense list and its filter controls
//! - State and query types used by the handler

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use axum_htmx::HxRequest;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Deserializer};
use std::sync::{Arc, Mutex};

use crate::{
    AppState, Error,
    endpoints,
    expense::{
        classify::{
            CategoryTotal, ExpenseCategory, ExpenseDetail, ExpenseSort, breakdown_total,
            category_totals, classify_expenses, filter_by_category, filter_by_period, sort_details,
        },
        sources::{fetch_material_orders, fetch_repair_reports, fetch_workers},
    },
    html::{
        BADGE_STYLE, FORM_LABEL_STYLE, FORM_SELECT_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency,
    },
    navigation::nav_bar,
    period::{Period, PeriodWindow, current_window},
    timezone::current_local_date,
};

/// The state needed for displaying the expenses page.
#[derive(Debug, Clone)]
pub struct ExpensesState {
    /// The database connection for reading spending records.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Europe/Madrid".
    pub local_timezone: String,
}

impl FromRef<AppState> for ExpensesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Query parameters for the expenses page filter and sort controls.
#[derive(Debug, PartialEq, Deserialize)]
pub struct ExpenseQuery {
    /// The period to show expenses for. Defaults to the current day.
    #[serde(default = "Period::default_preset")]
    pub period: Period,
    /// Show only this category, or all categories when absent.
    #[serde(default, deserialize_with = "deserialize_category")]
    pub category: Option<ExpenseCategory>,
    /// The order the expense list is shown in.
    #[serde(default)]
    pub sort: ExpenseSort,
}

/// The "All" option submits `category=`, which must read as no filter rather
/// than a parse error.
fn deserialize_category<'de, D>(deserializer: D) -> Result<Option<ExpenseCategory>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)?.as_deref() {
        None | Some("") => Ok(None),
        Some("material") => Ok(Some(ExpenseCategory::Material)),
        Some("salary") => Ok(Some(ExpenseCategory::Salary)),
        Some("repair") => Ok(Some(ExpenseCategory::Repair)),
        Some(other) => Err(serde::de::Error::unknown_variant(
            other,
            &["material", "salary", "repair"],
        )),
    }
}

/// Display the workshop's expenses for the current period.
///
/// Full requests get the whole page. htmx requests triggered by the filter
/// controls get just the list content.
pub async fn get_expenses_page(
    State(state): State<ExpensesState>,
    HxRequest(is_htmx_request): HxRequest,
    Query(query): Query<ExpenseQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let today = current_local_date(&state.local_timezone)?;
    let window = current_window(query.period, today);

    let orders = fetch_material_orders(window.start..=window.end, &connection)
        .inspect_err(|error| tracing::error!("could not get material orders: {error}"))?;
    let workers = fetch_workers(&connection)
        .inspect_err(|error| tracing::error!("could not get workers: {error}"))?;
    let repairs = fetch_repair_reports(window.start..=window.end, &connection)
        .inspect_err(|error| tracing::error!("could not get repair reports: {error}"))?;

    let details = filter_by_period(
        classify_expenses(&orders, &workers, &repairs, today),
        &window,
    );
    let totals = category_totals(&details);
    let total = breakdown_total(&details);

    let mut listed = filter_by_category(details, query.category);
    sort_details(&mut listed, query.sort);

    if is_htmx_request {
        Ok(expenses_content(&window, total, &totals, &listed).into_response())
    } else {
        Ok(expenses_view(&query, &window, total, &totals, &listed).into_response())
    }
}

/// Renders the full expenses page with the filter controls.
fn expenses_view(
    query: &ExpenseQuery,
    window: &PeriodWindow,
    total: f64,
    totals: &[CategoryTotal],
    details: &[ExpenseDetail],
) -> Markup {
    let content = html!(
        (nav_bar(endpoints::EXPENSES_VIEW))

        div class={(PAGE_CONTAINER_STYLE) " max-w-screen-xl w-full"}
        {
            h2 class="text-xl font-bold mb-4" { "Expenses" }

            form
                hx-get=(endpoints::EXPENSES_VIEW)
                hx-target="#expenses-content"
                hx-target-error="#alert-container"
                hx-swap="innerHTML"
                hx-trigger="change"
                class="grid grid-cols-1 sm:grid-cols-3 gap-4 w-full mb-6"
            {
                div
                {
                    label for="period" class=(FORM_LABEL_STYLE) { "Period" }
                    select name="period" id="period" class=(FORM_SELECT_STYLE)
                    {
                        @for period in [Period::Day, Period::Week, Period::Month] {
                            option
                                value=(period.as_query_value())
                                selected[query.period == period]
                            {
                                (period.label())
                            }
                        }
                    }
                }

                div
                {
                    label for="category" class=(FORM_LABEL_STYLE) { "Category" }
                    select name="category" id="category" class=(FORM_SELECT_STYLE)
                    {
                        option value="" selected[query.category.is_none()] { "All" }
                        @for category in [
                            ExpenseCategory::Material,
                            ExpenseCategory::Salary,
                            ExpenseCategory::Repair,
                        ] {
                            option
                                value=(category.as_str().to_lowercase())
                                selected[query.category == Some(category)]
                            {
                                (category.as_str())
                            }
                        }
                    }
                }

                div
                {
                    label for="sort" class=(FORM_LABEL_STYLE) { "Sort by" }
                    select name="sort" id="sort" class=(FORM_SELECT_STYLE)
                    {
                        option value="amount" selected[query.sort == ExpenseSort::Amount] { "Amount" }
                        option value="date" selected[query.sort == ExpenseSort::Date] { "Date" }
                    }
                }
            }

            div id="expenses-content" class="w-full"
            {
                (expenses_content(window, total, totals, details))
            }
        }
    );

    base("Expenses", &[], &content)
}

/// Renders the expense totals and detail list for the given window.
///
/// This is the part swapped in place when the filter controls change.
fn expenses_content(
    window: &PeriodWindow,
    total: f64,
    totals: &[CategoryTotal],
    details: &[ExpenseDetail],
) -> Markup {
    html!(
        div class="flex flex-wrap items-baseline gap-x-6 gap-y-2 mb-4"
        {
            p class="text-2xl font-bold" { (format_currency(total)) }

            p class="text-sm text-gray-600 dark:text-gray-400" { "Period: " (window.label) }
        }

        div class="flex flex-wrap gap-2 mb-6"
        {
            @for category_total in totals {
                span
                    class=(BADGE_STYLE)
                    style={"background-color: " (category_total.color)}
                {
                    (category_total.category.as_str())
                    " · "
                    (format_currency(category_total.total))
                    " (" (category_total.count) ")"
                }
            }
        }

        (expense_table(details))
    )
}

fn expense_table(details: &[ExpenseDetail]) -> Markup {
    html!(
        div class="relative overflow-x-auto shadow-md sm:rounded-lg w-full"
        {
            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Responsible" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Reference" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                    }
                }

                tbody
                {
                    @if details.is_empty() {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) colspan="6"
                            {
                                "No expenses recorded for this period."
                            }
                        }
                    }

                    @for detail in details {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE)
                            {
                                span
                                    class=(BADGE_STYLE)
                                    style={"background-color: " (detail.category.color())}
                                {
                                    (detail.category.as_str())
                                }
                            }
                            td class=(TABLE_CELL_STYLE) { (detail.name) }
                            td class=(TABLE_CELL_STYLE) { (detail.responsible) }
                            td class=(TABLE_CELL_STYLE) { (detail.reference) }
                            td class=(TABLE_CELL_STYLE) { (format_currency(detail.amount)) }
                            td class=(TABLE_CELL_STYLE) { (detail.date) }
                        }
                    }
                }
            }
        }
    )
}
