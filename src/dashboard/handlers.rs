//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - The route handlers for the dashboard page and its JSON counterpart
//! - HTML view functions for rendering the dashboard UI
//! - State and query types used by the handlers

use axum::{
    Json,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use axum_htmx::HxRequest;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use std::sync::{Arc, Mutex};

use crate::{
    AppState, Error,
    dashboard::{
        cards::metric_cards_view,
        charts::{
            DashboardChart, best_sellers_chart, charts_inline_script, charts_script, charts_view,
            expenses_chart, income_chart, sales_chart,
        },
        refresh::{SnapshotPublisher, run_refresh},
        snapshot::DashboardSnapshot,
        tables::{distribution_list, expense_breakdown_table, ranking_list, recent_sales_table},
    },
    endpoints,
    html::{FORM_LABEL_STYLE, FORM_SELECT_STYLE, HeadElement, PAGE_CONTAINER_STYLE, base},
    navigation::nav_bar,
    period::Period,
};

/// CDN location of the ECharts build the dashboard charts run on.
const ECHARTS_SCRIPT_URL: &str = "https://cdn.jsdelivr.net/npm/echarts@5.6.0/dist/echarts.min.js";

/// The state needed for displaying the dashboard page.
///
/// Contains the database connection, timezone information and the shared
/// snapshot publisher required by dashboard handlers.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading workshop records.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Europe/Madrid".
    pub local_timezone: String,
    /// Decides which concurrent refresh pass owns the published snapshot.
    pub snapshot_publisher: Arc<SnapshotPublisher>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
            snapshot_publisher: state.snapshot_publisher.clone(),
        }
    }
}

/// Query parameters selecting the dashboard's period granularity.
#[derive(Debug, PartialEq, Deserialize)]
pub struct DashboardQuery {
    /// Which granularity to bucket the dashboard by.
    #[serde(default = "Period::default_preset")]
    pub period: Period,
}

/// Display a page with an overview of the workshop's activity.
///
/// Every request runs a full refresh pass. HTMX requests from the period
/// selector get the dashboard content alone; anything else gets the full
/// page. When a refresh fails mid-swap the error renders as an alert so the
/// stale content stays on screen.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    HxRequest(is_htmx_request): HxRequest,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let snapshot = match run_refresh(&state, query.period).await {
        Ok(snapshot) => snapshot,
        Err(error) if is_htmx_request => return Ok(error.into_alert_response()),
        Err(error) => return Err(error),
    };

    if is_htmx_request {
        Ok(dashboard_content_partial(&snapshot).into_response())
    } else {
        Ok(dashboard_view(&snapshot).into_response())
    }
}

/// Returns a freshly aggregated dashboard snapshot as JSON.
pub async fn get_dashboard_data(
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardSnapshot>, Error> {
    let snapshot = run_refresh(&state, query.period).await?;

    Ok(Json(snapshot.as_ref().clone()))
}

/// Creates the array of dashboard charts from a snapshot.
///
/// The chart options are serialized to JSON for ECharts consumption.
fn build_dashboard_charts(snapshot: &DashboardSnapshot) -> [DashboardChart; 4] {
    [
        DashboardChart {
            id: "sales-chart",
            options: sales_chart(snapshot.period, &snapshot.series).to_string(),
        },
        DashboardChart {
            id: "income-chart",
            options: income_chart(snapshot.period, &snapshot.series).to_string(),
        },
        DashboardChart {
            id: "best-sellers-chart",
            options: best_sellers_chart(&snapshot.best_sellers).to_string(),
        },
        DashboardChart {
            id: "expenses-chart",
            options: expenses_chart(
                &snapshot.expenses.categories,
                &snapshot.metrics.window_label,
            )
            .to_string(),
        },
    ]
}

/// Renders the period selector that drives partial dashboard updates.
fn period_selector(period: Period) -> Markup {
    html! {
        form
            hx-get=(endpoints::DASHBOARD_VIEW)
            hx-target="#dashboard-content"
            hx-target-error="#alert-container"
            hx-swap="innerHTML"
            hx-trigger="change"
        {
            label class=(FORM_LABEL_STYLE) for="period" { "Period" }
            select class=(FORM_SELECT_STYLE) id="period" name="period" {
                @for option in [Period::Day, Period::Week, Period::Month] {
                    option value=(option.as_query_value()) selected[option == period] {
                        (option.label())
                    }
                }
            }
        }
    }
}

/// Renders the main dashboard page with cards, charts and tables.
fn dashboard_view(snapshot: &DashboardSnapshot) -> Markup {
    let charts = build_dashboard_charts(snapshot);

    let content = html!(
        (nav_bar(endpoints::DASHBOARD_VIEW))

        div class=(PAGE_CONTAINER_STYLE) {
            div class="flex flex-wrap justify-between items-end gap-4 mb-4 w-full" {
                h2 class="text-xl font-bold" { "Dashboard" }
                (period_selector(snapshot.period))
            }

            div id="dashboard-content" class="w-full" {
                (dashboard_content(snapshot, &charts))
            }
        }
    );

    let scripts = [
        HeadElement::ScriptLink(ECHARTS_SCRIPT_URL.to_owned()),
        charts_script(&charts),
    ];

    base("Dashboard", &scripts, &content)
}

/// Renders the dashboard content for HTMX updates.
///
/// This is used when the period selector changes, to update the dashboard
/// without a full page reload. The chart initialisation script rides along
/// inside the fragment because no page load event will fire.
fn dashboard_content_partial(snapshot: &DashboardSnapshot) -> Markup {
    let charts = build_dashboard_charts(snapshot);

    html!(
        (dashboard_content(snapshot, &charts))
        (charts_inline_script(&charts))
    )
}

/// Renders everything below the period selector.
fn dashboard_content(snapshot: &DashboardSnapshot, charts: &[DashboardChart]) -> Markup {
    html!(
        (metric_cards_view(snapshot))

        (charts_view(charts))

        section class="w-full mx-auto mb-4" {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4" {
                (recent_sales_table(&snapshot.recent_sales))
                (expense_breakdown_table(&snapshot.expenses))
            }
        }

        section class="w-full mx-auto mb-8" {
            div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4" {
                (distribution_list("Status", &snapshot.status_breakdown))
                (distribution_list("Payment methods", &snapshot.payment_methods))
                (ranking_list("Top products", "units", &snapshot.production.top_products))
                (ranking_list("Top suppliers", "orders", &snapshot.top_suppliers))
            }
        }
    )
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json,
        extract::{Query, State},
        http::StatusCode,
    };
    use axum_htmx::HxRequest;
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use time::OffsetDateTime;

    use crate::{
        dashboard::refresh::SnapshotPublisher,
        db::initialize,
        expense::{
            MaterialOrder, OrderStatus, create_material_order, create_repair_report, create_tool,
            create_worker,
        },
        inventory::create_material,
        period::Period,
        sale::{Sale, SaleItem, SaleStatus, create_client, create_product, create_sale,
            create_sale_item},
        test_utils::{assert_valid_html, parse_html_document, parse_html_fragment},
    };

    use super::{DashboardQuery, DashboardState, get_dashboard_data, get_dashboard_page};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn get_test_state(conn: Connection) -> DashboardState {
        DashboardState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
            snapshot_publisher: Arc::new(SnapshotPublisher::new()),
        }
    }

    /// Seeds one completed and one pending sale plus an expense of each
    /// category, all dated today so they land in the current window for
    /// any period.
    fn seed_workshop_data(conn: &Connection) {
        let today = OffsetDateTime::now_utc().date();
        let client = create_client("Lucia Romero", conn).unwrap();
        let product = create_product("Linen shirt", conn).unwrap();

        let completed = create_sale(
            Sale::build(120.0, today)
                .client_id(Some(client.id))
                .status(SaleStatus::Completed)
                .payment_method("Cash"),
            conn,
        )
        .unwrap();
        create_sale_item(
            SaleItem::build(completed.id, 2).product_id(Some(product.id)),
            conn,
        )
        .unwrap();

        let pending = create_sale(Sale::build(80.0, today).client_id(Some(client.id)), conn).unwrap();
        create_sale_item(
            SaleItem::build(pending.id, 1).product_id(Some(product.id)),
            conn,
        )
        .unwrap();

        let material = create_material("Linen", 10, 3, conn).unwrap();
        create_material_order(
            MaterialOrder::build(5, today)
                .material_id(Some(material.id))
                .supplier("Textiles Ruiz")
                .unit_price(Some(3.0))
                .status(OrderStatus::Received),
            conn,
        )
        .unwrap();

        create_worker("Carmen Ortiz", "Seamstress", Some(1100.0), None, conn).unwrap();
        let tool = create_tool("Overlock machine", conn).unwrap();
        create_repair_report(Some(tool.id), "Jammed feed", "Ana", today, Some(40.0), conn)
            .unwrap();
    }

    #[track_caller]
    fn assert_chart_exists(html: &Html, chart_id: &str) {
        let selector = Selector::parse(&format!("#{}", chart_id)).unwrap();
        assert!(
            html.select(&selector).next().is_some(),
            "Chart with id '{}' not found",
            chart_id
        );
    }

    #[tokio::test]
    async fn dashboard_page_loads_successfully() {
        let conn = get_test_connection();
        seed_workshop_data(&conn);
        let state = get_test_state(conn);

        let response = get_dashboard_page(
            State(state),
            HxRequest(false),
            Query(DashboardQuery {
                period: Period::Month,
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        assert_chart_exists(&html, "sales-chart");
        assert_chart_exists(&html, "income-chart");
        assert_chart_exists(&html, "best-sellers-chart");
        assert_chart_exists(&html, "expenses-chart");

        let table_selector = Selector::parse("table").unwrap();
        assert!(html.select(&table_selector).count() >= 2);

        let select_selector = Selector::parse("select[name='period']").unwrap();
        assert_eq!(html.select(&select_selector).count(), 1);
    }

    #[tokio::test]
    async fn htmx_request_returns_content_without_the_page_shell() {
        let conn = get_test_connection();
        seed_workshop_data(&conn);
        let state = get_test_state(conn);

        let response = get_dashboard_page(
            State(state),
            HxRequest(true),
            Query(DashboardQuery {
                period: Period::Week,
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_fragment(response).await;

        let nav_selector = Selector::parse("nav").unwrap();
        assert_eq!(html.select(&nav_selector).count(), 0);

        assert_chart_exists(&html, "sales-chart");

        let script_selector = Selector::parse("script").unwrap();
        assert_eq!(html.select(&script_selector).count(), 1);
    }

    #[tokio::test]
    async fn empty_database_still_renders_a_zeroed_dashboard() {
        let state = get_test_state(get_test_connection());

        let response = get_dashboard_page(
            State(state),
            HxRequest(false),
            Query(DashboardQuery {
                period: Period::Day,
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        assert_chart_exists(&html, "sales-chart");

        let text: String = html.root_element().text().collect();
        assert!(text.contains("No sales recorded for this period."));
    }

    #[tokio::test]
    async fn json_endpoint_returns_the_snapshot() {
        let conn = get_test_connection();
        seed_workshop_data(&conn);
        let state = get_test_state(conn);

        let Json(snapshot) = get_dashboard_data(
            State(state.clone()),
            Query(DashboardQuery {
                period: Period::Week,
            }),
        )
        .await
        .unwrap();

        assert_eq!(snapshot.period, Period::Week);
        assert_eq!(snapshot.metrics.sale_count, 2);
        assert_eq!(snapshot.metrics.pending_count, 1);
        assert_eq!(snapshot.metrics.net_income, 200.0);
        assert_eq!(snapshot.metrics.growth_percent, 100.0);
        assert_eq!(snapshot.expenses.headline_total, 55.0);
        assert_eq!(snapshot.expenses.breakdown_total, 1155.0);

        assert!(state.snapshot_publisher.latest().is_some());
    }

    #[test]
    fn period_query_parses_and_defaults() {
        let query: DashboardQuery = serde_html_form::from_str("period=week").unwrap();
        assert_eq!(
            query,
            DashboardQuery {
                period: Period::Week
            }
        );

        let query: DashboardQuery = serde_html_form::from_str("").unwrap();
        assert_eq!(
            query,
            DashboardQuery {
                period: Period::Day
            }
        );
    }
}
