//! Builds a dashboard snapshot from one pass worth of records.
//!
//! This is a pure function of the fetched records and the reference date.
//! Every call constructs fresh accumulators, so two refreshes can never
//! bleed figures into each other, and the caller fetches everything before
//! aggregation starts so a snapshot never mixes rows from two points in
//! time.

use std::collections::{HashMap, HashSet};
use std::ops::RangeInclusive;

use time::Date;

use crate::{
    analytics::{
        bucket_series, first_rows_by_id, growth_percent, payment_method_counts,
        quantity_by_product, related_name, status_counts, top_n, window_totals,
    },
    dashboard::snapshot::{
        CurrentWindowMetrics, DashboardSnapshot, DistributionSlice, ExpenseSummary,
        PaymentMethodCount, ProductionStatus, RecentSale, payment_method_color,
    },
    database_id::SaleId,
    expense::{
        ExpenseSort, MaterialOrderRow, OrderStatus, RepairReportRow, Worker, breakdown_total,
        category_totals, classify_expenses, filter_by_period, headline_total, sort_details,
    },
    inventory::{Material, count_stock_levels},
    period::{Period, PeriodWindow, current_window, previous_window, window_sequence},
    sale::{SaleRow, SaleStatus},
};

/// How many sales the recent activity list shows.
const RECENT_SALES_COUNT: usize = 5;
/// How many products the production ranking shows.
const TOP_PRODUCT_COUNT: usize = 3;
/// How many products the best sellers ranking shows.
const BEST_SELLER_COUNT: usize = 5;
/// How many suppliers the supplier ranking shows.
const TOP_SUPPLIER_COUNT: usize = 2;

/// Aggregates fetched records into a dashboard snapshot.
///
/// `today` anchors every window: the displayed sequence ends with the
/// window containing it, and growth compares that window against the one
/// before it. Rows dated outside the displayed windows stay out of every
/// window-scoped figure, but the active order count and the recent sales
/// list consider every row they were given regardless of age.
pub fn build_snapshot(
    period: Period,
    today: Date,
    sales: &[SaleRow],
    materials: &[Material],
    orders: &[MaterialOrderRow],
    workers: &[Worker],
    repairs: &[RepairReportRow],
) -> DashboardSnapshot {
    let windows = window_sequence(period, today, period.window_count());
    let first_day = windows.first().map_or(today, |window| window.start);
    let last_day = windows.last().map_or(today, |window| window.end);
    let displayed = first_day..=last_day;

    let current = current_window(period, today);
    let previous = previous_window(period, today);
    let current_totals = window_totals(&(current.start..=current.end), sales);
    let previous_totals = window_totals(&(previous.start..=previous.end), sales);

    let mut payment_histogram: Vec<PaymentMethodCount> =
        payment_method_counts(&(current.start..=current.end), sales)
            .into_iter()
            .map(|(method, count)| PaymentMethodCount { method, count })
            .collect();
    payment_histogram.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.method.cmp(&b.method)));

    let metrics = CurrentWindowMetrics {
        window_label: current.label.clone(),
        sale_count: current_totals.count,
        net_income: current_totals.net_income,
        growth_percent: growth_percent(current_totals.count, previous_totals.count),
        pending_count: current_totals.pending_count,
        payment_histogram,
    };

    let mut payment_methods: Vec<DistributionSlice> = payment_method_counts(&displayed, sales)
        .into_iter()
        .map(|(label, count)| DistributionSlice {
            color: payment_method_color(&label),
            label,
            count,
        })
        .collect();
    payment_methods.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));

    let status_breakdown = status_counts(&displayed, sales)
        .into_iter()
        .map(|(status, count)| DistributionSlice {
            label: status.as_str().to_owned(),
            count,
            color: status.color(),
        })
        .collect();

    let production = ProductionStatus {
        active_orders: count_active_orders(sales),
        top_products: top_n(
            quantity_by_product(sales.iter().filter(|sale| {
                displayed.contains(&sale.start_date)
                    && matches!(sale.status, SaleStatus::InProgress | SaleStatus::Completed)
            })),
            TOP_PRODUCT_COUNT,
        ),
        average_lead_time_days: average_lead_time(&displayed, sales),
    };

    let best_sellers = top_n(
        quantity_by_product(sales.iter().filter(|sale| {
            displayed.contains(&sale.start_date) && sale.status == SaleStatus::Completed
        })),
        BEST_SELLER_COUNT,
    );

    DashboardSnapshot {
        period,
        generated_on: today,
        metrics,
        series: bucket_series(period, &windows, sales),
        payment_methods,
        status_breakdown,
        inventory: count_stock_levels(materials),
        production,
        best_sellers,
        top_suppliers: top_n(
            received_orders_by_supplier(&displayed, orders),
            TOP_SUPPLIER_COUNT,
        ),
        recent_sales: recent_sales(sales),
        expenses: expense_summary(&current, orders, workers, repairs, today),
    }
}

/// Counts distinct sales that are still moving through production,
/// however old they are.
fn count_active_orders(sales: &[SaleRow]) -> usize {
    let mut seen = HashSet::new();

    sales
        .iter()
        .filter(|sale| {
            matches!(sale.status, SaleStatus::Pending | SaleStatus::InProgress)
                && seen.insert(sale.id)
        })
        .count()
}

/// Mean days from start to delivery over distinct completed sales.
///
/// Sales missing a delivery date stay out of the average, as does the odd
/// row where the recorded delivery predates the start. `None` when nothing
/// qualifies.
fn average_lead_time(dates: &RangeInclusive<Date>, sales: &[SaleRow]) -> Option<f64> {
    let mut seen = HashSet::new();
    let mut total_days = 0i64;
    let mut counted = 0u32;

    for sale in sales {
        if sale.status != SaleStatus::Completed || !dates.contains(&sale.start_date) {
            continue;
        }

        let Some(delivery_date) = sale.delivery_date else {
            continue;
        };

        if !seen.insert(sale.id) {
            continue;
        }

        let days = (delivery_date - sale.start_date).whole_days();
        if days < 0 {
            continue;
        }

        total_days += days;
        counted += 1;
    }

    if counted == 0 {
        None
    } else {
        Some(total_days as f64 / f64::from(counted))
    }
}

/// Counts received material orders per supplier.
fn received_orders_by_supplier(
    dates: &RangeInclusive<Date>,
    orders: &[MaterialOrderRow],
) -> HashMap<String, u32> {
    let mut counts = HashMap::new();

    for order in orders {
        if order.status != OrderStatus::Received || !dates.contains(&order.order_date) {
            continue;
        }

        *counts
            .entry(related_name(order.supplier.as_deref()))
            .or_insert(0) += 1;
    }

    counts
}

/// Flattens the newest sales into display rows.
///
/// The fetch returns item rows newest first, so the first row seen for a
/// sale carries its display fields, while quantities sum across all of the
/// sale's rows. Cancelled sales stay visible here with their own badge,
/// unlike in the aggregated figures.
fn recent_sales(sales: &[SaleRow]) -> Vec<RecentSale> {
    let mut quantities: HashMap<SaleId, u32> = HashMap::new();
    for sale in sales {
        *quantities.entry(sale.id).or_insert(0) += sale.quantity;
    }

    first_rows_by_id(sales)
        .into_iter()
        .take(RECENT_SALES_COUNT)
        .map(|row| RecentSale {
            id: row.id,
            client_name: related_name(row.client_name.as_deref()),
            product_name: related_name(row.product_name.as_deref()),
            quantity: quantities.get(&row.id).copied().unwrap_or(row.quantity),
            net_amount: row.net_amount(),
            status: row.status.as_str().to_owned(),
            status_color: row.status.color(),
            payment_method: related_name(row.payment_method.as_deref()),
            date: row.start_date,
        })
        .collect()
}

/// Summarises spending for the window containing the reference date.
fn expense_summary(
    window: &PeriodWindow,
    orders: &[MaterialOrderRow],
    workers: &[Worker],
    repairs: &[RepairReportRow],
    today: Date,
) -> ExpenseSummary {
    let mut details = filter_by_period(classify_expenses(orders, workers, repairs, today), window);
    sort_details(&mut details, ExpenseSort::Amount);

    ExpenseSummary {
        headline_total: headline_total(&details),
        breakdown_total: breakdown_total(&details),
        categories: category_totals(&details),
        details,
    }
}
