//! The immutable result of one dashboard aggregation pass.
//!
//! A snapshot is built in a single pass over data fetched at one instant,
//! then shared read-only between the HTML views and the JSON endpoint.
//! Refreshing never mutates a published snapshot, it replaces it.

use serde::Serialize;
use time::Date;

use crate::{
    analytics::{RankingEntry, SeriesPoint},
    database_id::SaleId,
    expense::{CategoryTotal, ExpenseDetail},
    inventory::InventoryStatus,
    period::Period,
};

/// Everything the dashboard shows for one period granularity, captured
/// against a single reference date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    /// The granularity this snapshot was bucketed by.
    pub period: Period,
    /// The local date the aggregation pass ran against. Every window and
    /// relative calculation in the snapshot derives from this one date.
    pub generated_on: Date,
    /// Headline figures for the window containing `generated_on`.
    pub metrics: CurrentWindowMetrics,
    /// Sale counts and net income per displayed window, oldest first.
    pub series: Vec<SeriesPoint>,
    /// How sales split across payment methods, largest first.
    pub payment_methods: Vec<DistributionSlice>,
    /// How active sales split across production statuses.
    pub status_breakdown: Vec<DistributionSlice>,
    /// Stock level counts across all materials.
    pub inventory: InventoryStatus,
    /// Workload figures for the production floor.
    pub production: ProductionStatus,
    /// Most sold products among completed sales, largest first.
    pub best_sellers: Vec<RankingEntry>,
    /// Suppliers with the most received material orders, largest first.
    pub top_suppliers: Vec<RankingEntry>,
    /// The latest sales, newest first.
    pub recent_sales: Vec<RecentSale>,
    /// Spending summary for the window containing `generated_on`.
    pub expenses: ExpenseSummary,
}

/// Headline figures for the current window, with growth measured against
/// the window immediately before it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentWindowMetrics {
    /// Display label of the current window.
    pub window_label: String,
    /// Distinct non-cancelled sales started in the current window.
    pub sale_count: usize,
    /// Net income (price minus discount) over those sales.
    pub net_income: f64,
    /// Sale count change versus the previous window, in percent.
    pub growth_percent: f64,
    /// How many of the current window's sales are still pending.
    pub pending_count: usize,
    /// How the current window's sales were paid, largest first.
    pub payment_histogram: Vec<PaymentMethodCount>,
}

/// Count of current-window sales paid with one method.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentMethodCount {
    /// Payment method display name.
    pub method: String,
    /// Distinct sales paid this way.
    pub count: u32,
}

/// One slice of a categorical breakdown, such as a payment method or a
/// production status, with its display colour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionSlice {
    /// Display name of the slice.
    pub label: String,
    /// Distinct sales in the slice.
    pub count: u32,
    /// Hex colour the slice is drawn with.
    pub color: &'static str,
}

/// Workload figures for the production floor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductionStatus {
    /// Sales currently pending or in progress.
    pub active_orders: usize,
    /// Products with the most units in active or completed sales.
    pub top_products: Vec<RankingEntry>,
    /// Mean days from start to delivery over completed sales, or `None`
    /// when no completed sale has both dates recorded.
    pub average_lead_time_days: Option<f64>,
}

/// One row of the recent sales table.
///
/// This is flattened from the sale and its joined names so views and the
/// JSON endpoint need no further lookups.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentSale {
    /// ID of the sale.
    pub id: SaleId,
    /// Client display name, or the fallback label when the client is gone.
    pub client_name: String,
    /// Product display name, or the fallback label.
    pub product_name: String,
    /// Total units across the sale's items.
    pub quantity: u32,
    /// Price minus discount.
    pub net_amount: f64,
    /// Display label of the sale's status.
    pub status: String,
    /// Hex colour for the status badge.
    pub status_color: &'static str,
    /// Payment method display name, or the fallback label.
    pub payment_method: String,
    /// The date the sale was started.
    pub date: Date,
}

/// Spending summary for the current window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseSummary {
    /// Operating spend, excluding salaries.
    pub headline_total: f64,
    /// Full spend including salaries.
    pub breakdown_total: f64,
    /// Per-category totals, in fixed category order.
    pub categories: Vec<CategoryTotal>,
    /// Individual expense lines, largest first.
    pub details: Vec<ExpenseDetail>,
}

/// Display colour for a payment method label.
///
/// Unrecognised labels, including the fallback for sales without a
/// recorded method, share a neutral grey.
pub fn payment_method_color(method: &str) -> &'static str {
    match method {
        "Cash" => "#10B981",
        "Credit card" => "#3B82F6",
        "Debit card" => "#8B5CF6",
        "Transfer" => "#F59E0B",
        "Credit" => "#EF4444",
        _ => "#6B7280",
    }
}
