//! Time-series bucketing and window totals for sales.

use std::collections::{HashMap, HashSet};
use std::ops::RangeInclusive;

use serde::Serialize;
use time::Date;

use crate::{
    analytics::{dedup::BucketDeduplicator, normalize::related_name},
    period::{Period, PeriodWindow, label_of},
    sale::{SaleRow, SaleStatus},
};

/// One point of the dashboard time-series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub label: String,
    pub count: usize,
    pub net_income: f64,
}

/// Distinct-sale totals for one date range.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WindowTotals {
    pub count: usize,
    pub net_income: f64,
    pub pending_count: usize,
}

/// Buckets sales into the given windows.
///
/// Each sale counts once per bucket regardless of how many joined rows it
/// arrived as, and its net amount (price minus discount) is summed only on
/// the first row seen. Cancelled sales never reach the series. A row is
/// classified with the same rule that produced the window labels, so it can
/// only ever land in its own window or, when its date lies outside the
/// displayed range, be dropped with a debug note.
///
/// # Returns
/// One point per window, in window order, zero-valued where no sale matched.
pub fn bucket_series(
    period: Period,
    windows: &[PeriodWindow],
    sales: &[SaleRow],
) -> Vec<SeriesPoint> {
    let mut totals: HashMap<&str, (usize, f64)> = windows
        .iter()
        .map(|window| (window.label.as_str(), (0, 0.0)))
        .collect();
    let mut deduplicator = BucketDeduplicator::new();

    for sale in sales {
        if sale.status == SaleStatus::Cancelled {
            continue;
        }

        let label = label_of(period, sale.start_date);
        let Some((count, net_income)) = totals.get_mut(label.as_str()) else {
            tracing::debug!(
                "sale {} dated {} falls outside the displayed {} windows",
                sale.id,
                sale.start_date,
                period.as_query_value()
            );
            continue;
        };

        if deduplicator.add(&label, sale.id) {
            *count += 1;
            *net_income += sale.net_amount();
        }
    }

    windows
        .iter()
        .map(|window| {
            let (count, net_income) = totals[window.label.as_str()];
            SeriesPoint {
                label: window.label.clone(),
                count,
                net_income,
            }
        })
        .collect()
}

/// Counts distinct non-cancelled sales dated within `dates` and sums their
/// net amounts, tallying Pending sales separately.
pub fn window_totals(dates: &RangeInclusive<Date>, sales: &[SaleRow]) -> WindowTotals {
    let mut totals = WindowTotals::default();
    let mut seen = HashSet::new();

    for sale in sales {
        if sale.status == SaleStatus::Cancelled || !dates.contains(&sale.start_date) {
            continue;
        }

        if seen.insert(sale.id) {
            totals.count += 1;
            totals.net_income += sale.net_amount();

            if sale.status == SaleStatus::Pending {
                totals.pending_count += 1;
            }
        }
    }

    totals
}

/// Counts distinct non-cancelled sales per payment method within `dates`.
/// Sales without a recorded method count under the fallback label.
pub fn payment_method_counts(
    dates: &RangeInclusive<Date>,
    sales: &[SaleRow],
) -> HashMap<String, u32> {
    let mut counts = HashMap::new();
    let mut seen = HashSet::new();

    for sale in sales {
        if sale.status == SaleStatus::Cancelled || !dates.contains(&sale.start_date) {
            continue;
        }

        if seen.insert(sale.id) {
            *counts
                .entry(related_name(sale.payment_method.as_deref()))
                .or_insert(0) += 1;
        }
    }

    counts
}

/// Counts distinct sales per production status within `dates`, in a fixed
/// status order. Cancelled sales are excluded like everywhere else on the
/// dashboard, so the breakdown covers Pending, In progress and Completed.
pub fn status_counts(dates: &RangeInclusive<Date>, sales: &[SaleRow]) -> Vec<(SaleStatus, u32)> {
    let mut pending = 0;
    let mut in_progress = 0;
    let mut completed = 0;
    let mut seen = HashSet::new();

    for sale in sales {
        if !dates.contains(&sale.start_date) {
            continue;
        }

        if seen.insert(sale.id) {
            match sale.status {
                SaleStatus::Pending => pending += 1,
                SaleStatus::InProgress => in_progress += 1,
                SaleStatus::Completed => completed += 1,
                SaleStatus::Cancelled => {}
            }
        }
    }

    vec![
        (SaleStatus::Pending, pending),
        (SaleStatus::InProgress, in_progress),
        (SaleStatus::Completed, completed),
    ]
}
