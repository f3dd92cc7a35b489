//! The aggregation engine behind the dashboard.
//!
//! Turns raw sale rows into time-series, window totals, growth figures, and
//! rankings. Everything here is a pure function of the records and dates
//! passed in: one refresh pass constructs its own accumulators and shares
//! nothing with other passes.

mod dedup;
mod growth;
mod normalize;
mod ranking;
mod series;

pub use dedup::{BucketDeduplicator, first_rows_by_id};
pub use growth::growth_percent;
pub use normalize::{UNKNOWN_LABEL, related_name};
pub use ranking::{RankingEntry, quantity_by_product, top_n};
pub use series::{
    SeriesPoint, WindowTotals, bucket_series, payment_method_counts, status_counts, window_totals,
};
