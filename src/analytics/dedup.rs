//! Per-bucket record deduplication.

use std::collections::{HashMap, HashSet};

use crate::sale::SaleRow;

/// Tracks which sale identifiers have already been counted in which bucket
/// during one aggregation pass.
///
/// The sale query joins one row per sale item, so a single sale arrives
/// several times. Counting through this guard keeps each identifier to one
/// contribution per bucket while still allowing the same identifier to count
/// in a different bucket if its date maps there.
#[derive(Debug, Default)]
pub struct BucketDeduplicator {
    seen: HashMap<String, HashSet<i64>>,
}

impl BucketDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `id` against `bucket_label` and reports whether it was novel.
    ///
    /// Sums must only be accumulated when this returns `true`, otherwise the
    /// join fan-out inflates them.
    pub fn add(&mut self, bucket_label: &str, id: i64) -> bool {
        self.seen
            .entry(bucket_label.to_owned())
            .or_default()
            .insert(id)
    }
}

/// The first row for each distinct sale identifier, in input order.
///
/// Sale-level fields repeat identically on every joined row, so the first
/// row carries everything a per-sale view needs.
pub fn first_rows_by_id(sales: &[SaleRow]) -> Vec<&SaleRow> {
    let mut seen = HashSet::new();

    sales
        .iter()
        .filter(|sale| seen.insert(sale.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::sale::{SaleRow, SaleStatus};

    use super::{BucketDeduplicator, first_rows_by_id};

    #[test]
    fn first_addition_is_novel() {
        let mut deduplicator = BucketDeduplicator::new();

        assert!(deduplicator.add("05/03", 1));
    }

    #[test]
    fn repeated_addition_is_not_novel() {
        let mut deduplicator = BucketDeduplicator::new();
        deduplicator.add("05/03", 1);

        assert!(!deduplicator.add("05/03", 1));
    }

    #[test]
    fn buckets_track_identifiers_independently() {
        let mut deduplicator = BucketDeduplicator::new();

        assert!(deduplicator.add("05/03", 1));
        assert!(deduplicator.add("06/03", 1));
        assert!(!deduplicator.add("05/03", 1));
    }

    #[test]
    fn distinct_identifiers_are_all_novel() {
        let mut deduplicator = BucketDeduplicator::new();

        assert!(deduplicator.add("05/03", 1));
        assert!(deduplicator.add("05/03", 2));
        assert!(deduplicator.add("05/03", 3));
    }

    fn joined_row(id: i64, product: &str) -> SaleRow {
        SaleRow {
            id,
            client_name: Some("Ana Torres".to_owned()),
            product_name: Some(product.to_owned()),
            quantity: 1,
            price: 100.0,
            discount: 0.0,
            status: SaleStatus::Completed,
            payment_method: Some("Cash".to_owned()),
            start_date: date!(2024 - 03 - 05),
            delivery_date: None,
        }
    }

    #[test]
    fn first_rows_by_id_keeps_one_row_per_sale() {
        let rows = vec![
            joined_row(1, "Boots size 38"),
            joined_row(1, "Boots size 40"),
            joined_row(2, "Sandals size 37"),
        ];

        let distinct = first_rows_by_id(&rows);

        assert_eq!(distinct.len(), 2);
        assert_eq!(distinct[0].id, 1);
        assert_eq!(distinct[0].product_name.as_deref(), Some("Boots size 38"));
        assert_eq!(distinct[1].id, 2);
    }
}
