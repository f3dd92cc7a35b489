//! Top-N rankings over counted names.

use std::collections::HashMap;

use serde::Serialize;

use crate::analytics::normalize::related_name;
use crate::sale::SaleRow;

/// One ranked name with its count. Recomputed on every refresh, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankingEntry {
    pub name: String,
    pub count: u32,
}

/// The `n` largest counts, largest first.
///
/// Ties break by name ascending so rankings are stable across refreshes
/// instead of following map iteration order.
pub fn top_n(counts: HashMap<String, u32>, n: usize) -> Vec<RankingEntry> {
    let mut entries: Vec<RankingEntry> = counts
        .into_iter()
        .map(|(name, count)| RankingEntry { name, count })
        .collect();

    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    entries.truncate(n);
    entries
}

/// Sums item quantities per product name over the given rows.
///
/// Item rows are distinct contributions, so no deduplication applies here;
/// callers choose the status and date scope before counting.
pub fn quantity_by_product<'a, I>(rows: I) -> HashMap<String, u32>
where
    I: IntoIterator<Item = &'a SaleRow>,
{
    let mut counts = HashMap::new();

    for row in rows {
        *counts
            .entry(related_name(row.product_name.as_deref()))
            .or_insert(0) += row.quantity;
    }

    counts
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use time::macros::date;

    use crate::sale::{SaleRow, SaleStatus};

    use super::{RankingEntry, quantity_by_product, top_n};

    fn counts(pairs: &[(&str, u32)]) -> HashMap<String, u32> {
        pairs
            .iter()
            .map(|(name, count)| (name.to_string(), *count))
            .collect()
    }

    #[test]
    fn highest_counts_come_first() {
        let result = top_n(counts(&[("Boots", 3), ("Sandals", 9), ("Belts", 5)]), 3);

        assert_eq!(
            result,
            vec![
                RankingEntry {
                    name: "Sandals".to_owned(),
                    count: 9
                },
                RankingEntry {
                    name: "Belts".to_owned(),
                    count: 5
                },
                RankingEntry {
                    name: "Boots".to_owned(),
                    count: 3
                },
            ]
        );
    }

    #[test]
    fn ties_break_by_name_ascending() {
        let result = top_n(counts(&[("B", 5), ("C", 3), ("A", 5)]), 2);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].name, "A");
        assert_eq!(result[1].name, "B");
    }

    #[test]
    fn result_is_truncated_to_n() {
        let result = top_n(counts(&[("A", 1), ("B", 2), ("C", 3), ("D", 4)]), 2);

        assert_eq!(result.len(), 2);
    }

    #[test]
    fn fewer_entries_than_n_returns_them_all() {
        let result = top_n(counts(&[("A", 1)]), 5);

        assert_eq!(result.len(), 1);
    }

    #[test]
    fn empty_counts_rank_to_nothing() {
        assert!(top_n(HashMap::new(), 3).is_empty());
    }

    fn item_row(id: i64, product: Option<&str>, quantity: u32) -> SaleRow {
        SaleRow {
            id,
            client_name: Some("Ana Torres".to_owned()),
            product_name: product.map(str::to_owned),
            quantity,
            price: 100.0,
            discount: 0.0,
            status: SaleStatus::Completed,
            payment_method: None,
            start_date: date!(2024 - 03 - 05),
            delivery_date: None,
        }
    }

    #[test]
    fn quantities_sum_per_product() {
        let rows = vec![
            item_row(1, Some("Boots"), 2),
            item_row(1, Some("Boots"), 1),
            item_row(2, Some("Sandals"), 4),
        ];

        let result = quantity_by_product(&rows);

        assert_eq!(result["Boots"], 3);
        assert_eq!(result["Sandals"], 4);
    }

    #[test]
    fn unnamed_products_count_under_the_fallback_label() {
        let rows = vec![item_row(1, None, 2), item_row(2, None, 1)];

        let result = quantity_by_product(&rows);

        assert_eq!(result["Unknown"], 3);
    }
}
