//! Classifies raw spending records into expense categories and derives the
//! totals, filters and sort orders the expense views are built from.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    analytics::{UNKNOWN_LABEL, related_name},
    database_id::DatabaseId,
    expense::sources::{MaterialOrderRow, OrderStatus, RepairReportRow, Worker},
    period::PeriodWindow,
};

/// Whether salaries count towards the headline expenses figure on the
/// dashboard. The headline tracks operating spend, which recurs with output,
/// while salaries recur with the calendar.
pub const HEADLINE_TOTAL_INCLUDES_SALARIES: bool = false;

/// Whether salaries count towards the total shown above the category
/// breakdown. The breakdown answers "where did all the money go", so it
/// covers everything.
pub const BREAKDOWN_TOTAL_INCLUDES_SALARIES: bool = true;

/// The kind of spending an expense detail represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    /// Money spent on received material orders.
    Material,
    /// Money spent on worker salaries.
    Salary,
    /// Money spent repairing tools.
    Repair,
}

impl ExpenseCategory {
    /// The label shown in the UI.
    pub fn as_str(self) -> &'static str {
        match self {
            ExpenseCategory::Material => "Material",
            ExpenseCategory::Salary => "Salary",
            ExpenseCategory::Repair => "Repair",
        }
    }

    /// The hex colour used for this category in charts and badges.
    pub fn color(self) -> &'static str {
        match self {
            ExpenseCategory::Material => "#3B82F6",
            ExpenseCategory::Salary => "#10B981",
            ExpenseCategory::Repair => "#EF4444",
        }
    }
}

/// A single classified expense, ready to list or total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseDetail {
    /// The ID of the source record the expense came from. Unique within a
    /// category, not across categories.
    pub id: DatabaseId,
    /// The kind of spending.
    pub category: ExpenseCategory,
    /// What the money was spent on: a material, a worker or a tool.
    pub name: String,
    /// How much was spent. Never negative.
    pub amount: f64,
    /// When the money was spent.
    pub date: Date,
    /// Who the spending sits with: the supplier, the worker's role, or
    /// whoever reported the fault.
    pub responsible: String,
    /// The paper trail behind the spend: the supplier's order number or the
    /// fault description. Salaries have none.
    pub reference: String,
}

/// The total and record count for one expense category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    /// The kind of spending.
    pub category: ExpenseCategory,
    /// The sum of amounts in this category.
    pub total: f64,
    /// How many expense details fell into this category.
    pub count: usize,
    /// The hex colour used for this category in charts and badges.
    pub color: &'static str,
}

/// The order the expense list is shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseSort {
    /// Largest amount first.
    #[default]
    Amount,
    /// Most recent date first.
    Date,
}

/// Turn raw spending records into a flat list of classified expenses.
///
/// The rules per category are:
/// - Material: one detail per received order, costing quantity times unit
///   price. Orders still pending are not expenses yet, and a received order
///   with no quoted price costs zero rather than being dropped.
/// - Salary: one detail per worker, dated `pass_date` since salaries are
///   owed now rather than on any recorded date. A worker with no agreed
///   salary still appears, at zero.
/// - Repair: one detail per repair report whose cost is known. Reports
///   without a cost are left out entirely instead of polluting the counts
///   with zero-amount rows.
///
/// Missing names, suppliers and references fall back to [UNKNOWN_LABEL].
/// Amounts are clamped at zero in case a source row carries a negative
/// price, salary or cost.
pub fn classify_expenses(
    orders: &[MaterialOrderRow],
    workers: &[Worker],
    repairs: &[RepairReportRow],
    pass_date: Date,
) -> Vec<ExpenseDetail> {
    let mut details = Vec::with_capacity(orders.len() + workers.len() + repairs.len());

    for order in orders {
        if order.status != OrderStatus::Received {
            continue;
        }

        details.push(ExpenseDetail {
            id: order.id,
            category: ExpenseCategory::Material,
            name: related_name(order.material_name.as_deref()),
            amount: (f64::from(order.quantity_requested) * order.unit_price.unwrap_or(0.0))
                .max(0.0),
            date: order.order_date,
            responsible: related_name(order.supplier.as_deref()),
            reference: related_name(order.reference.as_deref()),
        });
    }

    for worker in workers {
        details.push(ExpenseDetail {
            id: worker.id,
            category: ExpenseCategory::Salary,
            name: worker.name.clone(),
            amount: worker.salary.unwrap_or(0.0).max(0.0),
            date: pass_date,
            responsible: worker.role.clone(),
            reference: UNKNOWN_LABEL.to_owned(),
        });
    }

    for report in repairs {
        let Some(cost) = report.repair_cost else {
            continue;
        };

        details.push(ExpenseDetail {
            id: report.id,
            category: ExpenseCategory::Repair,
            name: related_name(report.tool_name.as_deref()),
            amount: cost.max(0.0),
            date: report.report_date,
            responsible: report.reporter.clone(),
            reference: report.description.clone(),
        });
    }

    details
}

/// The headline expenses figure shown on the dashboard.
pub fn headline_total(details: &[ExpenseDetail]) -> f64 {
    details
        .iter()
        .filter(|detail| {
            HEADLINE_TOTAL_INCLUDES_SALARIES || detail.category != ExpenseCategory::Salary
        })
        .map(|detail| detail.amount)
        .sum()
}

/// The total shown above the category breakdown.
pub fn breakdown_total(details: &[ExpenseDetail]) -> f64 {
    details
        .iter()
        .filter(|detail| {
            BREAKDOWN_TOTAL_INCLUDES_SALARIES || detail.category != ExpenseCategory::Salary
        })
        .map(|detail| detail.amount)
        .sum()
}

/// Total and count per category, always listing all three categories so the
/// breakdown keeps a stable shape when a category has no spending.
pub fn category_totals(details: &[ExpenseDetail]) -> Vec<CategoryTotal> {
    [
        ExpenseCategory::Material,
        ExpenseCategory::Salary,
        ExpenseCategory::Repair,
    ]
    .into_iter()
    .map(|category| {
        let mut total = 0.0;
        let mut count = 0;

        for detail in details {
            if detail.category == category {
                total += detail.amount;
                count += 1;
            }
        }

        CategoryTotal {
            category,
            total,
            count,
            color: category.color(),
        }
    })
    .collect()
}

/// Keep only the expense details dated within `window`.
pub fn filter_by_period(details: Vec<ExpenseDetail>, window: &PeriodWindow) -> Vec<ExpenseDetail> {
    details
        .into_iter()
        .filter(|detail| window.contains(detail.date))
        .collect()
}

/// Keep only the expense details in `category`, or all of them when no
/// category is given.
pub fn filter_by_category(
    details: Vec<ExpenseDetail>,
    category: Option<ExpenseCategory>,
) -> Vec<ExpenseDetail> {
    match category {
        Some(category) => details
            .into_iter()
            .filter(|detail| detail.category == category)
            .collect(),
        None => details,
    }
}

/// Sort expense details in place, largest or most recent first.
pub fn sort_details(details: &mut [ExpenseDetail], sort: ExpenseSort) {
    match sort {
        ExpenseSort::Amount => details.sort_by(|a, b| b.amount.total_cmp(&a.amount)),
        ExpenseSort::Date => details.sort_by(|a, b| b.date.cmp(&a.date)),
    }
}

#[cfg(test)]
mod classify_tests {
    use time::macros::date;

    use crate::expense::sources::{MaterialOrderRow, OrderStatus, RepairReportRow, Worker};

    use super::{
        ExpenseCategory, ExpenseDetail, ExpenseSort, breakdown_total, category_totals,
        classify_expenses, filter_by_category, filter_by_period, headline_total, sort_details,
    };

    fn order(
        material_name: Option<&str>,
        quantity: u32,
        unit_price: Option<f64>,
        status: OrderStatus,
    ) -> MaterialOrderRow {
        MaterialOrderRow {
            id: 1,
            material_name: material_name.map(str::to_owned),
            supplier: Some("Textiles Andinas".to_owned()),
            reference: Some("OC-2024-031".to_owned()),
            quantity_requested: quantity,
            unit_price,
            status,
            order_date: date!(2024 - 03 - 05),
        }
    }

    fn worker(name: &str, salary: Option<f64>) -> Worker {
        Worker {
            id: 1,
            name: name.to_owned(),
            role: "Seamstress".to_owned(),
            salary,
            hired_on: None,
        }
    }

    fn repair(cost: Option<f64>) -> RepairReportRow {
        RepairReportRow {
            id: 1,
            tool_name: Some("Overlock machine".to_owned()),
            description: "Thread tension drifting".to_owned(),
            reporter: "Nerea Vidal".to_owned(),
            report_date: date!(2024 - 03 - 10),
            repair_cost: cost,
        }
    }

    #[test]
    fn classification_and_totals_cover_every_rule() {
        let orders = vec![
            order(Some("Navy wool"), 20, Some(15.0), OrderStatus::Received),
            order(Some("White cotton"), 10, None, OrderStatus::Received),
            order(Some("Red thread"), 99, Some(100.0), OrderStatus::Pending),
        ];
        let workers = vec![
            worker("Nerea Vidal", Some(600.0)),
            worker("Pilar Soto", Some(400.0)),
            worker("New hire", None),
        ];
        let repairs = vec![repair(Some(50.0)), repair(None)];

        let details = classify_expenses(&orders, &workers, &repairs, date!(2024 - 03 - 15));

        let totals = category_totals(&details);
        assert_eq!(totals[0].category, ExpenseCategory::Material);
        assert_eq!(totals[0].total, 300.0);
        assert_eq!(totals[0].count, 2);
        assert_eq!(totals[1].category, ExpenseCategory::Salary);
        assert_eq!(totals[1].total, 1000.0);
        assert_eq!(totals[1].count, 3);
        assert_eq!(totals[2].category, ExpenseCategory::Repair);
        assert_eq!(totals[2].total, 50.0);
        assert_eq!(totals[2].count, 1);

        assert_eq!(headline_total(&details), 350.0);
        assert_eq!(breakdown_total(&details), 1350.0);
    }

    #[test]
    fn details_carry_responsible_party_and_reference() {
        let orders = vec![order(Some("Navy wool"), 20, Some(15.0), OrderStatus::Received)];
        let workers = vec![worker("Nerea Vidal", Some(600.0))];
        let repairs = vec![repair(Some(50.0))];

        let details = classify_expenses(&orders, &workers, &repairs, date!(2024 - 03 - 15));

        assert_eq!(details[0].responsible, "Textiles Andinas");
        assert_eq!(details[0].reference, "OC-2024-031");
        assert_eq!(details[1].responsible, "Seamstress");
        assert_eq!(details[1].reference, "Unknown");
        assert_eq!(details[2].responsible, "Nerea Vidal");
        assert_eq!(details[2].reference, "Thread tension drifting");
    }

    #[test]
    fn negative_source_amounts_clamp_to_zero() {
        let orders = vec![order(Some("Navy wool"), 20, Some(-15.0), OrderStatus::Received)];
        let workers = vec![worker("Nerea Vidal", Some(-600.0))];
        let repairs = vec![repair(Some(-50.0))];

        let details = classify_expenses(&orders, &workers, &repairs, date!(2024 - 03 - 15));

        assert!(details.iter().all(|detail| detail.amount == 0.0));
    }

    #[test]
    fn salaries_are_dated_to_the_pass_date() {
        let pass_date = date!(2024 - 03 - 15);

        let details = classify_expenses(&[], &[worker("Nerea Vidal", Some(600.0))], &[], pass_date);

        assert_eq!(details.len(), 1);
        assert_eq!(details[0].date, pass_date);
    }

    #[test]
    fn nameless_material_is_labelled_unknown() {
        let orders = vec![order(None, 2, Some(5.0), OrderStatus::Received)];

        let details = classify_expenses(&orders, &[], &[], date!(2024 - 03 - 15));

        assert_eq!(details[0].name, "Unknown");
        assert_eq!(details[0].amount, 10.0);
    }

    #[test]
    fn costless_repairs_are_left_out() {
        let repairs = vec![repair(None)];

        let details = classify_expenses(&[], &[], &repairs, date!(2024 - 03 - 15));

        assert!(details.is_empty());
    }

    #[test]
    fn empty_records_total_zero() {
        let details = classify_expenses(&[], &[], &[], date!(2024 - 03 - 15));

        assert_eq!(headline_total(&details), 0.0);
        assert_eq!(breakdown_total(&details), 0.0);
        assert_eq!(category_totals(&details).len(), 3);
    }

    fn detail(category: ExpenseCategory, amount: f64, date: time::Date) -> ExpenseDetail {
        ExpenseDetail {
            id: 1,
            category,
            name: "Navy wool".to_owned(),
            amount,
            date,
            responsible: "Textiles Andinas".to_owned(),
            reference: "OC-2024-031".to_owned(),
        }
    }

    #[test]
    fn category_filter_keeps_only_the_requested_category() {
        let details = vec![
            detail(ExpenseCategory::Material, 10.0, date!(2024 - 03 - 01)),
            detail(ExpenseCategory::Salary, 20.0, date!(2024 - 03 - 02)),
            detail(ExpenseCategory::Repair, 30.0, date!(2024 - 03 - 03)),
        ];

        let filtered = filter_by_category(details.clone(), Some(ExpenseCategory::Salary));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].category, ExpenseCategory::Salary);

        let unfiltered = filter_by_category(details, None);
        assert_eq!(unfiltered.len(), 3);
    }

    #[test]
    fn sorting_by_amount_puts_largest_first() {
        let mut details = vec![
            detail(ExpenseCategory::Material, 10.0, date!(2024 - 03 - 01)),
            detail(ExpenseCategory::Repair, 30.0, date!(2024 - 03 - 03)),
            detail(ExpenseCategory::Salary, 20.0, date!(2024 - 03 - 02)),
        ];

        sort_details(&mut details, ExpenseSort::Amount);

        let amounts: Vec<_> = details.iter().map(|detail| detail.amount).collect();
        assert_eq!(amounts, vec![30.0, 20.0, 10.0]);
    }

    #[test]
    fn sorting_by_date_puts_most_recent_first() {
        let mut details = vec![
            detail(ExpenseCategory::Material, 10.0, date!(2024 - 03 - 01)),
            detail(ExpenseCategory::Repair, 30.0, date!(2024 - 03 - 03)),
            detail(ExpenseCategory::Salary, 20.0, date!(2024 - 03 - 02)),
        ];

        sort_details(&mut details, ExpenseSort::Date);

        let dates: Vec<_> = details.iter().map(|detail| detail.date).collect();
        assert_eq!(
            dates,
            vec![
                date!(2024 - 03 - 03),
                date!(2024 - 03 - 02),
                date!(2024 - 03 - 01)
            ]
        );
    }

    #[test]
    fn filter_then_sort_matches_sort_then_filter() {
        let details = vec![
            detail(ExpenseCategory::Material, 10.0, date!(2024 - 03 - 01)),
            detail(ExpenseCategory::Material, 40.0, date!(2024 - 03 - 04)),
            detail(ExpenseCategory::Repair, 30.0, date!(2024 - 03 - 03)),
            detail(ExpenseCategory::Salary, 20.0, date!(2024 - 03 - 02)),
        ];

        let mut filtered_first = filter_by_category(details.clone(), Some(ExpenseCategory::Material));
        sort_details(&mut filtered_first, ExpenseSort::Amount);

        let mut sorted_first = details;
        sort_details(&mut sorted_first, ExpenseSort::Amount);
        let sorted_then_filtered =
            filter_by_category(sorted_first, Some(ExpenseCategory::Material));

        assert_eq!(filtered_first, sorted_then_filtered);
    }

    #[test]
    fn period_filter_drops_details_outside_the_window() {
        let window = crate::period::window_containing(
            crate::period::Period::Week,
            date!(2024 - 03 - 06),
        );
        assert_eq!(window.start, date!(2024 - 03 - 04));
        let details = vec![
            detail(ExpenseCategory::Material, 10.0, date!(2024 - 03 - 03)),
            detail(ExpenseCategory::Material, 20.0, date!(2024 - 03 - 04)),
            detail(ExpenseCategory::Material, 30.0, date!(2024 - 03 - 10)),
            detail(ExpenseCategory::Material, 40.0, date!(2024 - 03 - 11)),
        ];

        let filtered = filter_by_period(details, &window);

        let amounts: Vec<_> = filtered.iter().map(|detail| detail.amount).collect();
        assert_eq!(amounts, vec![20.0, 30.0]);
    }
}
