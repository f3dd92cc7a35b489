//! Expense tracking for the workshop.
//!
//! This module contains everything related to spending:
//! - Models and database functions for material orders, workers, tools and
//!   repair reports
//! - Classification of those records into Material, Salary and Repair
//!   expenses, with totals, filters and sort orders
//! - The view handler for the expenses page

mod classify;
mod handlers;
mod sources;

pub use classify::{
    BREAKDOWN_TOTAL_INCLUDES_SALARIES, CategoryTotal, ExpenseCategory, ExpenseDetail, ExpenseSort,
    HEADLINE_TOTAL_INCLUDES_SALARIES, breakdown_total, category_totals, classify_expenses,
    filter_by_category, filter_by_period, headline_total, sort_details,
};
pub use handlers::{ExpenseQuery, ExpensesState, get_expenses_page};
pub use sources::{
    MaterialOrder, MaterialOrderBuilder, MaterialOrderRow, OrderStatus, RepairReport,
    RepairReportRow, Tool, Worker, create_material_order, create_material_order_table,
    create_repair_report, create_repair_report_table, create_tool, create_tool_table,
    create_worker, create_worker_table, fetch_material_orders, fetch_repair_reports, fetch_workers,
};
