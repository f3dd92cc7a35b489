//! Defines the data models and database queries for the records money is spent on:
//! material orders, worker salaries and tool repairs.

use std::ops::RangeInclusive;

use rusqlite::{
    Connection, params_from_iter,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use time::Date;

use crate::{
    Error,
    database_id::{DatabaseId, MaterialId, ToolId},
};

// ============================================================================
// MODELS
// ============================================================================

/// Whether a material order has arrived at the workshop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    /// The order has been placed but not delivered.
    Pending,
    /// The order has been delivered.
    Received,
}

impl OrderStatus {
    /// The label stored in the database and shown in the UI.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Received => "Received",
        }
    }

    fn from_label(label: &str) -> Option<OrderStatus> {
        match label {
            "Pending" => Some(OrderStatus::Pending),
            "Received" => Some(OrderStatus::Received),
            _ => None,
        }
    }
}

impl FromSql for OrderStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str().and_then(|label| {
            OrderStatus::from_label(label).ok_or_else(|| {
                FromSqlError::Other(format!("unknown order status {label:?}").into())
            })
        })
    }
}

impl ToSql for OrderStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

/// An order for more of a material.
///
/// To create a new `MaterialOrder`, use [MaterialOrder::build].
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialOrder {
    /// The ID of the order.
    pub id: DatabaseId,
    /// The ID of the material ordered, if the material is still on record.
    pub material_id: Option<MaterialId>,
    /// Who the order was placed with.
    pub supplier: Option<String>,
    /// The supplier's order number, if one was issued.
    pub reference: Option<String>,
    /// How many units were ordered.
    pub quantity_requested: u32,
    /// The price per unit, if the supplier has quoted one.
    pub unit_price: Option<f64>,
    /// Whether the order has arrived.
    pub status: OrderStatus,
    /// When the order was placed.
    pub order_date: Date,
}

impl MaterialOrder {
    /// Create a new material order.
    ///
    /// Shortcut for [MaterialOrderBuilder] for discoverability.
    pub fn build(quantity_requested: u32, order_date: Date) -> MaterialOrderBuilder {
        MaterialOrderBuilder {
            material_id: None,
            supplier: None,
            reference: None,
            quantity_requested,
            unit_price: None,
            status: OrderStatus::Pending,
            order_date,
        }
    }
}

/// A builder for creating [MaterialOrder] instances.
///
/// Optional fields default to a pending order with no supplier or quoted price.
#[derive(Debug, PartialEq, Clone)]
pub struct MaterialOrderBuilder {
    /// The ID of the material ordered.
    pub material_id: Option<MaterialId>,
    /// Who the order was placed with.
    pub supplier: Option<String>,
    /// The supplier's order number, if one was issued.
    pub reference: Option<String>,
    /// How many units were ordered.
    pub quantity_requested: u32,
    /// The price per unit. Left unset until the supplier quotes one.
    pub unit_price: Option<f64>,
    /// Whether the order has arrived. Defaults to [OrderStatus::Pending].
    pub status: OrderStatus,
    /// When the order was placed.
    pub order_date: Date,
}

impl MaterialOrderBuilder {
    /// Set the material for the order.
    pub fn material_id(mut self, material_id: Option<MaterialId>) -> Self {
        self.material_id = material_id;
        self
    }

    /// Set who the order was placed with.
    pub fn supplier(mut self, supplier: &str) -> Self {
        self.supplier = Some(supplier.to_owned());
        self
    }

    /// Set the supplier's order number.
    pub fn reference(mut self, reference: &str) -> Self {
        self.reference = Some(reference.to_owned());
        self
    }

    /// Set the price per unit.
    pub fn unit_price(mut self, unit_price: Option<f64>) -> Self {
        self.unit_price = unit_price;
        self
    }

    /// Set whether the order has arrived.
    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }
}

/// A joined view of a material order and its material's name.
///
/// This is what expense classification consumes. The material name replaces
/// the foreign key so the expense detail can be labelled directly.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialOrderRow {
    /// The ID of the order.
    pub id: DatabaseId,
    /// The material's name, if the material is still on record.
    pub material_name: Option<String>,
    /// Who the order was placed with.
    pub supplier: Option<String>,
    /// The supplier's order number, if one was issued.
    pub reference: Option<String>,
    /// How many units were ordered.
    pub quantity_requested: u32,
    /// The price per unit, if the supplier has quoted one.
    pub unit_price: Option<f64>,
    /// Whether the order has arrived.
    pub status: OrderStatus,
    /// When the order was placed.
    pub order_date: Date,
}

/// Someone employed by the workshop.
#[derive(Debug, Clone, PartialEq)]
pub struct Worker {
    /// The ID of the worker.
    pub id: DatabaseId,
    /// The worker's name.
    pub name: String,
    /// What the worker does, e.g. "Seamstress".
    pub role: String,
    /// The worker's monthly salary, if agreed.
    pub salary: Option<f64>,
    /// When the worker joined, if recorded.
    pub hired_on: Option<Date>,
}

/// A machine or tool the workshop owns.
#[derive(Debug, Clone, PartialEq)]
pub struct Tool {
    /// The ID of the tool.
    pub id: ToolId,
    /// The tool's display name.
    pub name: String,
}

/// A fault reported against a tool.
#[derive(Debug, Clone, PartialEq)]
pub struct RepairReport {
    /// The ID of the report.
    pub id: DatabaseId,
    /// The ID of the faulty tool, if the tool is still on record.
    pub tool_id: Option<ToolId>,
    /// What is wrong with the tool.
    pub description: String,
    /// Who reported the fault.
    pub reporter: String,
    /// When the fault was reported.
    pub report_date: Date,
    /// What the repair cost, once known.
    pub repair_cost: Option<f64>,
}

/// A joined view of a repair report and its tool's name.
#[derive(Debug, Clone, PartialEq)]
pub struct RepairReportRow {
    /// The ID of the report.
    pub id: DatabaseId,
    /// The tool's name, if the tool is still on record.
    pub tool_name: Option<String>,
    /// What is wrong with the tool.
    pub description: String,
    /// Who reported the fault.
    pub reporter: String,
    /// When the fault was reported.
    pub report_date: Date,
    /// What the repair cost, once known.
    pub repair_cost: Option<f64>,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new material order in the database from a builder.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn create_material_order(
    builder: MaterialOrderBuilder,
    connection: &Connection,
) -> Result<MaterialOrder, Error> {
    connection
        .prepare(
            "INSERT INTO material_order (material_id, supplier, reference, quantity_requested, unit_price, status, order_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING id, material_id, supplier, reference, quantity_requested, unit_price, status, order_date",
        )?
        .query_row(
            (
                builder.material_id,
                &builder.supplier,
                &builder.reference,
                builder.quantity_requested,
                builder.unit_price,
                builder.status,
                builder.order_date,
            ),
            |row| {
                Ok(MaterialOrder {
                    id: row.get(0)?,
                    material_id: row.get(1)?,
                    supplier: row.get(2)?,
                    reference: row.get(3)?,
                    quantity_requested: row.get(4)?,
                    unit_price: row.get(5)?,
                    status: row.get(6)?,
                    order_date: row.get(7)?,
                })
            },
        )
        .map_err(|error| error.into())
}

/// Create a new worker in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn create_worker(
    name: &str,
    role: &str,
    salary: Option<f64>,
    hired_on: Option<Date>,
    connection: &Connection,
) -> Result<Worker, Error> {
    connection
        .prepare(
            "INSERT INTO worker (name, role, salary, hired_on)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, name, role, salary, hired_on",
        )?
        .query_row((name, role, salary, hired_on), |row| {
            Ok(Worker {
                id: row.get(0)?,
                name: row.get(1)?,
                role: row.get(2)?,
                salary: row.get(3)?,
                hired_on: row.get(4)?,
            })
        })
        .map_err(|error| error.into())
}

/// Create a new tool in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn create_tool(name: &str, connection: &Connection) -> Result<Tool, Error> {
    connection
        .prepare("INSERT INTO tool (name) VALUES (?1) RETURNING id, name")?
        .query_row((name,), |row| {
            Ok(Tool {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })
        .map_err(|error| error.into())
}

/// Create a new repair report in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn create_repair_report(
    tool_id: Option<ToolId>,
    description: &str,
    reporter: &str,
    report_date: Date,
    repair_cost: Option<f64>,
    connection: &Connection,
) -> Result<RepairReport, Error> {
    connection
        .prepare(
            "INSERT INTO repair_report (tool_id, description, reporter, report_date, repair_cost)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, tool_id, description, reporter, report_date, repair_cost",
        )?
        .query_row(
            (tool_id, description, reporter, report_date, repair_cost),
            |row| {
                Ok(RepairReport {
                    id: row.get(0)?,
                    tool_id: row.get(1)?,
                    description: row.get(2)?,
                    reporter: row.get(3)?,
                    report_date: row.get(4)?,
                    repair_cost: row.get(5)?,
                })
            },
        )
        .map_err(|error| error.into())
}

/// Gets material orders joined with their material names within a date range.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn fetch_material_orders(
    date_range: RangeInclusive<Date>,
    connection: &Connection,
) -> Result<Vec<MaterialOrderRow>, Error> {
    let query = "SELECT
            material_order.id,
            material.name,
            material_order.supplier,
            material_order.reference,
            material_order.quantity_requested,
            material_order.unit_price,
            material_order.status,
            material_order.order_date
        FROM material_order
        LEFT JOIN material ON material.id = material_order.material_id
        WHERE material_order.order_date BETWEEN ?1 AND ?2
        ORDER BY material_order.order_date ASC, material_order.id ASC";

    let params = vec![date_range.start().to_string(), date_range.end().to_string()];

    let mut stmt = connection.prepare(query)?;
    stmt.query_map(params_from_iter(params), |row| {
        Ok(MaterialOrderRow {
            id: row.get(0)?,
            material_name: row.get(1)?,
            supplier: row.get(2)?,
            reference: row.get(3)?,
            quantity_requested: row.get(4)?,
            unit_price: row.get(5)?,
            status: row.get(6)?,
            order_date: row.get(7)?,
        })
    })?
    .collect::<Result<Vec<MaterialOrderRow>, rusqlite::Error>>()
    .map_err(|error| error.into())
}

/// Retrieve every worker in the database.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn fetch_workers(connection: &Connection) -> Result<Vec<Worker>, Error> {
    connection
        .prepare("SELECT id, name, role, salary, hired_on FROM worker ORDER BY name ASC")?
        .query_map([], |row| {
            Ok(Worker {
                id: row.get(0)?,
                name: row.get(1)?,
                role: row.get(2)?,
                salary: row.get(3)?,
                hired_on: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<Worker>, rusqlite::Error>>()
        .map_err(|error| error.into())
}

/// Gets repair reports joined with their tool names within a date range.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn fetch_repair_reports(
    date_range: RangeInclusive<Date>,
    connection: &Connection,
) -> Result<Vec<RepairReportRow>, Error> {
    let query = "SELECT
            repair_report.id,
            tool.name,
            repair_report.description,
            repair_report.reporter,
            repair_report.report_date,
            repair_report.repair_cost
        FROM repair_report
        LEFT JOIN tool ON tool.id = repair_report.tool_id
        WHERE repair_report.report_date BETWEEN ?1 AND ?2
        ORDER BY repair_report.report_date ASC, repair_report.id ASC";

    let params = vec![date_range.start().to_string(), date_range.end().to_string()];

    let mut stmt = connection.prepare(query)?;
    stmt.query_map(params_from_iter(params), |row| {
        Ok(RepairReportRow {
            id: row.get(0)?,
            tool_name: row.get(1)?,
            description: row.get(2)?,
            reporter: row.get(3)?,
            report_date: row.get(4)?,
            repair_cost: row.get(5)?,
        })
    })?
    .collect::<Result<Vec<RepairReportRow>, rusqlite::Error>>()
    .map_err(|error| error.into())
}

/// Create the material order table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_material_order_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS material_order (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                material_id INTEGER,
                supplier TEXT,
                reference TEXT,
                quantity_requested INTEGER NOT NULL,
                unit_price REAL,
                status TEXT NOT NULL,
                order_date TEXT NOT NULL,
                FOREIGN KEY(material_id) REFERENCES material(id) ON UPDATE CASCADE ON DELETE SET NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create the worker table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_worker_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS worker (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                role TEXT NOT NULL,
                salary REAL,
                hired_on TEXT
                )",
        (),
    )?;

    Ok(())
}

/// Create the tool table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_tool_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS tool (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create the repair report table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_repair_report_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS repair_report (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                tool_id INTEGER,
                description TEXT NOT NULL,
                reporter TEXT NOT NULL,
                report_date TEXT NOT NULL,
                repair_cost REAL,
                FOREIGN KEY(tool_id) REFERENCES tool(id) ON UPDATE CASCADE ON DELETE SET NULL
                )",
        (),
    )?;

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::db::initialize;

    use super::{
        MaterialOrder, OrderStatus, create_material_order, create_repair_report, create_tool,
        create_worker, fetch_material_orders, fetch_repair_reports, fetch_workers,
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn create_order_succeeds_without_price() {
        let conn = get_test_connection();

        let order = create_material_order(
            MaterialOrder::build(20, date!(2024 - 03 - 05)).supplier("Textiles Andinas"),
            &conn,
        )
        .unwrap();

        assert_eq!(order.unit_price, None);
        assert_eq!(order.reference, None);
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[test]
    fn order_joins_material_name() {
        let conn = get_test_connection();
        let material = crate::inventory::create_material("Navy wool", 12, 5, &conn).unwrap();
        create_material_order(
            MaterialOrder::build(20, date!(2024 - 03 - 05))
                .material_id(Some(material.id))
                .reference("OC-2024-031")
                .unit_price(Some(15.0))
                .status(OrderStatus::Received),
            &conn,
        )
        .unwrap();

        let rows =
            fetch_material_orders(date!(2024 - 03 - 01)..=date!(2024 - 03 - 31), &conn).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].material_name.as_deref(), Some("Navy wool"));
        assert_eq!(rows[0].reference.as_deref(), Some("OC-2024-031"));
        assert_eq!(rows[0].unit_price, Some(15.0));
        assert_eq!(rows[0].status, OrderStatus::Received);
    }

    #[test]
    fn orders_outside_date_range_are_excluded() {
        let conn = get_test_connection();
        create_material_order(MaterialOrder::build(5, date!(2024 - 02 - 28)), &conn).unwrap();
        create_material_order(MaterialOrder::build(6, date!(2024 - 03 - 15)), &conn).unwrap();

        let rows =
            fetch_material_orders(date!(2024 - 03 - 01)..=date!(2024 - 03 - 31), &conn).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].quantity_requested, 6);
    }

    #[test]
    fn worker_round_trips_missing_salary() {
        let conn = get_test_connection();
        create_worker("Nerea Vidal", "Seamstress", Some(950.0), None, &conn).unwrap();
        create_worker("Pilar Soto", "Apprentice", None, Some(date!(2024 - 01 - 15)), &conn).unwrap();

        let workers = fetch_workers(&conn).unwrap();

        assert_eq!(workers.len(), 2);
        assert_eq!(workers[0].salary, Some(950.0));
        assert_eq!(workers[1].salary, None);
        assert_eq!(workers[1].hired_on, Some(date!(2024 - 01 - 15)));
    }

    #[test]
    fn repair_report_joins_tool_name() {
        let conn = get_test_connection();
        let tool = create_tool("Overlock machine", &conn).unwrap();
        create_repair_report(
            Some(tool.id),
            "Thread tension drifting",
            "Nerea Vidal",
            date!(2024 - 03 - 10),
            Some(50.0),
            &conn,
        )
        .unwrap();
        create_repair_report(
            None,
            "Pedal squeaks",
            "Pilar Soto",
            date!(2024 - 03 - 12),
            None,
            &conn,
        )
        .unwrap();

        let rows =
            fetch_repair_reports(date!(2024 - 03 - 01)..=date!(2024 - 03 - 31), &conn).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].tool_name.as_deref(), Some("Overlock machine"));
        assert_eq!(rows[0].repair_cost, Some(50.0));
        assert_eq!(rows[1].tool_name, None);
        assert_eq!(rows[1].repair_cost, None);
    }
}
