//! Defines the core data models and database queries for sales.

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use time::Date;

use crate::{
    Error,
    database_id::{ClientId, ProductId, SaleId},
};

// ============================================================================
// MODELS
// ============================================================================

/// The production state of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaleStatus {
    /// The sale has been taken but work has not started.
    Pending,
    /// The garments are being made.
    InProgress,
    /// The garments have been made and delivered.
    Completed,
    /// The sale was called off.
    Cancelled,
}

impl SaleStatus {
    /// The label stored in the database and shown in the UI.
    pub fn as_str(self) -> &'static str {
        match self {
            SaleStatus::Pending => "Pending",
            SaleStatus::InProgress => "In progress",
            SaleStatus::Completed => "Completed",
            SaleStatus::Cancelled => "Cancelled",
        }
    }

    /// The hex colour used for this status in charts and badges.
    pub fn color(self) -> &'static str {
        match self {
            SaleStatus::Pending => "#F59E0B",
            SaleStatus::InProgress => "#3B82F6",
            SaleStatus::Completed => "#10B981",
            SaleStatus::Cancelled => "#EF4444",
        }
    }

    fn from_label(label: &str) -> Option<SaleStatus> {
        match label {
            "Pending" => Some(SaleStatus::Pending),
            "In progress" => Some(SaleStatus::InProgress),
            "Completed" => Some(SaleStatus::Completed),
            "Cancelled" => Some(SaleStatus::Cancelled),
            _ => None,
        }
    }
}

impl FromSql for SaleStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str().and_then(|label| {
            SaleStatus::from_label(label).ok_or_else(|| {
                FromSqlError::Other(format!("unknown sale status {label:?}").into())
            })
        })
    }
}

impl ToSql for SaleStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

/// A person or business the workshop sells to.
#[derive(Debug, Clone, PartialEq)]
pub struct Client {
    /// The ID of the client.
    pub id: ClientId,
    /// The client's display name.
    pub name: String,
}

/// A garment design the workshop manufactures.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// The ID of the product.
    pub id: ProductId,
    /// The product's display name.
    pub name: String,
}

/// An order for one or more garments.
///
/// To create a new `Sale`, use [Sale::build].
#[derive(Debug, Clone, PartialEq)]
pub struct Sale {
    /// The ID of the sale.
    pub id: SaleId,
    /// The ID of the client the sale was made to, if the client is still on record.
    pub client_id: Option<ClientId>,
    /// The agreed price for the whole sale.
    pub price: f64,
    /// The discount subtracted from the price.
    pub discount: f64,
    /// The production state of the sale.
    pub status: SaleStatus,
    /// How the client paid, e.g. "Cash" or "Transfer".
    pub payment_method: Option<String>,
    /// When the sale was taken.
    pub start_date: Date,
    /// When the finished garments were delivered.
    pub delivery_date: Option<Date>,
}

impl Sale {
    /// Create a new sale.
    ///
    /// Shortcut for [SaleBuilder] for discoverability.
    pub fn build(price: f64, start_date: Date) -> SaleBuilder {
        SaleBuilder {
            client_id: None,
            price,
            discount: 0.0,
            status: SaleStatus::Pending,
            payment_method: None,
            start_date,
            delivery_date: None,
        }
    }
}

/// A builder for creating [Sale] instances.
///
/// Optional fields default to an anonymous, undiscounted, pending sale with
/// no payment method or delivery date recorded.
#[derive(Debug, PartialEq, Clone)]
pub struct SaleBuilder {
    /// The ID of the client the sale was made to.
    pub client_id: Option<ClientId>,
    /// The agreed price for the whole sale.
    pub price: f64,
    /// The discount subtracted from the price. Defaults to zero.
    pub discount: f64,
    /// The production state of the sale. Defaults to [SaleStatus::Pending].
    pub status: SaleStatus,
    /// How the client paid. Left unset for sales that have not been paid yet.
    pub payment_method: Option<String>,
    /// When the sale was taken.
    pub start_date: Date,
    /// When the finished garments were delivered.
    pub delivery_date: Option<Date>,
}

impl SaleBuilder {
    /// Set the client for the sale.
    pub fn client_id(mut self, client_id: Option<ClientId>) -> Self {
        self.client_id = client_id;
        self
    }

    /// Set the discount for the sale.
    pub fn discount(mut self, discount: f64) -> Self {
        self.discount = discount;
        self
    }

    /// Set the production state of the sale.
    pub fn status(mut self, status: SaleStatus) -> Self {
        self.status = status;
        self
    }

    /// Set how the client paid.
    pub fn payment_method(mut self, payment_method: &str) -> Self {
        self.payment_method = Some(payment_method.to_owned());
        self
    }

    /// Set when the finished garments were delivered.
    pub fn delivery_date(mut self, delivery_date: Option<Date>) -> Self {
        self.delivery_date = delivery_date;
        self
    }
}

/// A line on a sale, i.e. a quantity of one product in one size.
///
/// To create a new `SaleItem`, use [SaleItem::build].
#[derive(Debug, Clone, PartialEq)]
pub struct SaleItem {
    /// The ID of the sale item.
    pub id: i64,
    /// The ID of the sale this line belongs to.
    pub sale_id: SaleId,
    /// The ID of the product, if the product is still on record.
    pub product_id: Option<ProductId>,
    /// How many garments of this product were ordered.
    pub quantity: u32,
    /// The garment size, e.g. "M" or "38".
    pub size: Option<String>,
}

impl SaleItem {
    /// Create a new sale item.
    ///
    /// Shortcut for [SaleItemBuilder] for discoverability.
    pub fn build(sale_id: SaleId, quantity: u32) -> SaleItemBuilder {
        SaleItemBuilder {
            sale_id,
            product_id: None,
            quantity,
            size: None,
        }
    }
}

/// A builder for creating [SaleItem] instances.
#[derive(Debug, PartialEq, Clone)]
pub struct SaleItemBuilder {
    /// The ID of the sale this line belongs to.
    pub sale_id: SaleId,
    /// The ID of the product.
    pub product_id: Option<ProductId>,
    /// How many garments of this product were ordered.
    pub quantity: u32,
    /// The garment size.
    pub size: Option<String>,
}

impl SaleItemBuilder {
    /// Set the product for the sale item.
    pub fn product_id(mut self, product_id: Option<ProductId>) -> Self {
        self.product_id = product_id;
        self
    }

    /// Set the garment size for the sale item.
    pub fn size(mut self, size: &str) -> Self {
        self.size = Some(size.to_owned());
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new client in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn create_client(name: &str, connection: &Connection) -> Result<Client, Error> {
    connection
        .prepare("INSERT INTO client (name) VALUES (?1) RETURNING id, name")?
        .query_row((name,), |row| {
            Ok(Client {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })
        .map_err(|error| error.into())
}

/// Create a new product in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn create_product(name: &str, connection: &Connection) -> Result<Product, Error> {
    connection
        .prepare("INSERT INTO product (name) VALUES (?1) RETURNING id, name")?
        .query_row((name,), |row| {
            Ok(Product {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })
        .map_err(|error| error.into())
}

/// Create a new sale in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidClient] if the specified client ID does not refer to a real client,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_sale(builder: SaleBuilder, connection: &Connection) -> Result<Sale, Error> {
    let sale = connection
        .prepare(
            "INSERT INTO sale (client_id, price, discount, status, payment_method, start_date, delivery_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING id, client_id, price, discount, status, payment_method, start_date, delivery_date",
        )?
        .query_row(
            (
                builder.client_id,
                builder.price,
                builder.discount,
                builder.status,
                &builder.payment_method,
                builder.start_date,
                builder.delivery_date,
            ),
            map_sale_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidClient(builder.client_id),
            error => error.into(),
        })?;

    Ok(sale)
}

/// Create a new sale item in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidSaleItem] if the sale or product ID does not refer to a real row,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_sale_item(builder: SaleItemBuilder, connection: &Connection) -> Result<SaleItem, Error> {
    let sale_item = connection
        .prepare(
            "INSERT INTO sale_item (sale_id, product_id, quantity, size)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, sale_id, product_id, quantity, size",
        )?
        .query_row(
            (
                builder.sale_id,
                builder.product_id,
                builder.quantity,
                &builder.size,
            ),
            |row| {
                Ok(SaleItem {
                    id: row.get(0)?,
                    sale_id: row.get(1)?,
                    product_id: row.get(2)?,
                    quantity: row.get(3)?,
                    size: row.get(4)?,
                })
            },
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidSaleItem,
            error => error.into(),
        })?;

    Ok(sale_item)
}

/// Retrieve a sale from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid sale,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_sale(id: SaleId, connection: &Connection) -> Result<Sale, Error> {
    let sale = connection
        .prepare(
            "SELECT id, client_id, price, discount, status, payment_method, start_date, delivery_date
             FROM sale WHERE id = :id",
        )?
        .query_one(&[(":id", &id)], map_sale_row)?;

    Ok(sale)
}

/// Create the client table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_client_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS client (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create the product table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_product_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS product (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create the sale table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_sale_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS sale (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                client_id INTEGER,
                price REAL NOT NULL,
                discount REAL NOT NULL DEFAULT 0,
                status TEXT NOT NULL,
                payment_method TEXT,
                start_date TEXT NOT NULL,
                delivery_date TEXT,
                FOREIGN KEY(client_id) REFERENCES client(id) ON UPDATE CASCADE ON DELETE SET NULL
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('sale', 0)",
        (),
    )?;

    // Add composite index used by dashboard queries.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_sale_date_status ON sale(start_date, status);",
        (),
    )?;

    Ok(())
}

/// Create the sale item table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_sale_item_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS sale_item (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                sale_id INTEGER NOT NULL,
                product_id INTEGER,
                quantity INTEGER NOT NULL,
                size TEXT,
                FOREIGN KEY(sale_id) REFERENCES sale(id) ON DELETE CASCADE,
                FOREIGN KEY(product_id) REFERENCES product(id) ON UPDATE CASCADE ON DELETE SET NULL
                )",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Sale.
pub fn map_sale_row(row: &Row) -> Result<Sale, rusqlite::Error> {
    let id = row.get(0)?;
    let client_id = row.get(1)?;
    let price = row.get(2)?;
    let discount = row.get(3)?;
    let status = row.get(4)?;
    let payment_method = row.get(5)?;
    let start_date = row.get(6)?;
    let delivery_date = row.get(7)?;

    Ok(Sale {
        id,
        client_id,
        price,
        discount,
        status,
        payment_method,
        start_date,
        delivery_date,
    })
}

// ============================================================================
// TESTS
// ============================================================================
