//! Database queries for retrieving sale data for aggregation.
//!
//! This module provides a denormalised sale view optimized for dashboard
//! aggregations, joining each sale with its client, items and products.

use rusqlite::Connection;
use time::Date;

use crate::{Error, database_id::SaleId, sale::SaleStatus};

/// One joined row of the sale, client, sale item and product tables.
///
/// This is separate from the main [Sale](crate::sale::Sale) domain model
/// because the join repeats each sale once per item, and aggregation wants
/// the related names rather than foreign keys. Consumers must deduplicate by
/// `id` before counting sales or summing amounts.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleRow {
    /// The ID of the sale. Repeats across rows for multi-item sales.
    pub id: SaleId,
    /// The client's name, if the client is still on record.
    pub client_name: Option<String>,
    /// The product's name for this item, if the product is still on record.
    pub product_name: Option<String>,
    /// How many garments of this product were ordered. Zero for sales with no items.
    pub quantity: u32,
    /// The agreed price for the whole sale.
    pub price: f64,
    /// The discount subtracted from the price.
    pub discount: f64,
    /// The production state of the sale.
    pub status: SaleStatus,
    /// How the client paid, if recorded.
    pub payment_method: Option<String>,
    /// When the sale was taken.
    pub start_date: Date,
    /// When the finished garments were delivered.
    pub delivery_date: Option<Date>,
}

impl SaleRow {
    /// The amount the sale actually earned, i.e. price less discount.
    pub fn net_amount(&self) -> f64 {
        self.price - self.discount
    }
}

/// Gets every sale joined with its client, items and products.
///
/// The whole table goes into each aggregation pass: the time-series only
/// buckets the displayed windows, but the active order count and the recent
/// sales list consider sales of any age. Rows are ordered newest first so
/// per-sale views can take a prefix.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn fetch_sale_rows(connection: &Connection) -> Result<Vec<SaleRow>, Error> {
    let query = "SELECT
            sale.id,
            client.name,
            product.name,
            COALESCE(sale_item.quantity, 0),
            sale.price,
            sale.discount,
            sale.status,
            sale.payment_method,
            sale.start_date,
            sale.delivery_date
        FROM sale
        LEFT JOIN client ON client.id = sale.client_id
        LEFT JOIN sale_item ON sale_item.sale_id = sale.id
        LEFT JOIN product ON product.id = sale_item.product_id
        ORDER BY sale.start_date DESC, sale.id DESC";

    let mut stmt = connection.prepare(query)?;
    stmt.query_map((), |row| {
        Ok(SaleRow {
            id: row.get(0)?,
            client_name: row.get(1)?,
            product_name: row.get(2)?,
            quantity: row.get(3)?,
            price: row.get(4)?,
            discount: row.get(5)?,
            status: row.get(6)?,
            payment_method: row.get(7)?,
            start_date: row.get(8)?,
            delivery_date: row.get(9)?,
        })
    })?
    .collect::<Result<Vec<SaleRow>, rusqlite::Error>>()
    .map_err(|error| error.into())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::date;

    use super::fetch_sale_rows;
    use crate::{
        db::initialize,
        sale::{Sale, SaleItem, SaleStatus, create_client, create_product, create_sale, create_sale_item},
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn returns_one_row_per_sale_item() {
        let conn = get_test_connection();
        let shirts = create_product("Shirt", &conn).unwrap();
        let trousers = create_product("Trousers", &conn).unwrap();
        let sale = create_sale(Sale::build(150.0, date!(2024 - 03 - 05)), &conn).unwrap();
        create_sale_item(
            SaleItem::build(sale.id, 2).product_id(Some(shirts.id)),
            &conn,
        )
        .unwrap();
        create_sale_item(
            SaleItem::build(sale.id, 1).product_id(Some(trousers.id)),
            &conn,
        )
        .unwrap();

        let rows = fetch_sale_rows(&conn).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, sale.id);
        assert_eq!(rows[1].id, sale.id);
        let mut product_names: Vec<_> = rows
            .iter()
            .map(|row| row.product_name.as_deref().unwrap())
            .collect();
        product_names.sort();
        assert_eq!(product_names, vec!["Shirt", "Trousers"]);
    }

    #[test]
    fn sale_without_items_still_returned() {
        let conn = get_test_connection();
        create_sale(Sale::build(80.0, date!(2024 - 03 - 05)), &conn).unwrap();

        let rows = fetch_sale_rows(&conn).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].quantity, 0);
        assert_eq!(rows[0].product_name, None);
    }

    #[test]
    fn deleted_client_leaves_name_empty() {
        let conn = get_test_connection();
        let client = create_client("Rosa Méndez", &conn).unwrap();
        create_sale(
            Sale::build(90.0, date!(2024 - 03 - 05)).client_id(Some(client.id)),
            &conn,
        )
        .unwrap();
        conn.execute("DELETE FROM client WHERE id = ?1", (client.id,))
            .unwrap();

        let rows = fetch_sale_rows(&conn).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].client_name, None);
    }

    #[test]
    fn returns_sales_from_any_date() {
        let conn = get_test_connection();
        create_sale(Sale::build(10.0, date!(2023 - 02 - 28)), &conn).unwrap();
        create_sale(Sale::build(20.0, date!(2024 - 03 - 01)), &conn).unwrap();
        create_sale(Sale::build(40.0, date!(2025 - 04 - 01)), &conn).unwrap();

        let rows = fetch_sale_rows(&conn).unwrap();

        let total: f64 = rows.iter().map(|row| row.price).sum();
        assert_eq!(rows.len(), 3);
        assert_eq!(total, 70.0);
    }

    #[test]
    fn rows_are_ordered_newest_first() {
        let conn = get_test_connection();
        create_sale(Sale::build(10.0, date!(2024 - 03 - 05)), &conn).unwrap();
        create_sale(Sale::build(20.0, date!(2024 - 03 - 20)), &conn).unwrap();
        create_sale(Sale::build(30.0, date!(2024 - 03 - 12)), &conn).unwrap();

        let rows = fetch_sale_rows(&conn).unwrap();

        let dates: Vec<_> = rows.iter().map(|row| row.start_date).collect();
        assert_eq!(
            dates,
            vec![
                date!(2024 - 03 - 20),
                date!(2024 - 03 - 12),
                date!(2024 - 03 - 05)
            ]
        );
    }

    #[test]
    fn status_and_payment_pass_through() {
        let conn = get_test_connection();
        create_sale(
            Sale::build(60.0, date!(2024 - 03 - 05))
                .status(SaleStatus::Completed)
                .payment_method("Credit card"),
            &conn,
        )
        .unwrap();

        let rows = fetch_sale_rows(&conn).unwrap();

        assert_eq!(rows[0].status, SaleStatus::Completed);
        assert_eq!(rows[0].payment_method.as_deref(), Some("Credit card"));
        assert_eq!(rows[0].net_amount(), 60.0);
    }
}
