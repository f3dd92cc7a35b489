//! Database initialisation.

use rusqlite::Connection;

use crate::{
    Error,
    expense::{
        create_material_order_table, create_repair_report_table, create_tool_table,
        create_worker_table,
    },
    inventory::create_material_table,
    sale::{create_client_table, create_product_table, create_sale_item_table, create_sale_table},
};

/// Create the application's tables if they do not already exist.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // SQLite leaves foreign key enforcement off by default.
    connection.pragma_update(None, "foreign_keys", "ON")?;

    create_client_table(connection)?;
    create_product_table(connection)?;
    create_sale_table(connection)?;
    create_sale_item_table(connection)?;
    create_material_table(connection)?;
    create_material_order_table(connection)?;
    create_worker_table(connection)?;
    create_tool_table(connection)?;
    create_repair_report_table(connection)?;

    Ok(())
}

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;

    use super::initialize;

    #[test]
    fn initialize_creates_tables() {
        let conn = Connection::open_in_memory().unwrap();

        initialize(&conn).unwrap();

        let table_count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN \
                ('client', 'product', 'sale', 'sale_item', 'material', 'material_order', \
                'worker', 'tool', 'repair_report')",
                (),
                |row| row.get(0),
            )
            .unwrap();

        assert_eq!(table_count, 9);
    }

    #[test]
    fn initialize_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        initialize(&conn).unwrap();
        initialize(&conn).unwrap();
    }
}
