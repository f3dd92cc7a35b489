//! Material stock levels for the workshop.

use rusqlite::Connection;
use serde::Serialize;

use crate::{Error, database_id::MaterialId};

/// A fabric, thread or other supply the workshop keeps in stock.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// The ID of the material.
    pub id: MaterialId,
    /// The material's display name.
    pub name: String,
    /// How much of the material is currently held.
    pub stock: i64,
    /// The stock level below which the material should be reordered.
    pub minimum_stock: i64,
}

/// How well stocked a material is relative to its reorder threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockLevel {
    /// Stock is above the reorder threshold.
    InStock,
    /// Stock is at or below the reorder threshold but not exhausted.
    LowStock,
    /// Stock is exhausted.
    OutOfStock,
}

impl StockLevel {
    /// Classify a material's stock against its reorder threshold.
    ///
    /// Exhausted stock wins over the low-stock check, so a material with zero
    /// stock and a zero threshold reads as out of stock rather than low.
    pub fn classify(material: &Material) -> StockLevel {
        if material.stock <= 0 {
            StockLevel::OutOfStock
        } else if material.stock <= material.minimum_stock {
            StockLevel::LowStock
        } else {
            StockLevel::InStock
        }
    }

    /// The label shown in the UI.
    pub fn label(self) -> &'static str {
        match self {
            StockLevel::InStock => "In stock",
            StockLevel::LowStock => "Low stock",
            StockLevel::OutOfStock => "Out of stock",
        }
    }

    /// The hex colour used for this level in badges.
    pub fn color(self) -> &'static str {
        match self {
            StockLevel::InStock => "#10B981",
            StockLevel::LowStock => "#F59E0B",
            StockLevel::OutOfStock => "#EF4444",
        }
    }
}

/// How many materials fall into each stock level.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct InventoryStatus {
    /// Materials above their reorder threshold.
    pub in_stock: usize,
    /// Materials at or below their reorder threshold.
    pub low_stock: usize,
    /// Materials with no stock left.
    pub out_of_stock: usize,
}

/// Count how many materials fall into each stock level.
pub fn count_stock_levels(materials: &[Material]) -> InventoryStatus {
    let mut status = InventoryStatus::default();

    for material in materials {
        match StockLevel::classify(material) {
            StockLevel::InStock => status.in_stock += 1,
            StockLevel::LowStock => status.low_stock += 1,
            StockLevel::OutOfStock => status.out_of_stock += 1,
        }
    }

    status
}

/// Create a new material in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn create_material(
    name: &str,
    stock: i64,
    minimum_stock: i64,
    connection: &Connection,
) -> Result<Material, Error> {
    connection
        .prepare(
            "INSERT INTO material (name, stock, minimum_stock)
             VALUES (?1, ?2, ?3)
             RETURNING id, name, stock, minimum_stock",
        )?
        .query_row((name, stock, minimum_stock), |row| {
            Ok(Material {
                id: row.get(0)?,
                name: row.get(1)?,
                stock: row.get(2)?,
                minimum_stock: row.get(3)?,
            })
        })
        .map_err(|error| error.into())
}

/// Retrieve every material in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn fetch_materials(connection: &Connection) -> Result<Vec<Material>, Error> {
    connection
        .prepare("SELECT id, name, stock, minimum_stock FROM material ORDER BY name ASC")?
        .query_map([], |row| {
            Ok(Material {
                id: row.get(0)?,
                name: row.get(1)?,
                stock: row.get(2)?,
                minimum_stock: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<Material>, rusqlite::Error>>()
        .map_err(|error| error.into())
}

/// Create the material table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_material_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS material (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                stock INTEGER NOT NULL DEFAULT 0,
                minimum_stock INTEGER NOT NULL DEFAULT 0
                )",
        (),
    )?;

    Ok(())
}

#[cfg(test)]
mod stock_level_tests {
    use super::{Material, StockLevel};

    fn material(stock: i64, minimum_stock: i64) -> Material {
        Material {
            id: 1,
            name: "Navy wool".to_owned(),
            stock,
            minimum_stock,
        }
    }

    #[test]
    fn zero_stock_is_out_of_stock() {
        assert_eq!(
            StockLevel::classify(&material(0, 5)),
            StockLevel::OutOfStock
        );
    }

    #[test]
    fn negative_stock_is_out_of_stock() {
        assert_eq!(
            StockLevel::classify(&material(-2, 5)),
            StockLevel::OutOfStock
        );
    }

    #[test]
    fn stock_at_threshold_is_low() {
        assert_eq!(StockLevel::classify(&material(5, 5)), StockLevel::LowStock);
    }

    #[test]
    fn stock_below_threshold_is_low() {
        assert_eq!(StockLevel::classify(&material(3, 5)), StockLevel::LowStock);
    }

    #[test]
    fn stock_above_threshold_is_in_stock() {
        assert_eq!(StockLevel::classify(&material(6, 5)), StockLevel::InStock);
    }

    #[test]
    fn zero_stock_with_zero_threshold_is_out_of_stock() {
        assert_eq!(
            StockLevel::classify(&material(0, 0)),
            StockLevel::OutOfStock
        );
    }
}

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;

    use crate::db::initialize;

    use super::{InventoryStatus, count_stock_levels, create_material, fetch_materials};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn create_and_fetch_round_trips() {
        let conn = get_test_connection();
        let created = create_material("Navy wool", 12, 5, &conn).unwrap();

        let materials = fetch_materials(&conn).unwrap();

        assert_eq!(materials, vec![created]);
    }

    #[test]
    fn counts_cover_every_level() {
        let conn = get_test_connection();
        create_material("Navy wool", 12, 5, &conn).unwrap();
        create_material("White cotton", 4, 5, &conn).unwrap();
        create_material("Red thread", 0, 2, &conn).unwrap();
        create_material("Black denim", 40, 10, &conn).unwrap();

        let status = count_stock_levels(&fetch_materials(&conn).unwrap());

        assert_eq!(
            status,
            InventoryStatus {
                in_stock: 2,
                low_stock: 1,
                out_of_stock: 1,
            }
        );
    }

    #[test]
    fn empty_inventory_counts_zero() {
        let status = count_stock_levels(&[]);

        assert_eq!(status, InventoryStatus::default());
    }
}
