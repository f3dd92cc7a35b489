//! Sales for the workshop.
//!
//! This module contains everything related to sales:
//! - The `Sale`, `SaleItem`, `Client` and `Product` models and their builders
//! - Database functions for storing and querying sales
//! - The denormalised [SaleRow] view used by dashboard aggregation

mod core;
mod query;

pub use core::{
    Client, Product, Sale, SaleBuilder, SaleItem, SaleItemBuilder, SaleStatus, create_client,
    create_client_table, create_product, create_product_table, create_sale, create_sale_item,
    create_sale_item_table, create_sale_table, get_sale, map_sale_row,
};
pub use query::{SaleRow, fetch_sale_rows};
