//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;

/// The ID of a row in the client table.
pub type ClientId = DatabaseId;
/// The ID of a row in the product table.
pub type ProductId = DatabaseId;
/// The ID of a row in the sale table.
pub type SaleId = DatabaseId;
/// The ID of a row in the material table.
pub type MaterialId = DatabaseId;
/// The ID of a row in the tool table.
pub type ToolId = DatabaseId;
