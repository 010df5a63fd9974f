// salesmart-core/src/domain/model/product.rs

use rust_decimal::Decimal;
use serde::Serialize;

/// Source columns read from the `products` table.
pub const PRODUCT_COLUMNS: [&str; 5] = ["product_id", "product_name", "factory", "division", "unit_price"];

/// Cleaned product dimension row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Product {
    pub product_id: String,
    pub product_name: String,
    pub factory: String,
    pub division: String,
    pub unit_price: Decimal,
}
