// salesmart-core/src/domain/model/customer.rs

use serde::Serialize;

/// Source columns read from the `customers` table.
pub const CUSTOMER_COLUMNS: [&str; 5] = ["customer_id", "city", "state_province", "country", "region"];

/// Cleaned customer dimension row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Customer {
    pub customer_id: i64,
    pub city: String,
    pub state_province: String,
    pub country: String,
    pub region: String,
}
