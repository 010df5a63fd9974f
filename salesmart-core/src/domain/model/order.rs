// salesmart-core/src/domain/model/order.rs

use chrono::NaiveDate;
use serde::Serialize;

/// Source columns read from the `orders` table.
pub const ORDER_COLUMNS: [&str; 6] = [
    "transaction_id",
    "customer_id",
    "order_id",
    "order_date",
    "product_id",
    "units",
];

/// Cleaned fact row with its derived aggregates.
///
/// Foreign keys stay optional here: a missing or unconvertible reference is
/// not a cleaning error, the referential filter excludes the row later.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FactOrder {
    pub transaction_id: String,
    pub customer_id: Option<i64>,
    pub order_id: Option<String>,
    pub order_date: Option<NaiveDate>,
    pub product_id: Option<String>,
    pub units: Option<i64>,
    pub month: Option<u32>,
    pub total_amount_by_month: Option<i64>,
    pub total_units_by_customer: Option<i64>,
    pub total_orders_by_product: Option<i64>,
}
