// salesmart-core/src/domain/warehouse/rows.rs

use super::schema::{DIM_CUSTOMERS, DIM_PRODUCTS, FACT_ORDERS, TableDef};
use crate::domain::model::{Customer, FactOrder, Product, SqlValue};

/// A cleaned row that maps onto one warehouse table.
/// `values` follows the column order of `table()`.
pub trait WarehouseRow {
    fn table() -> &'static TableDef;
    fn values(&self) -> Vec<SqlValue>;
}

impl WarehouseRow for Customer {
    fn table() -> &'static TableDef {
        &DIM_CUSTOMERS
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Integer(self.customer_id),
            SqlValue::text(&self.city),
            SqlValue::text(&self.state_province),
            SqlValue::text(&self.country),
            SqlValue::text(&self.region),
        ]
    }
}

impl WarehouseRow for Product {
    fn table() -> &'static TableDef {
        &DIM_PRODUCTS
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::text(&self.product_id),
            SqlValue::text(&self.product_name),
            SqlValue::text(&self.factory),
            SqlValue::text(&self.division),
            SqlValue::Decimal(self.unit_price),
        ]
    }
}

impl WarehouseRow for FactOrder {
    fn table() -> &'static TableDef {
        &FACT_ORDERS
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::text(&self.transaction_id),
            self.customer_id.into(),
            self.order_id.clone().into(),
            self.order_date.into(),
            self.product_id.clone().into(),
            self.units.into(),
            self.month.map(i64::from).into(),
            self.total_amount_by_month.into(),
            self.total_units_by_customer.into(),
            self.total_orders_by_product.into(),
        ]
    }
}
