// salesmart-core/src/domain/model/mod.rs

pub mod customer;
pub mod dataset;
pub mod order;
pub mod product;
pub mod value;

pub use customer::{CUSTOMER_COLUMNS, Customer};
pub use dataset::{RawDataset, RawTable};
pub use order::{FactOrder, ORDER_COLUMNS};
pub use product::{PRODUCT_COLUMNS, Product};
pub use value::SqlValue;

use serde::Serialize;

/// Output of the transformer, ready for the warehouse.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CleanDataset {
    pub customers: Vec<Customer>,
    pub orders: Vec<FactOrder>,
    pub products: Vec<Product>,
}

impl CleanDataset {
    /// Projects the cleaned rows back onto the source layout.
    /// Derived fact columns are left out, they are recomputed on transform.
    pub fn to_raw(&self) -> RawDataset {
        let customers = self.customers.iter().fold(
            RawTable::new("customers", CUSTOMER_COLUMNS),
            |table, c| {
                table.with_row(vec![
                    SqlValue::Integer(c.customer_id),
                    SqlValue::text(&c.city),
                    SqlValue::text(&c.state_province),
                    SqlValue::text(&c.country),
                    SqlValue::text(&c.region),
                ])
            },
        );

        let products = self.products.iter().fold(
            RawTable::new("products", PRODUCT_COLUMNS),
            |table, p| {
                table.with_row(vec![
                    SqlValue::text(&p.product_id),
                    SqlValue::text(&p.product_name),
                    SqlValue::text(&p.factory),
                    SqlValue::text(&p.division),
                    SqlValue::Decimal(p.unit_price),
                ])
            },
        );

        let orders = self
            .orders
            .iter()
            .fold(RawTable::new("orders", ORDER_COLUMNS), |table, o| {
                table.with_row(vec![
                    SqlValue::text(&o.transaction_id),
                    o.customer_id.into(),
                    o.order_id.clone().into(),
                    o.order_date.into(),
                    o.product_id.clone().into(),
                    o.units.into(),
                ])
            });

        RawDataset {
            customers,
            orders,
            products,
        }
    }
}
