// salesmart-core/src/domain/warehouse/mod.rs

pub mod rows;
pub mod schema;

pub use rows::WarehouseRow;
pub use schema::{
    ColumnDef, DIM_CUSTOMERS, DIM_PRODUCTS, FACT_ORDERS, ForeignKey, SqlType, TableDef,
    WarehouseSchema,
};
