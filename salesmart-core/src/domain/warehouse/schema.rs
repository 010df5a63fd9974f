// salesmart-core/src/domain/warehouse/schema.rs
//
// Star schema of the destination: two dimensions, one fact table.

use std::fmt;

use crate::domain::error::DomainError;
use crate::domain::model::SqlValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Integer,
    Varchar(u16),
    Decimal { precision: u8, scale: u8 },
    Date,
}

impl SqlType {
    /// Whether a type name reported by the destination belongs to this type.
    /// Bounded strings are matched on the family only, engines may drop the length.
    pub fn matches(&self, reported: &str) -> bool {
        let reported = reported.trim().to_ascii_uppercase();
        match self {
            SqlType::Integer => matches!(reported.as_str(), "INTEGER" | "INT" | "INT4" | "INT32"),
            SqlType::Varchar(_) => {
                reported.starts_with("VARCHAR")
                    || reported.starts_with("NVARCHAR")
                    || reported == "TEXT"
                    || reported == "STRING"
            }
            SqlType::Decimal { precision, scale } => {
                let compact = reported.replace(' ', "");
                compact == format!("DECIMAL({},{})", precision, scale)
                    || compact == format!("NUMERIC({},{})", precision, scale)
            }
            SqlType::Date => reported == "DATE",
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlType::Integer => f.write_str("INTEGER"),
            SqlType::Varchar(len) => write!(f, "VARCHAR({})", len),
            SqlType::Decimal { precision, scale } => write!(f, "DECIMAL({},{})", precision, scale),
            SqlType::Date => f.write_str("DATE"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub sql_type: SqlType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKey {
    pub column: &'static str,
    pub references: &'static str,
    pub referenced_column: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDef {
    pub name: &'static str,
    pub columns: &'static [ColumnDef],
    pub primary_key: &'static str,
    pub foreign_keys: &'static [ForeignKey],
}

const fn col(name: &'static str, sql_type: SqlType) -> ColumnDef {
    ColumnDef { name, sql_type }
}

pub const DIM_CUSTOMERS: TableDef = TableDef {
    name: "dim_customers",
    columns: &[
        col("customer_id", SqlType::Integer),
        col("city", SqlType::Varchar(100)),
        col("state_province", SqlType::Varchar(100)),
        col("country", SqlType::Varchar(100)),
        col("region", SqlType::Varchar(50)),
    ],
    primary_key: "customer_id",
    foreign_keys: &[],
};

pub const DIM_PRODUCTS: TableDef = TableDef {
    name: "dim_products",
    columns: &[
        col("product_id", SqlType::Varchar(50)),
        col("product_name", SqlType::Varchar(200)),
        col("factory", SqlType::Varchar(100)),
        col("division", SqlType::Varchar(100)),
        col("unit_price", SqlType::Decimal { precision: 10, scale: 2 }),
    ],
    primary_key: "product_id",
    foreign_keys: &[],
};

pub const FACT_ORDERS: TableDef = TableDef {
    name: "fact_orders",
    columns: &[
        col("transaction_id", SqlType::Varchar(50)),
        col("customer_id", SqlType::Integer),
        col("order_id", SqlType::Varchar(50)),
        col("order_date", SqlType::Date),
        col("product_id", SqlType::Varchar(50)),
        col("units", SqlType::Integer),
        col("month", SqlType::Integer),
        col("total_amount_by_month", SqlType::Integer),
        col("total_units_by_customer", SqlType::Integer),
        col("total_orders_by_product", SqlType::Integer),
    ],
    primary_key: "transaction_id",
    foreign_keys: &[
        ForeignKey {
            column: "customer_id",
            references: "dim_customers",
            referenced_column: "customer_id",
        },
        ForeignKey {
            column: "product_id",
            references: "dim_products",
            referenced_column: "product_id",
        },
    ],
};

impl TableDef {
    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }

    pub fn drop_statement(&self) -> String {
        format!("DROP TABLE IF EXISTS {}", self.name)
    }

    pub fn create_statement(&self) -> String {
        let mut parts: Vec<String> = self
            .columns
            .iter()
            .map(|c| {
                if c.name == self.primary_key {
                    format!("{} {} PRIMARY KEY", c.name, c.sql_type)
                } else {
                    format!("{} {}", c.name, c.sql_type)
                }
            })
            .collect();
        parts.extend(self.foreign_keys.iter().map(|fk| {
            format!(
                "FOREIGN KEY ({}) REFERENCES {} ({})",
                fk.column, fk.references, fk.referenced_column
            )
        }));
        format!("CREATE TABLE {} ({})", self.name, parts.join(", "))
    }

    /// Multi-row `INSERT` for one chunk. Every row must match the column count.
    pub fn insert_statement(&self, rows: &[Vec<SqlValue>]) -> Result<String, DomainError> {
        if rows.is_empty() {
            return Err(DomainError::SchemaError(format!(
                "Empty insert into '{}'",
                self.name
            )));
        }
        let width = self.columns.len();
        let mut tuples = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(DomainError::RowWidth {
                    table: self.name.to_string(),
                    row: i,
                    expected: width,
                    actual: row.len(),
                });
            }
            let values: Vec<String> = row.iter().map(SqlValue::to_sql_literal).collect();
            tuples.push(format!("({})", values.join(", ")));
        }
        Ok(format!(
            "INSERT INTO {} ({}) VALUES {}",
            self.name,
            self.column_names().join(", "),
            tuples.join(", ")
        ))
    }

    pub fn count_statement(&self) -> String {
        format!("SELECT COUNT(*) FROM {}", self.name)
    }

    pub fn key_statement(&self) -> String {
        format!("SELECT {} FROM {}", self.primary_key, self.name)
    }
}

/// The full warehouse layout, with the orderings DDL depends on.
pub struct WarehouseSchema;

impl WarehouseSchema {
    /// Referenced tables first.
    pub const CREATE_ORDER: [&'static TableDef; 3] = [&DIM_CUSTOMERS, &DIM_PRODUCTS, &FACT_ORDERS];

    /// Referencing table first.
    pub const DROP_ORDER: [&'static TableDef; 3] = [&FACT_ORDERS, &DIM_PRODUCTS, &DIM_CUSTOMERS];

    /// Drops then creates, in an order valid under foreign-key constraints.
    pub fn recreate_statements() -> Vec<String> {
        Self::DROP_ORDER
            .iter()
            .map(|t| t.drop_statement())
            .chain(Self::CREATE_ORDER.iter().map(|t| t.create_statement()))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_ddl() {
        insta::assert_snapshot!(
            DIM_CUSTOMERS.create_statement(),
            @"CREATE TABLE dim_customers (customer_id INTEGER PRIMARY KEY, city VARCHAR(100), state_province VARCHAR(100), country VARCHAR(100), region VARCHAR(50))"
        );
        insta::assert_snapshot!(
            DIM_PRODUCTS.create_statement(),
            @"CREATE TABLE dim_products (product_id VARCHAR(50) PRIMARY KEY, product_name VARCHAR(200), factory VARCHAR(100), division VARCHAR(100), unit_price DECIMAL(10,2))"
        );
    }

    #[test]
    fn test_fact_ddl_declares_both_foreign_keys() {
        insta::assert_snapshot!(
            FACT_ORDERS.create_statement(),
            @"CREATE TABLE fact_orders (transaction_id VARCHAR(50) PRIMARY KEY, customer_id INTEGER, order_id VARCHAR(50), order_date DATE, product_id VARCHAR(50), units INTEGER, month INTEGER, total_amount_by_month INTEGER, total_units_by_customer INTEGER, total_orders_by_product INTEGER, FOREIGN KEY (customer_id) REFERENCES dim_customers (customer_id), FOREIGN KEY (product_id) REFERENCES dim_products (product_id))"
        );
    }

    #[test]
    fn test_fact_is_dropped_first_and_created_last() {
        let stmts = WarehouseSchema::recreate_statements();
        assert_eq!(stmts.len(), 6);
        assert_eq!(stmts[0], "DROP TABLE IF EXISTS fact_orders");
        assert_eq!(stmts[1], "DROP TABLE IF EXISTS dim_products");
        assert_eq!(stmts[2], "DROP TABLE IF EXISTS dim_customers");
        assert!(stmts[3].starts_with("CREATE TABLE dim_customers"));
        assert!(stmts[4].starts_with("CREATE TABLE dim_products"));
        assert!(stmts[5].starts_with("CREATE TABLE fact_orders"));
    }

    #[test]
    fn test_insert_statement() {
        let rows = vec![
            vec![
                SqlValue::Integer(1),
                SqlValue::text("Saint-Malo"),
                SqlValue::text("Bretagne"),
                SqlValue::text("France"),
                SqlValue::text("Unknown"),
            ],
            vec![
                SqlValue::Integer(2),
                SqlValue::text("L'Aquila"),
                SqlValue::Null,
                SqlValue::text("Italy"),
                SqlValue::text("South"),
            ],
        ];
        insta::assert_snapshot!(
            DIM_CUSTOMERS.insert_statement(&rows).unwrap(),
            @"INSERT INTO dim_customers (customer_id, city, state_province, country, region) VALUES (1, 'Saint-Malo', 'Bretagne', 'France', 'Unknown'), (2, 'L''Aquila', NULL, 'Italy', 'South')"
        );
    }

    #[test]
    fn test_insert_rejects_bad_width_and_empty_chunks() {
        assert!(DIM_CUSTOMERS.insert_statement(&[]).is_err());
        let short = vec![vec![SqlValue::Integer(1)]];
        assert!(matches!(
            DIM_CUSTOMERS.insert_statement(&short),
            Err(DomainError::RowWidth { expected: 5, actual: 1, .. })
        ));
    }

    #[test]
    fn test_reported_type_matching() {
        assert!(SqlType::Varchar(100).matches("VARCHAR"));
        assert!(SqlType::Integer.matches("integer"));
        assert!(SqlType::Decimal { precision: 10, scale: 2 }.matches("DECIMAL(10,2)"));
        assert!(!SqlType::Decimal { precision: 10, scale: 2 }.matches("DECIMAL(18,3)"));
        assert!(!SqlType::Date.matches("TIMESTAMP"));
    }
}
