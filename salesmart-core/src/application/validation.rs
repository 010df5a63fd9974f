// salesmart-core/src/application/validation.rs

use serde::Serialize;
use tracing::{debug, info};

use crate::domain::error::DomainError;
use crate::domain::warehouse::{DIM_CUSTOMERS, DIM_PRODUCTS, FACT_ORDERS, TableDef};
use crate::error::SalesmartError;
use crate::ports::connector::Connector;

/// Row counts of the three warehouse tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableCounts {
    pub customers: u64,
    pub products: u64,
    pub facts: u64,
}

/// The destination's column layout must match the declared table, name by name and type by type.
pub async fn verify_schema(
    connector: &dyn Connector,
    table: &TableDef,
) -> Result<(), SalesmartError> {
    let actual = connector.fetch_columns(table.name).await?;

    if actual.len() != table.columns.len() {
        return Err(DomainError::SchemaError(format!(
            "{} has {} columns, expected {}",
            table.name,
            actual.len(),
            table.columns.len()
        ))
        .into());
    }

    for (expected, found) in table.columns.iter().zip(&actual) {
        if !found.name.eq_ignore_ascii_case(expected.name) {
            return Err(DomainError::SchemaError(format!(
                "{}: expected column '{}', found '{}'",
                table.name, expected.name, found.name
            ))
            .into());
        }
        if !expected.sql_type.matches(&found.data_type) {
            return Err(DomainError::SchemaError(format!(
                "{}.{}: expected type {}, found {}",
                table.name, expected.name, expected.sql_type, found.data_type
            ))
            .into());
        }
    }

    debug!(table = table.name, "Schema conforms");
    Ok(())
}

/// Counts rows in all three tables and compares them with what was inserted.
pub async fn verify_counts(
    connector: &dyn Connector,
    expected: TableCounts,
) -> Result<TableCounts, SalesmartError> {
    let actual = TableCounts {
        customers: count(connector, &DIM_CUSTOMERS, expected.customers).await?,
        products: count(connector, &DIM_PRODUCTS, expected.products).await?,
        facts: count(connector, &FACT_ORDERS, expected.facts).await?,
    };
    info!(
        customers = actual.customers,
        products = actual.products,
        facts = actual.facts,
        "Row counts verified"
    );
    Ok(actual)
}

async fn count(
    connector: &dyn Connector,
    table: &TableDef,
    expected: u64,
) -> Result<u64, SalesmartError> {
    let actual = connector.query_scalar(&table.count_statement()).await?;
    if actual != expected {
        return Err(DomainError::VerificationFailed {
            table: table.name.to_string(),
            expected,
            actual,
        }
        .into());
    }
    Ok(actual)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::model::SqlValue;
    use crate::ports::connector::ColumnSchema;
    use async_trait::async_trait;
    use std::collections::HashMap;

    // --- MOCK CONNECTOR ---
    struct MockConnector {
        columns_return: Vec<ColumnSchema>,
        counts: HashMap<String, u64>,
    }

    #[async_trait]
    impl Connector for MockConnector {
        async fn execute(&self, _query: &str) -> Result<usize, SalesmartError> {
            Ok(0)
        }
        async fn execute_transaction(&self, _statements: &[String]) -> Result<(), SalesmartError> {
            Ok(())
        }
        async fn fetch_columns(&self, _table_name: &str) -> Result<Vec<ColumnSchema>, SalesmartError> {
            Ok(self.columns_return.clone())
        }
        async fn query_column(&self, _query: &str) -> Result<Vec<SqlValue>, SalesmartError> {
            Ok(vec![])
        }
        async fn query_scalar(&self, query: &str) -> Result<u64, SalesmartError> {
            Ok(self.counts.get(query).copied().unwrap_or(0))
        }
        fn engine_name(&self) -> &str {
            "mock"
        }
    }

    fn column(name: &str, data_type: &str) -> ColumnSchema {
        ColumnSchema {
            name: name.into(),
            data_type: data_type.into(),
            is_nullable: true,
        }
    }

    fn customer_columns() -> Vec<ColumnSchema> {
        vec![
            column("customer_id", "INTEGER"),
            column("city", "VARCHAR"),
            column("state_province", "VARCHAR"),
            column("country", "VARCHAR"),
            column("region", "VARCHAR"),
        ]
    }

    #[tokio::test]
    async fn test_conforming_schema() {
        let connector = MockConnector {
            columns_return: customer_columns(),
            counts: HashMap::new(),
        };
        assert!(verify_schema(&connector, &DIM_CUSTOMERS).await.is_ok());
    }

    #[tokio::test]
    async fn test_type_drift_is_a_schema_error() {
        let mut columns = customer_columns();
        columns[0] = column("customer_id", "BIGINT");
        let connector = MockConnector {
            columns_return: columns,
            counts: HashMap::new(),
        };

        let err = verify_schema(&connector, &DIM_CUSTOMERS).await.unwrap_err();
        assert!(matches!(
            err,
            SalesmartError::Domain(DomainError::SchemaError(_))
        ));
    }

    #[tokio::test]
    async fn test_count_mismatch() {
        let counts = HashMap::from([
            (DIM_CUSTOMERS.count_statement(), 2),
            (DIM_PRODUCTS.count_statement(), 2),
            (FACT_ORDERS.count_statement(), 1),
        ]);
        let connector = MockConnector {
            columns_return: vec![],
            counts,
        };

        let err = verify_counts(
            &connector,
            TableCounts {
                customers: 2,
                products: 2,
                facts: 2,
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            SalesmartError::Domain(DomainError::VerificationFailed { expected: 2, actual: 1, .. })
        ));
    }
}
