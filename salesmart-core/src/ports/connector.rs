// salesmart-core/src/ports/connector.rs

// What the loader needs from a destination warehouse, without knowing which
// engine sits behind it.

use crate::domain::model::SqlValue;
use crate::error::SalesmartError;
use async_trait::async_trait;

// Engine-independent column description
#[derive(Debug, Clone)]
pub struct ColumnSchema {
    pub name: String,
    pub data_type: String,
    pub is_nullable: bool,
}

#[async_trait]
pub trait Connector: Send + Sync {
    /// Runs one statement, returns the affected row count.
    async fn execute(&self, query: &str) -> Result<usize, SalesmartError>;

    /// Runs the statements as one unit: all committed, or none.
    async fn execute_transaction(&self, statements: &[String]) -> Result<(), SalesmartError>;

    /// Column layout of a table, in declaration order.
    async fn fetch_columns(&self, table_name: &str) -> Result<Vec<ColumnSchema>, SalesmartError>;

    /// First column of every row returned by `query`.
    async fn query_column(&self, query: &str) -> Result<Vec<SqlValue>, SalesmartError>;

    /// Single non-negative integer, e.g. a `COUNT(*)`.
    async fn query_scalar(&self, query: &str) -> Result<u64, SalesmartError>;

    fn engine_name(&self) -> &str;
}
