// salesmart-core/src/infrastructure/adapters/duckdb.rs

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use duckdb::types::{TimeUnit, Value};
use duckdb::{Config, Connection};
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

use crate::domain::model::{RawTable, SqlValue};
use crate::error::SalesmartError;
use crate::infrastructure::error::{DatabaseError, InfrastructureError};
use crate::ports::connector::{ColumnSchema, Connector};

/// Days between 0001-01-01 (CE day 1) and 1970-01-01.
const UNIX_EPOCH_CE_DAYS: i32 = 719_163;

pub struct DuckDBConnector {
    conn: Arc<Mutex<Connection>>,
}

impl DuckDBConnector {
    pub fn new(db_path: &str) -> Result<Self, InfrastructureError> {
        let config = Config::default();

        let conn = if db_path == ":memory:" {
            Connection::open_in_memory_with_flags(config)?
        } else {
            Connection::open_with_flags(db_path, config)?
        };

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, SalesmartError> {
        self.conn.lock().map_err(|_| {
            SalesmartError::Infrastructure(InfrastructureError::Database(DatabaseError::Poisoned(
                "duckdb".into(),
            )))
        })
    }

    /// Runs a `;`-separated batch outside any transaction (extension setup, ATTACH).
    pub(crate) fn execute_batch(&self, sql: &str) -> Result<(), SalesmartError> {
        let conn = self.lock()?;
        conn.execute_batch(sql)?;
        Ok(())
    }

    /// Full read of `relation`, column names as the engine reports them.
    pub(crate) fn read_table(&self, name: &str, relation: &str) -> Result<RawTable, SalesmartError> {
        let conn = self.lock()?;

        let mut describe = conn.prepare(&format!("DESCRIBE SELECT * FROM {}", relation))?;
        let mut described = describe.query([])?;
        let mut columns = Vec::new();
        while let Some(row) = described.next()? {
            columns.push(row.get::<_, String>(0)?);
        }

        let mut table = RawTable::new(name, columns);
        let width = table.columns.len();

        let mut stmt = conn.prepare(&format!("SELECT * FROM {}", relation))?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let mut cells = Vec::with_capacity(width);
            for idx in 0..width {
                cells.push(to_sql_value(row.get::<_, Value>(idx)?));
            }
            table.rows.push(cells);
        }

        debug!(table = name, rows = table.len(), "Relation read");
        Ok(table)
    }
}

#[async_trait]
impl Connector for DuckDBConnector {
    async fn execute(&self, query: &str) -> Result<usize, SalesmartError> {
        let conn = self.lock()?;
        Ok(conn.execute(query, [])?)
    }

    async fn execute_transaction(&self, statements: &[String]) -> Result<(), SalesmartError> {
        let mut conn = self.lock()?;
        // Dropping an uncommitted transaction rolls it back.
        let tx = conn.transaction()?;
        for statement in statements {
            debug!(sql = %statement, "DDL");
            tx.execute_batch(statement)?;
        }
        tx.commit()?;
        Ok(())
    }

    async fn fetch_columns(&self, table_name: &str) -> Result<Vec<ColumnSchema>, SalesmartError> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(&format!("PRAGMA table_info('{}')", table_name))?;
        let rows = stmt.query_map([], |row| {
            Ok(ColumnSchema {
                name: row.get("name")?,
                data_type: row.get("type")?,
                is_nullable: !row.get::<_, bool>("notnull")?,
            })
        })?;

        let mut columns = Vec::new();
        for row in rows {
            columns.push(row?);
        }

        Ok(columns)
    }

    async fn query_column(&self, query: &str) -> Result<Vec<SqlValue>, SalesmartError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(query)?;
        let mut rows = stmt.query([])?;

        let mut values = Vec::new();
        while let Some(row) = rows.next()? {
            values.push(to_sql_value(row.get::<_, Value>(0)?));
        }
        Ok(values)
    }

    async fn query_scalar(&self, query: &str) -> Result<u64, SalesmartError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(query)?;
        let mut rows = stmt.query([])?;

        let row = rows.next()?.ok_or_else(|| {
            SalesmartError::Infrastructure(InfrastructureError::Database(
                DatabaseError::EmptyResult(query.to_string()),
            ))
        })?;

        let value: i64 = row.get(0)?;
        u64::try_from(value).map_err(|_| {
            SalesmartError::InternalError(format!("Negative scalar {} from '{}'", value, query))
        })
    }

    fn engine_name(&self) -> &str {
        "duckdb"
    }
}

/// Engine value to store-independent cell. Nested types fall back to their debug text.
pub fn to_sql_value(value: Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Boolean(b) => SqlValue::Boolean(b),
        Value::TinyInt(i) => SqlValue::Integer(i64::from(i)),
        Value::SmallInt(i) => SqlValue::Integer(i64::from(i)),
        Value::Int(i) => SqlValue::Integer(i64::from(i)),
        Value::BigInt(i) => SqlValue::Integer(i),
        Value::UTinyInt(i) => SqlValue::Integer(i64::from(i)),
        Value::USmallInt(i) => SqlValue::Integer(i64::from(i)),
        Value::UInt(i) => SqlValue::Integer(i64::from(i)),
        Value::UBigInt(i) => i64::try_from(i)
            .map(SqlValue::Integer)
            .unwrap_or_else(|_| SqlValue::Text(i.to_string())),
        Value::HugeInt(i) => i64::try_from(i)
            .map(SqlValue::Integer)
            .unwrap_or_else(|_| SqlValue::Text(i.to_string())),
        Value::Float(f) => Decimal::try_from(f).map_or(SqlValue::Null, SqlValue::Decimal),
        Value::Double(f) => Decimal::try_from(f).map_or(SqlValue::Null, SqlValue::Decimal),
        Value::Decimal(d) => SqlValue::Decimal(d),
        Value::Text(s) | Value::Enum(s) => SqlValue::Text(s),
        Value::Date32(days) => days
            .checked_add(UNIX_EPOCH_CE_DAYS)
            .and_then(NaiveDate::from_num_days_from_ce_opt)
            .map_or(SqlValue::Null, SqlValue::Date),
        Value::Timestamp(unit, raw) => {
            timestamp_from(unit, raw).map_or(SqlValue::Null, SqlValue::Timestamp)
        }
        other => SqlValue::Text(format!("{:?}", other)),
    }
}

fn timestamp_from(unit: TimeUnit, raw: i64) -> Option<NaiveDateTime> {
    let micros = match unit {
        TimeUnit::Second => raw.checked_mul(1_000_000)?,
        TimeUnit::Millisecond => raw.checked_mul(1_000)?,
        TimeUnit::Microsecond => raw,
        TimeUnit::Nanosecond => raw / 1_000,
    };
    DateTime::from_timestamp_micros(micros).map(|dt| dt.naive_utc())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[tokio::test]
    async fn test_duckdb_flow() -> Result<()> {
        let connector = DuckDBConnector::new(":memory:")?;

        connector
            .execute("CREATE TABLE users (id INTEGER, name VARCHAR)")
            .await?;

        let columns = connector.fetch_columns("users").await?;
        assert_eq!(columns.len(), 2);

        let name_col = columns
            .iter()
            .find(|c| c.name == "name")
            .ok_or_else(|| anyhow::anyhow!("Column 'name' not found"))?;
        assert_eq!(name_col.data_type, "VARCHAR");

        let inserted = connector
            .execute("INSERT INTO users VALUES (1, 'ann'), (2, 'bob')")
            .await?;
        assert_eq!(inserted, 2);
        assert_eq!(connector.query_scalar("SELECT COUNT(*) FROM users").await?, 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_duckdb_error() -> Result<()> {
        let connector = DuckDBConnector::new(":memory:")?;
        let result = connector.execute("SELECT * FROM non_existent_table").await;
        assert!(result.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_transaction_rolls_back() -> Result<()> {
        let connector = DuckDBConnector::new(":memory:")?;
        connector.execute("CREATE TABLE kept (id INTEGER)").await?;

        let statements = vec![
            "DROP TABLE IF EXISTS kept".to_string(),
            "CREATE TABLE broken (id NOT_A_TYPE)".to_string(),
        ];
        assert!(connector.execute_transaction(&statements).await.is_err());

        // The drop was undone with the failed create.
        assert_eq!(connector.fetch_columns("kept").await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_query_column_converts_values() -> Result<()> {
        let connector = DuckDBConnector::new(":memory:")?;
        let values = connector
            .query_column(
                "SELECT * FROM (VALUES (1), (NULL)) t(x) ORDER BY x NULLS LAST",
            )
            .await?;
        assert_eq!(values, vec![SqlValue::Integer(1), SqlValue::Null]);

        let dates = connector
            .query_column("SELECT DATE '2024-03-05'")
            .await?;
        assert_eq!(
            dates,
            vec![SqlValue::Date(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap())]
        );
        Ok(())
    }

    #[test]
    fn test_read_table_keeps_column_names() -> Result<()> {
        let connector = DuckDBConnector::new(":memory:")?;
        connector.execute_batch(
            "CREATE TABLE customers (customer_id INTEGER, City VARCHAR);
             INSERT INTO customers VALUES (1, 'Paris'), (2, NULL);",
        )?;

        let table = connector.read_table("customers", "customers")?;
        assert_eq!(table.columns, vec!["customer_id", "City"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[1][1], SqlValue::Null);
        Ok(())
    }

    #[test]
    fn test_timestamp_units() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(
            timestamp_from(TimeUnit::Second, 1_704_067_200),
            Some(expected)
        );
        assert_eq!(
            timestamp_from(TimeUnit::Nanosecond, 1_704_067_200_000_000_000),
            Some(expected)
        );
    }
}
