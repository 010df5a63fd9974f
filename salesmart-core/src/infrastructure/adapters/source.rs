// salesmart-core/src/infrastructure/adapters/source.rs

// Operational source read through an embedded DuckDB: a PostgreSQL database
// via the postgres scanner, another DuckDB file, or a directory of CSV files.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, instrument};

use crate::domain::model::RawDataset;
use crate::error::SalesmartError;
use crate::infrastructure::adapters::duckdb::DuckDBConnector;
use crate::infrastructure::config::connection::SourceConfig;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::extractor::Extractor;

pub const SOURCE_TABLES: [&str; 3] = ["customers", "orders", "products"];

const SOURCE_ALIAS: &str = "source";

enum Layout {
    /// Tables live in an attached catalog, under `schema`.
    Attached { schema: String },
    /// One `<table>.csv` per source table.
    CsvDir(PathBuf),
}

pub struct DuckDBExtractor {
    engine: DuckDBConnector,
    setup: Vec<String>,
    /// Set once `setup` has run on `engine`.
    attached: AtomicBool,
    layout: Layout,
    description: String,
}

impl DuckDBExtractor {
    pub fn postgres(
        host: &str,
        port: u16,
        user: &str,
        password: &str,
        database: &str,
        schema: &str,
    ) -> Result<Self, InfrastructureError> {
        let dsn = pg_dsn(host, port, user, password, database);
        Ok(Self {
            engine: DuckDBConnector::new(":memory:")?,
            setup: vec![
                "INSTALL postgres".to_string(),
                "LOAD postgres".to_string(),
                format!(
                    "ATTACH IF NOT EXISTS {} AS {} (TYPE POSTGRES, READ_ONLY)",
                    sql_string(&dsn),
                    SOURCE_ALIAS
                ),
            ],
            attached: AtomicBool::new(false),
            layout: Layout::Attached {
                schema: schema.to_string(),
            },
            // Never log the password.
            description: format!("postgres://{}@{}:{}/{}", user, host, port, database),
        })
    }

    pub fn duckdb_file(path: &Path) -> Result<Self, InfrastructureError> {
        Ok(Self {
            engine: DuckDBConnector::new(":memory:")?,
            setup: vec![format!(
                "ATTACH IF NOT EXISTS {} AS {} (READ_ONLY)",
                sql_string(&path.to_string_lossy()),
                SOURCE_ALIAS
            )],
            attached: AtomicBool::new(false),
            layout: Layout::Attached {
                schema: "main".to_string(),
            },
            description: format!("duckdb://{}", path.display()),
        })
    }

    pub fn csv_dir(dir: &Path) -> Result<Self, InfrastructureError> {
        if !dir.is_dir() {
            return Err(InfrastructureError::ConfigError(format!(
                "CSV source directory {:?} does not exist",
                dir
            )));
        }
        Ok(Self {
            engine: DuckDBConnector::new(":memory:")?,
            setup: Vec::new(),
            attached: AtomicBool::new(true),
            layout: Layout::CsvDir(dir.to_path_buf()),
            description: format!("csv://{}", dir.display()),
        })
    }

    /// Builds the extractor for a configured source. Relative paths resolve against `base_dir`.
    pub fn from_config(source: &SourceConfig, base_dir: &Path) -> Result<Self, InfrastructureError> {
        match source {
            SourceConfig::Postgres {
                host,
                port,
                user,
                password,
                database,
                schema,
            } => Self::postgres(host, *port, user, password, database, schema),
            SourceConfig::Duckdb { path } => Self::duckdb_file(&base_dir.join(path)),
            SourceConfig::Csv { dir } => Self::csv_dir(&base_dir.join(dir)),
        }
    }

    fn attach(&self) -> Result<(), SalesmartError> {
        if self.attached.load(Ordering::Acquire) {
            return Ok(());
        }
        for statement in &self.setup {
            self.engine.execute_batch(statement)?;
        }
        self.attached.store(true, Ordering::Release);
        Ok(())
    }

    fn relation(&self, table: &str) -> String {
        match &self.layout {
            Layout::Attached { schema } => format!("{}.{}.{}", SOURCE_ALIAS, schema, table),
            Layout::CsvDir(dir) => format!(
                "read_csv_auto({})",
                sql_string(&dir.join(format!("{}.csv", table)).to_string_lossy())
            ),
        }
    }
}

#[async_trait]
impl Extractor for DuckDBExtractor {
    #[instrument(skip(self), fields(source = %self.description))]
    async fn extract(&self) -> Result<RawDataset, SalesmartError> {
        self.attach()?;

        let [customers, orders, products] =
            SOURCE_TABLES.map(|table| self.engine.read_table(table, &self.relation(table)));
        let dataset = RawDataset {
            customers: customers?,
            orders: orders?,
            products: products?,
        };

        info!(
            customers = dataset.customers.len(),
            orders = dataset.orders.len(),
            products = dataset.products.len(),
            "Source extracted"
        );
        Ok(dataset)
    }

    fn source_name(&self) -> String {
        self.description.clone()
    }
}

fn sql_string(raw: &str) -> String {
    format!("'{}'", raw.replace('\'', "''"))
}

/// libpq key/value connection string, every value single-quoted.
fn pg_dsn(host: &str, port: u16, user: &str, password: &str, database: &str) -> String {
    format!(
        "host={} port={} user={} password={} dbname={}",
        libpq_value(host),
        port,
        libpq_value(user),
        libpq_value(password),
        libpq_value(database)
    )
}

fn libpq_value(raw: &str) -> String {
    format!("'{}'", raw.replace('\\', "\\\\").replace('\'', "\\'"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::model::SqlValue;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    fn write_csv_fixture(dir: &Path) -> Result<()> {
        fs::write(
            dir.join("customers.csv"),
            "customer_id,city,state_province,country,region\n1,Paris,IDF,France,Europe\n2,Lyon,ARA,France,\n",
        )?;
        fs::write(
            dir.join("products.csv"),
            "product_id,product_name,factory,division,unit_price\nP1,Fudge,Sugar Shack,,3.50\n",
        )?;
        fs::write(
            dir.join("orders.csv"),
            "transaction_id,customer_id,order_id,order_date,product_id,units\nT1,1,O1,2024-01-15,P1,4\n",
        )?;
        Ok(())
    }

    #[tokio::test]
    async fn test_csv_extraction() -> Result<()> {
        let dir = tempdir()?;
        write_csv_fixture(dir.path())?;

        let extractor = DuckDBExtractor::csv_dir(dir.path())?;
        let dataset = extractor.extract().await?;

        assert_eq!(dataset.customers.len(), 2);
        assert_eq!(dataset.products.len(), 1);
        assert_eq!(dataset.orders.columns[0], "transaction_id");
        // Empty CSV field is read as NULL.
        let region = dataset.customers.column_index("region")?;
        assert_eq!(dataset.customers.rows[1][region], SqlValue::Null);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_source_table_fails() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("customers.csv"), "customer_id\n1\n")?;

        let extractor = DuckDBExtractor::csv_dir(dir.path())?;
        assert!(extractor.extract().await.is_err());
        Ok(())
    }

    #[test]
    fn test_missing_csv_dir_is_config_error() {
        let err = DuckDBExtractor::csv_dir(Path::new("/definitely/not/here")).err();
        assert!(matches!(err, Some(InfrastructureError::ConfigError(_))));
    }

    #[test]
    fn test_postgres_description_hides_password() -> Result<()> {
        let extractor =
            DuckDBExtractor::postgres("db.local", 5432, "etl", "s3cr'et", "sales", "public")?;
        assert_eq!(extractor.source_name(), "postgres://etl@db.local:5432/sales");
        // libpq escapes the quote with a backslash, the SQL literal then doubles it.
        assert!(extractor.setup[2].contains(r"password=''s3cr\''et''"));
        assert_eq!(extractor.relation("orders"), "source.public.orders");
        Ok(())
    }

    #[test]
    fn test_dsn_quotes_every_value() {
        let dsn = pg_dsn("db.local", 5433, "etl user", r"pass wo'rd\x", "sales");
        assert_eq!(
            dsn,
            r"host='db.local' port=5433 user='etl user' password='pass wo\'rd\\x' dbname='sales'"
        );
    }

    #[tokio::test]
    async fn test_duckdb_file_source_extracts_twice() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("operational.duckdb");
        {
            let seed = DuckDBConnector::new(&path.to_string_lossy())?;
            seed.execute_batch(
                "CREATE TABLE customers (customer_id INTEGER, city VARCHAR, state_province VARCHAR, country VARCHAR, region VARCHAR);
                 CREATE TABLE products (product_id VARCHAR, product_name VARCHAR, factory VARCHAR, division VARCHAR, unit_price DECIMAL(10, 2));
                 CREATE TABLE orders (transaction_id VARCHAR, customer_id INTEGER, order_id VARCHAR, order_date DATE, product_id VARCHAR, units INTEGER);
                 INSERT INTO customers VALUES (1, 'Paris', 'IDF', 'France', 'Europe');
                 INSERT INTO products VALUES ('P1', 'Fudge', 'Sugar Shack', 'Sugar', 3.50);
                 INSERT INTO orders VALUES ('T1', 1, 'O1', DATE '2024-01-15', 'P1', 4), ('T2', 1, 'O2', DATE '2024-02-01', 'P1', 2);",
            )?;
        }

        let extractor = DuckDBExtractor::duckdb_file(&path)?;
        let first = extractor.extract().await?;
        let second = extractor.extract().await?;

        assert_eq!(first.orders.len(), 2);
        assert_eq!(second.customers.len(), first.customers.len());
        assert_eq!(second.products.len(), first.products.len());
        assert_eq!(second.orders.len(), first.orders.len());
        Ok(())
    }
}
