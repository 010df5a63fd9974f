// salesmart-core/src/application/loader.rs

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::application::schema_manager::SchemaManager;
use crate::application::validation::{TableCounts, verify_counts, verify_schema};
use crate::domain::error::DomainError;
use crate::domain::integrity::{DimensionKeys, IntegrityReport, ReferentialFilter};
use crate::domain::model::CleanDataset;
use crate::domain::warehouse::{DIM_CUSTOMERS, DIM_PRODUCTS, WarehouseRow, WarehouseSchema};
use crate::domain::project::LoadConfig;
use crate::error::{SalesmartError, Stage, StageContext};
use crate::ports::connector::Connector;

/// Outcome of the fact insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FactLoad {
    Loaded { rows: u64 },
    /// Every fact row was excluded. Not an error, but almost always an upstream defect.
    NoValidRows,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub integrity: IntegrityReport,
    pub fact_load: FactLoad,
    /// Counts read back from the destination after the load.
    pub counts: TableCounts,
}

pub struct Loader {
    config: LoadConfig,
}

impl Loader {
    pub fn new(config: LoadConfig) -> Self {
        Self { config }
    }

    /// Full reload of the warehouse from a cleaned dataset.
    ///
    /// Stops at the first failing step. Dimension rows already inserted stay in place.
    #[instrument(skip_all, fields(engine = connector.engine_name(), chunk_size = self.config.chunk_size))]
    pub async fn load(
        &self,
        connector: &dyn Connector,
        dataset: CleanDataset,
    ) -> Result<LoadReport, SalesmartError> {
        SchemaManager::recreate(connector)
            .await
            .stage(Stage::Schema)?;

        let customers = self
            .insert_rows(connector, &dataset.customers)
            .await
            .stage(Stage::LoadCustomers)?;
        let products = self
            .insert_rows(connector, &dataset.products)
            .await
            .stage(Stage::LoadProducts)?;

        let keys = read_dimension_keys(connector)
            .await
            .stage(Stage::ReadKeys)?;

        let filter = ReferentialFilter::new(self.config.sample_size);
        let (valid, integrity) = filter.partition(&keys, dataset.orders);
        log_integrity(&integrity);

        let fact_load = if valid.is_empty() {
            warn!(total = integrity.total, "No fact row passed referential integrity");
            FactLoad::NoValidRows
        } else {
            let rows = self
                .insert_rows(connector, &valid)
                .await
                .stage(Stage::LoadFacts)?;
            FactLoad::Loaded { rows }
        };

        let expected = TableCounts {
            customers,
            products,
            facts: match fact_load {
                FactLoad::Loaded { rows } => rows,
                FactLoad::NoValidRows => 0,
            },
        };
        let counts = async {
            for table in WarehouseSchema::CREATE_ORDER {
                verify_schema(connector, table).await?;
            }
            verify_counts(connector, expected).await
        }
        .await
        .stage(Stage::Verify)?;

        Ok(LoadReport {
            integrity,
            fact_load,
            counts,
        })
    }

    /// Chunked multi-row insert. An empty slice issues no statement.
    /// Fails at the first chunk whose affected-row count differs from its size.
    async fn insert_rows<R: WarehouseRow>(
        &self,
        connector: &dyn Connector,
        rows: &[R],
    ) -> Result<u64, SalesmartError> {
        let table = R::table();
        let mut inserted = 0u64;

        for (idx, chunk) in rows.chunks(self.config.chunk_size.max(1)).enumerate() {
            let values: Vec<_> = chunk.iter().map(|row| row.values()).collect();
            let statement = table.insert_statement(&values)?;
            let affected = connector.execute(&statement).await? as u64;
            if affected != chunk.len() as u64 {
                return Err(DomainError::VerificationFailed {
                    table: table.name.to_string(),
                    expected: chunk.len() as u64,
                    actual: affected,
                }
                .into());
            }
            debug!(table = table.name, chunk = idx, rows = affected, "Chunk inserted");
            inserted += affected;
        }

        info!(table = table.name, rows = inserted, "Table loaded");
        Ok(inserted)
    }
}

/// Primary keys as committed in the destination, not as sent.
async fn read_dimension_keys(connector: &dyn Connector) -> Result<DimensionKeys, SalesmartError> {
    let customers = connector
        .query_column(&DIM_CUSTOMERS.key_statement())
        .await?
        .iter()
        .filter_map(|v| v.as_integer())
        .collect();
    let products = connector
        .query_column(&DIM_PRODUCTS.key_statement())
        .await?
        .iter()
        .filter_map(|v| v.as_text())
        .collect();

    Ok(DimensionKeys {
        customers,
        products,
    })
}

fn log_integrity(report: &IntegrityReport) {
    for violations in [&report.customer, &report.product] {
        if violations.count > 0 {
            warn!(
                reference = ?violations.reference,
                count = violations.count,
                samples = ?violations.samples,
                "Fact rows with unresolved reference excluded"
            );
        }
    }
    info!(
        total = report.total,
        valid = report.valid,
        excluded = report.excluded,
        "Referential integrity checked"
    );
}
