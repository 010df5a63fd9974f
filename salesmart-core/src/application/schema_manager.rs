// salesmart-core/src/application/schema_manager.rs

use tracing::{info, instrument};

use crate::application::validation::verify_schema;
use crate::domain::warehouse::WarehouseSchema;
use crate::error::SalesmartError;
use crate::ports::connector::Connector;

pub struct SchemaManager;

impl SchemaManager {
    /// Leaves the destination with exactly the three warehouse tables, empty.
    /// Drops and creates commit together; on failure nothing is retried.
    #[instrument(skip(connector), fields(engine = connector.engine_name()))]
    pub async fn recreate(connector: &dyn Connector) -> Result<(), SalesmartError> {
        let statements = WarehouseSchema::recreate_statements();
        connector.execute_transaction(&statements).await?;
        info!(statements = statements.len(), "Warehouse schema recreated");

        for table in WarehouseSchema::CREATE_ORDER {
            verify_schema(connector, table).await?;
        }
        Ok(())
    }
}
