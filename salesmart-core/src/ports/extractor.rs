// salesmart-core/src/ports/extractor.rs

use crate::domain::model::RawDataset;
use crate::error::SalesmartError;
use async_trait::async_trait;

/// Source of the three operational row-sets. Reads only, never transforms.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Full read of `customers`, `orders` and `products`.
    async fn extract(&self) -> Result<RawDataset, SalesmartError>;

    /// Human-readable description of the source, for logs.
    fn source_name(&self) -> String;
}
