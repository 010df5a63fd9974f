// salesmart-core/src/infrastructure/adapters/memory.rs

use async_trait::async_trait;

use crate::domain::model::RawDataset;
use crate::error::SalesmartError;
use crate::ports::extractor::Extractor;

/// Extractor over rows already held in memory. Used for fixtures and embedding.
#[derive(Debug, Clone)]
pub struct InMemoryExtractor {
    dataset: RawDataset,
}

impl InMemoryExtractor {
    pub fn new(dataset: RawDataset) -> Self {
        Self { dataset }
    }
}

#[async_trait]
impl Extractor for InMemoryExtractor {
    async fn extract(&self) -> Result<RawDataset, SalesmartError> {
        Ok(self.dataset.clone())
    }

    fn source_name(&self) -> String {
        "memory".to_string()
    }
}
