// salesmart-core/src/infrastructure/adapters/mod.rs

pub mod duckdb;
pub mod memory;
pub mod source;

pub use self::duckdb::DuckDBConnector;
pub use memory::InMemoryExtractor;
pub use source::DuckDBExtractor;
