// salesmart-core/src/ports/mod.rs

pub mod connector;
pub mod extractor;

pub use connector::{ColumnSchema, Connector};
pub use extractor::Extractor;
