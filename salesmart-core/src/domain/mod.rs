pub mod error;
pub mod integrity;
pub mod model;
pub mod project;
pub mod transform;
pub mod warehouse;

// Re-exports to keep imports short elsewhere
pub use error::DomainError;
