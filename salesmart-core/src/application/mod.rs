// salesmart-core/src/application/mod.rs

pub mod clean;
pub mod loader;
pub mod pipeline;
pub mod schema_manager;
pub mod validation;

// --- RE-EXPORTS (FACADE) ---
// `use salesmart_core::application::{run_pipeline, clean_project};`

pub use clean::clean_project;
pub use loader::{FactLoad, LoadReport, Loader};
pub use pipeline::{RUN_RESULTS_FILE, RunResult, run_pipeline, save_run_results};
pub use schema_manager::SchemaManager;
pub use validation::{TableCounts, verify_counts, verify_schema};
