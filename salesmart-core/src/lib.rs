// salesmart-core/src/lib.rs

#![allow(missing_docs)]
// Memory safety
#![deny(unsafe_code)]
// Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// Performance
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// 1. Ports (Interfaces / Traits)
// Contracts for the source store (Extractor) and the warehouse (Connector).
pub mod ports;

// 2. Domain
// Row model, cleaning rules, warehouse schema, referential integrity.
// Depends on nothing else (no infra, no app).
pub mod domain;

// 3. Infrastructure (Adapters)
// DuckDB adapters, config files, atomic writes.
pub mod infrastructure;

// 4. Application (Use Cases)
// Orchestration: schema manager, loader, pipeline, clean.
pub mod application;

// --- GLOBAL ERROR HANDLING ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
// use salesmart_core::SalesmartError;
pub use error::{SalesmartError, Stage};
