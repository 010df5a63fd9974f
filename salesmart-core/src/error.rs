// salesmart-core/src/error.rs

use std::fmt;

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use serde::Serialize;
use thiserror::Error;

/// Pipeline stage a fatal error is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Extract,
    Transform,
    Schema,
    LoadCustomers,
    LoadProducts,
    ReadKeys,
    LoadFacts,
    Verify,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Extract => "extract",
            Stage::Transform => "transform",
            Stage::Schema => "schema",
            Stage::LoadCustomers => "load_customers",
            Stage::LoadProducts => "load_products",
            Stage::ReadKeys => "read_keys",
            Stage::LoadFacts => "load_facts",
            Stage::Verify => "verify",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum SalesmartError {
    // --- DOMAIN ERRORS (cleaning, schema, verification) ---
    #[error(transparent)]
    Domain(#[from] DomainError),

    // --- INFRASTRUCTURE ERRORS (DB, IO, config) ---
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    // --- STAGE FAILURE (root cause kept as source) ---
    #[error("Stage '{stage}' failed: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: Box<SalesmartError>,
    },

    #[error("Internal Error: {0}")]
    InternalError(String),

    #[error("Unsafe path traversal detected: {0}")]
    UnsafePath(String),
}

impl SalesmartError {
    /// Stage the error was raised in, if it was attributed to one.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            SalesmartError::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Innermost error, skipping stage wrappers.
    pub fn root(&self) -> &SalesmartError {
        match self {
            SalesmartError::Stage { source, .. } => source.root(),
            other => other,
        }
    }
}

impl From<std::io::Error> for SalesmartError {
    fn from(err: std::io::Error) -> Self {
        SalesmartError::Infrastructure(InfrastructureError::Io(err))
    }
}

impl From<duckdb::Error> for SalesmartError {
    fn from(err: duckdb::Error) -> Self {
        SalesmartError::Infrastructure(InfrastructureError::from(err))
    }
}

/// Attaches the failing stage to any error convertible into `SalesmartError`.
pub trait StageContext<T> {
    fn stage(self, stage: Stage) -> Result<T, SalesmartError>;
}

impl<T, E> StageContext<T> for Result<T, E>
where
    E: Into<SalesmartError>,
{
    fn stage(self, stage: Stage) -> Result<T, SalesmartError> {
        self.map_err(|e| SalesmartError::Stage {
            stage,
            source: Box::new(e.into()),
        })
    }
}
