// salesmart-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Source table '{table}' has no column '{column}'")]
    #[diagnostic(
        code(salesmart::domain::missing_column),
        help("The extractor must return the source column names unchanged.")
    )]
    MissingColumn { table: String, column: String },

    #[error("Invalid key in '{table}' row {row}: column '{column}' = {value}")]
    #[diagnostic(
        code(salesmart::domain::invalid_key),
        help("Primary keys must be present and convertible to the warehouse type.")
    )]
    InvalidKey {
        table: String,
        row: usize,
        column: String,
        value: String,
    },

    #[error("Row width mismatch in '{table}' row {row}: expected {expected} values, got {actual}")]
    #[diagnostic(code(salesmart::domain::row_width))]
    RowWidth {
        table: String,
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Row count mismatch on '{table}': expected {expected}, found {actual}")]
    #[diagnostic(
        code(salesmart::domain::verification),
        help("The destination accepted a different number of rows than was sent.")
    )]
    VerificationFailed {
        table: String,
        expected: u64,
        actual: u64,
    },

    #[error("Schema Error: {0}")]
    #[diagnostic(code(salesmart::domain::schema))]
    SchemaError(String),
}
