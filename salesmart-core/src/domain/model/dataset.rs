// salesmart-core/src/domain/model/dataset.rs

use std::collections::HashSet;

use serde::Serialize;

use super::value::SqlValue;
use crate::domain::error::DomainError;

/// A source table as read by an extractor: column names preserved, no typing.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RawTable {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<SqlValue>>,
}

impl RawTable {
    pub fn new<S: Into<String>>(name: &str, columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.to_string(),
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn with_row(mut self, row: Vec<SqlValue>) -> Self {
        self.rows.push(row);
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of `column`, exact match first, then case-insensitive.
    pub fn column_index(&self, column: &str) -> Result<usize, DomainError> {
        self.columns
            .iter()
            .position(|c| c == column)
            .or_else(|| {
                self.columns
                    .iter()
                    .position(|c| c.eq_ignore_ascii_case(column))
            })
            .ok_or_else(|| DomainError::MissingColumn {
                table: self.name.clone(),
                column: column.to_string(),
            })
    }

    /// Drops exact duplicate rows, keeping the first occurrence.
    /// Returns the number of rows removed.
    pub fn dedup_rows(&mut self) -> usize {
        let before = self.rows.len();
        let mut seen: HashSet<Vec<SqlValue>> = HashSet::with_capacity(before);
        self.rows.retain(|row| seen.insert(row.clone()));
        before - self.rows.len()
    }

    /// Fails on rows whose width differs from the header.
    pub fn check_width(&self) -> Result<(), DomainError> {
        let expected = self.columns.len();
        match self.rows.iter().position(|r| r.len() != expected) {
            Some(row) => Err(DomainError::RowWidth {
                table: self.name.clone(),
                row,
                expected,
                actual: self.rows[row].len(),
            }),
            None => Ok(()),
        }
    }
}

/// The three row-sets produced by one extraction.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RawDataset {
    pub customers: RawTable,
    pub orders: RawTable,
    pub products: RawTable,
}
