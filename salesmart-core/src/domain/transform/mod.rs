// salesmart-core/src/domain/transform/mod.rs
//
// Cleaning and enrichment of the three extracted row-sets.
// Pure: no I/O, each row-set is handled independently.

pub mod customers;
pub mod dates;
pub mod orders;
pub mod products;

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, instrument};

use crate::domain::error::DomainError;
use crate::domain::model::{CleanDataset, RawDataset, RawTable, SqlValue};

pub use customers::UNKNOWN;
pub use products::{FALLBACK_DIVISION, SUGAR_DIVISION, SUGAR_FACTORY, division_for_factory};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableStats {
    pub input_rows: usize,
    pub duplicates_removed: usize,
    pub output_rows: usize,
}

/// What the transformer repaired, for callers to inspect without parsing logs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransformReport {
    pub customers: TableStats,
    pub products: TableStats,
    pub orders: TableStats,
    /// `table.column` -> number of nulls replaced with "Unknown".
    pub unknown_fills: BTreeMap<String, usize>,
    pub divisions_derived: usize,
    pub unit_prices_imputed: usize,
    pub imputed_unit_price: Option<Decimal>,
    /// Non-null `order_date` values that could not be parsed.
    pub unparseable_dates: usize,
    pub orders_without_month: usize,
}

impl TransformReport {
    pub fn total_unknown_fills(&self) -> usize {
        self.unknown_fills.values().sum()
    }

    fn record_fill(&mut self, table: &str, column: &str) {
        *self
            .unknown_fills
            .entry(format!("{}.{}", table, column))
            .or_default() += 1;
    }
}

pub struct Transformer;

impl Transformer {
    /// Cleans customers, orders and products. Returns the three row-sets
    /// in the same arity plus a report of every recovered condition.
    #[instrument(skip_all, fields(
        customers = raw.customers.len(),
        orders = raw.orders.len(),
        products = raw.products.len()
    ))]
    pub fn transform(raw: RawDataset) -> Result<(CleanDataset, TransformReport), DomainError> {
        let mut report = TransformReport::default();

        let customers = customers::clean_customers(raw.customers, &mut report)?;
        let orders = orders::clean_orders(raw.orders, &mut report)?;
        let products = products::clean_products(raw.products, &mut report)?;

        info!(
            customers = customers.len(),
            orders = orders.len(),
            products = products.len(),
            unknown_fills = report.total_unknown_fills(),
            divisions_derived = report.divisions_derived,
            unit_prices_imputed = report.unit_prices_imputed,
            unparseable_dates = report.unparseable_dates,
            "Transformation complete"
        );

        Ok((
            CleanDataset {
                customers,
                orders,
                products,
            },
            report,
        ))
    }
}

// --- SHARED HELPERS ---

/// Width check, then exact-duplicate removal.
fn prepare(table: &mut RawTable) -> Result<TableStats, DomainError> {
    table.check_width()?;
    let input_rows = table.len();
    let duplicates_removed = table.dedup_rows();
    Ok(TableStats {
        input_rows,
        duplicates_removed,
        output_rows: table.len(),
    })
}

fn resolve_columns<const N: usize>(
    table: &RawTable,
    names: [&str; N],
) -> Result<[usize; N], DomainError> {
    let mut indices = [0usize; N];
    for (slot, name) in indices.iter_mut().zip(names) {
        *slot = table.column_index(name)?;
    }
    Ok(indices)
}

fn cell(row: &[SqlValue], index: usize) -> &SqlValue {
    row.get(index).unwrap_or(&SqlValue::Null)
}

fn invalid_key(table: &RawTable, row: usize, column: &str, value: &SqlValue) -> DomainError {
    DomainError::InvalidKey {
        table: table.name.clone(),
        row,
        column: column.to_string(),
        value: value.to_string(),
    }
}
