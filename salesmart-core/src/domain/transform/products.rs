// salesmart-core/src/domain/transform/products.rs

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{debug, warn};

use super::{TransformReport, UNKNOWN, cell, invalid_key, prepare, resolve_columns};
use crate::domain::error::DomainError;
use crate::domain::model::{PRODUCT_COLUMNS, Product, RawTable};

pub const SUGAR_FACTORY: &str = "Sugar Shack";
pub const SUGAR_DIVISION: &str = "Sugar";
pub const FALLBACK_DIVISION: &str = "Other";

/// Scale of `dim_products.unit_price`.
const PRICE_SCALE: u32 = 2;

/// Division assigned when the source has none.
pub fn division_for_factory(factory: Option<&str>) -> &'static str {
    match factory {
        Some(SUGAR_FACTORY) => SUGAR_DIVISION,
        _ => FALLBACK_DIVISION,
    }
}

/// Product row after decoding, before imputation.
struct PartialProduct {
    product_id: String,
    product_name: Option<String>,
    factory: Option<String>,
    division: Option<String>,
    unit_price: Option<Decimal>,
}

pub(crate) fn clean_products(
    mut table: RawTable,
    report: &mut TransformReport,
) -> Result<Vec<Product>, DomainError> {
    let mut stats = prepare(&mut table)?;
    let [id, name, factory, division, price] = resolve_columns(&table, PRODUCT_COLUMNS)?;

    let mut partials = Vec::with_capacity(table.len());
    for (i, row) in table.rows.iter().enumerate() {
        let product_id = cell(row, id)
            .as_text()
            .ok_or_else(|| invalid_key(&table, i, "product_id", cell(row, id)))?;

        partials.push(PartialProduct {
            product_id,
            product_name: cell(row, name).as_text(),
            factory: cell(row, factory).as_text(),
            // Only the exact empty string counts as missing.
            division: cell(row, division).as_text().filter(|d| !d.is_empty()),
            unit_price: cell(row, price).as_decimal(),
        });
    }

    // Mean over known prices only, taken before any fill.
    let mean_price = mean_known_price(&partials);
    if mean_price.is_none() && partials.iter().any(|p| p.unit_price.is_none()) {
        warn!("No known unit_price to impute from, missing prices default to 0.00");
    }
    let fill_price = mean_price.unwrap_or(Decimal::ZERO);

    let mut products = Vec::with_capacity(partials.len());
    for p in partials {
        let division = match p.division {
            Some(d) => d,
            None => {
                report.divisions_derived += 1;
                division_for_factory(p.factory.as_deref()).to_string()
            }
        };
        let unit_price = match p.unit_price {
            Some(price) => price,
            None => {
                report.unit_prices_imputed += 1;
                fill_price
            }
        };
        let product_name = p.product_name.unwrap_or_else(|| {
            report.record_fill("products", "product_name");
            UNKNOWN.to_string()
        });
        let factory = p.factory.unwrap_or_else(|| {
            report.record_fill("products", "factory");
            UNKNOWN.to_string()
        });

        products.push(Product {
            product_id: p.product_id,
            product_name,
            factory,
            division,
            unit_price,
        });
    }

    if report.unit_prices_imputed > 0 {
        report.imputed_unit_price = Some(fill_price);
    }

    stats.output_rows = products.len();
    debug!(
        input = stats.input_rows,
        duplicates = stats.duplicates_removed,
        divisions_derived = report.divisions_derived,
        prices_imputed = report.unit_prices_imputed,
        "Products cleaned"
    );
    report.products = stats;
    Ok(products)
}

fn mean_known_price(products: &[PartialProduct]) -> Option<Decimal> {
    let known: Vec<Decimal> = products.iter().filter_map(|p| p.unit_price).collect();
    if known.is_empty() {
        return None;
    }
    let sum: Decimal = known.iter().sum();
    let mean = sum / Decimal::from(known.len());
    Some(mean.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero))
}
