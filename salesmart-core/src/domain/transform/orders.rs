// salesmart-core/src/domain/transform/orders.rs

use std::collections::{HashMap, HashSet};

use chrono::Datelike;
use tracing::{debug, warn};

use super::dates::parse_date;
use super::{TransformReport, cell, invalid_key, prepare, resolve_columns};
use crate::domain::error::DomainError;
use crate::domain::model::{FactOrder, ORDER_COLUMNS, RawTable};

pub(crate) fn clean_orders(
    mut table: RawTable,
    report: &mut TransformReport,
) -> Result<Vec<FactOrder>, DomainError> {
    let mut stats = prepare(&mut table)?;
    let [tx, customer, order, date, product, units] = resolve_columns(&table, ORDER_COLUMNS)?;

    let mut orders = Vec::with_capacity(table.len());
    for (i, row) in table.rows.iter().enumerate() {
        let transaction_id = cell(row, tx)
            .as_text()
            .ok_or_else(|| invalid_key(&table, i, "transaction_id", cell(row, tx)))?;

        let raw_date = cell(row, date);
        let order_date = parse_date(raw_date);
        if order_date.is_none() && !raw_date.is_null() {
            report.unparseable_dates += 1;
        }

        orders.push(FactOrder {
            transaction_id,
            customer_id: cell(row, customer).as_integer(),
            order_id: cell(row, order).as_text(),
            order_date,
            product_id: cell(row, product).as_text(),
            units: cell(row, units).as_integer(),
            month: order_date.map(|d| d.month()),
            total_amount_by_month: None,
            total_units_by_customer: None,
            total_orders_by_product: None,
        });
    }

    apply_aggregates(&mut orders);

    report.orders_without_month = orders.iter().filter(|o| o.month.is_none()).count();
    if !orders.is_empty() && report.orders_without_month == orders.len() {
        warn!("No order_date could be parsed, monthly totals are absent for every order");
    }

    stats.output_rows = orders.len();
    debug!(
        input = stats.input_rows,
        duplicates = stats.duplicates_removed,
        unparseable_dates = report.unparseable_dates,
        "Orders cleaned"
    );
    report.orders = stats;
    Ok(orders)
}

/// Group-wise totals over the whole cleaned set. Rows without a group key
/// get no total; missing units count as zero inside a group. Sums saturate
/// at `i64::MAX`.
pub fn apply_aggregates(orders: &mut [FactOrder]) {
    let mut units_by_month: HashMap<u32, i64> = HashMap::new();
    let mut units_by_customer: HashMap<i64, i64> = HashMap::new();
    let mut orders_by_product: HashMap<String, HashSet<String>> = HashMap::new();

    for o in orders.iter() {
        let units = o.units.unwrap_or(0);
        if let Some(month) = o.month {
            let total = units_by_month.entry(month).or_default();
            *total = total.saturating_add(units);
        }
        if let Some(customer_id) = o.customer_id {
            let total = units_by_customer.entry(customer_id).or_default();
            *total = total.saturating_add(units);
        }
        if let Some(product_id) = &o.product_id {
            let distinct = orders_by_product.entry(product_id.clone()).or_default();
            if let Some(order_id) = &o.order_id {
                distinct.insert(order_id.clone());
            }
        }
    }

    for o in orders.iter_mut() {
        o.total_amount_by_month = o.month.and_then(|m| units_by_month.get(&m).copied());
        o.total_units_by_customer = o
            .customer_id
            .and_then(|c| units_by_customer.get(&c).copied());
        o.total_orders_by_product = o
            .product_id
            .as_ref()
            .and_then(|p| orders_by_product.get(p))
            .map(|ids| ids.len() as i64);
    }
}
