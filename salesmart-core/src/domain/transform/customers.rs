// salesmart-core/src/domain/transform/customers.rs

use tracing::debug;

use super::{TransformReport, cell, invalid_key, prepare, resolve_columns};
use crate::domain::error::DomainError;
use crate::domain::model::{CUSTOMER_COLUMNS, Customer, RawTable, SqlValue};

/// Replacement for absent dimension attributes.
pub const UNKNOWN: &str = "Unknown";

pub(crate) fn clean_customers(
    mut table: RawTable,
    report: &mut TransformReport,
) -> Result<Vec<Customer>, DomainError> {
    let mut stats = prepare(&mut table)?;
    let [id, city, state, country, region] = resolve_columns(&table, CUSTOMER_COLUMNS)?;

    let mut customers = Vec::with_capacity(table.len());
    for (i, row) in table.rows.iter().enumerate() {
        let customer_id = cell(row, id)
            .as_integer()
            .ok_or_else(|| invalid_key(&table, i, "customer_id", cell(row, id)))?;

        let mut fill = |column: &str, value: &SqlValue| {
            value.as_text().unwrap_or_else(|| {
                report.record_fill("customers", column);
                UNKNOWN.to_string()
            })
        };

        customers.push(Customer {
            customer_id,
            city: fill("city", cell(row, city)),
            state_province: fill("state_province", cell(row, state)),
            country: fill("country", cell(row, country)),
            region: fill("region", cell(row, region)),
        });
    }

    stats.output_rows = customers.len();
    debug!(
        input = stats.input_rows,
        duplicates = stats.duplicates_removed,
        "Customers cleaned"
    );
    report.customers = stats;
    Ok(customers)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn customers(rows: Vec<Vec<SqlValue>>) -> RawTable {
        rows.into_iter()
            .fold(RawTable::new("customers", CUSTOMER_COLUMNS), RawTable::with_row)
    }

    #[test]
    fn test_missing_region_becomes_unknown() {
        let table = customers(vec![
            vec![
                SqlValue::Integer(1),
                SqlValue::text("Paris"),
                SqlValue::text("IDF"),
                SqlValue::text("France"),
                SqlValue::Null,
            ],
            vec![
                SqlValue::Integer(2),
                SqlValue::text("Austin"),
                SqlValue::text("TX"),
                SqlValue::text("USA"),
                SqlValue::Null,
            ],
        ]);
        let mut report = TransformReport::default();
        let out = clean_customers(table, &mut report).unwrap();

        assert!(out.iter().all(|c| c.region == UNKNOWN));
        assert_eq!(report.unknown_fills.get("customers.region"), Some(&2));
        assert_eq!(out[0].city, "Paris");
    }

    #[test]
    fn test_empty_string_is_not_missing() {
        let table = customers(vec![vec![
            SqlValue::Integer(1),
            SqlValue::text(""),
            SqlValue::Null,
            SqlValue::Null,
            SqlValue::Null,
        ]]);
        let mut report = TransformReport::default();
        let out = clean_customers(table, &mut report).unwrap();

        assert_eq!(out[0].city, "");
        assert_eq!(out[0].country, UNKNOWN);
        assert_eq!(report.total_unknown_fills(), 3);
    }

    #[test]
    fn test_exact_duplicates_removed_but_not_near_duplicates() {
        let row = vec![
            SqlValue::Integer(7),
            SqlValue::text("Oslo"),
            SqlValue::Null,
            SqlValue::text("Norway"),
            SqlValue::text("North"),
        ];
        let mut near = row.clone();
        near[1] = SqlValue::text("Bergen");
        let table = customers(vec![row.clone(), row, near]);

        let mut report = TransformReport::default();
        let out = clean_customers(table, &mut report).unwrap();

        assert_eq!(out.len(), 2);
        assert_eq!(report.customers.input_rows, 3);
        assert_eq!(report.customers.duplicates_removed, 1);
        assert_eq!(report.customers.output_rows, 2);
    }

    #[test]
    fn test_null_customer_id_is_fatal() {
        let table = customers(vec![vec![
            SqlValue::Null,
            SqlValue::text("Rome"),
            SqlValue::Null,
            SqlValue::text("Italy"),
            SqlValue::Null,
        ]]);
        let err = clean_customers(table, &mut TransformReport::default()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidKey { row: 0, .. }));
    }
}
