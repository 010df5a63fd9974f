// salesmart-core/src/domain/integrity.rs
//
// Partition of fact rows against the dimension keys present in the warehouse.

use std::collections::HashSet;

use serde::Serialize;

use crate::domain::model::FactOrder;

/// Original scripts printed the first ten offenders.
pub const DEFAULT_SAMPLE_SIZE: usize = 10;

/// Primary keys read back from the destination dimensions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DimensionKeys {
    pub customers: HashSet<i64>,
    pub products: HashSet<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reference {
    Customer,
    Product,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViolationSample {
    pub transaction_id: String,
    /// Offending key as text, `None` when the fact row had no key at all.
    pub key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceViolations {
    pub reference: Reference,
    pub count: usize,
    pub samples: Vec<ViolationSample>,
}

impl ReferenceViolations {
    fn new(reference: Reference) -> Self {
        Self {
            reference,
            count: 0,
            samples: Vec::new(),
        }
    }

    fn record(&mut self, sample_size: usize, transaction_id: &str, key: Option<String>) {
        self.count += 1;
        if self.samples.len() < sample_size {
            self.samples.push(ViolationSample {
                transaction_id: transaction_id.to_string(),
                key,
            });
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrityReport {
    pub total: usize,
    pub valid: usize,
    /// Distinct excluded rows. A row breaking both references counts once here.
    pub excluded: usize,
    pub customer: ReferenceViolations,
    pub product: ReferenceViolations,
}

impl IntegrityReport {
    pub fn has_violations(&self) -> bool {
        self.excluded > 0
    }

    /// No fact row survived. Likely an upstream cleaning or key-mapping defect.
    pub fn no_valid_rows(&self) -> bool {
        self.valid == 0
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ReferentialFilter {
    sample_size: usize,
}

impl Default for ReferentialFilter {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_SIZE)
    }
}

impl ReferentialFilter {
    pub fn new(sample_size: usize) -> Self {
        Self { sample_size }
    }

    /// Splits `facts` into rows whose customer and product both resolve,
    /// and a report of the rest. Never fails.
    pub fn partition(
        &self,
        keys: &DimensionKeys,
        facts: Vec<FactOrder>,
    ) -> (Vec<FactOrder>, IntegrityReport) {
        let total = facts.len();
        let mut customer = ReferenceViolations::new(Reference::Customer);
        let mut product = ReferenceViolations::new(Reference::Product);
        let mut valid = Vec::with_capacity(total);

        for fact in facts {
            let customer_ok = fact
                .customer_id
                .is_some_and(|id| keys.customers.contains(&id));
            let product_ok = fact
                .product_id
                .as_ref()
                .is_some_and(|id| keys.products.contains(id));

            if !customer_ok {
                customer.record(
                    self.sample_size,
                    &fact.transaction_id,
                    fact.customer_id.map(|id| id.to_string()),
                );
            }
            if !product_ok {
                product.record(
                    self.sample_size,
                    &fact.transaction_id,
                    fact.product_id.clone(),
                );
            }
            if customer_ok && product_ok {
                valid.push(fact);
            }
        }

        let report = IntegrityReport {
            total,
            valid: valid.len(),
            excluded: total - valid.len(),
            customer,
            product,
        };
        (valid, report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fact(tx: &str, customer: Option<i64>, product: Option<&str>) -> FactOrder {
        FactOrder {
            transaction_id: tx.to_string(),
            customer_id: customer,
            order_id: Some(format!("o-{}", tx)),
            order_date: None,
            product_id: product.map(str::to_string),
            units: Some(1),
            month: None,
            total_amount_by_month: None,
            total_units_by_customer: None,
            total_orders_by_product: None,
        }
    }

    fn keys() -> DimensionKeys {
        DimensionKeys {
            customers: [1, 2].into_iter().collect(),
            products: ["A".to_string()].into_iter().collect(),
        }
    }

    #[test]
    fn test_unknown_customer_is_excluded_and_counted() {
        let facts = vec![
            fact("t1", Some(1), Some("A")),
            fact("t2", Some(3), Some("A")),
            fact("t3", Some(2), Some("A")),
        ];
        let (valid, report) = ReferentialFilter::default().partition(&keys(), facts);

        assert_eq!(valid.len(), 2);
        assert!(valid.iter().all(|f| f.customer_id != Some(3)));
        assert_eq!(report.excluded, 1);
        assert_eq!(report.customer.count, 1);
        assert_eq!(report.product.count, 0);
        assert_eq!(report.valid, report.total - report.excluded);
        assert_eq!(
            report.customer.samples,
            vec![ViolationSample {
                transaction_id: "t2".into(),
                key: Some("3".into())
            }]
        );
    }

    #[test]
    fn test_double_violation_counted_once_in_total() {
        let facts = vec![
            fact("t1", Some(9), Some("Z")),
            fact("t2", None, Some("A")),
            fact("t3", Some(1), None),
            fact("t4", Some(1), Some("A")),
        ];
        let (valid, report) = ReferentialFilter::default().partition(&keys(), facts);

        assert_eq!(valid.len(), 1);
        assert_eq!(report.excluded, 3);
        assert_eq!(report.customer.count, 2);
        assert_eq!(report.product.count, 2);
        assert_eq!(report.customer.samples[1].key, None);
        assert!(!report.no_valid_rows());
    }

    #[test]
    fn test_samples_are_capped() {
        let facts = (0..25)
            .map(|i| fact(&format!("t{}", i), Some(99), Some("A")))
            .collect();
        let (valid, report) = ReferentialFilter::new(3).partition(&keys(), facts);

        assert!(valid.is_empty());
        assert!(report.no_valid_rows());
        assert_eq!(report.customer.count, 25);
        assert_eq!(report.customer.samples.len(), 3);
    }
}
