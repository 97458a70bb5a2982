//! Aggregation engine: product, date, and company rollups
//!
//! All functions are pure over a batch slice and rebuild their output
//! from scratch on every call, so they can be pointed at any filtered
//! subset of the loaded batches (by date range, category, or company)
//! and stay consistent with it. Grouping accumulates into a hash map
//! keyed on [`ProductKey`], finalized into a list and sorted once.

use crate::record::{DailyBatch, ProductKey, SalesCategory};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Company grouping tag used when enrichment resolved nothing
pub const UNKNOWN_COMPANY: &str = "Unknown";

/// Rollup of one product across the batch set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductAggregate {
    /// Item name as first seen in the extracts
    pub product: String,
    /// Total units sold
    pub total_quantity: f64,
    /// Total taxable amount
    pub total_amount: f64,
    /// `total_amount / total_quantity`; `None` when no units were sold,
    /// which callers must treat as unknown rather than zero
    pub avg_price: Option<f64>,
    /// Resolved company, when enrichment found one
    pub company: Option<String>,
}

/// Rollup of one extract (one date + category pair)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateAggregate {
    pub date: chrono::NaiveDate,
    pub category: SalesCategory,
    pub total_amount: f64,
    pub total_quantity: f64,
}

/// Rollup of one company with its per-product breakdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyAggregate {
    /// Company name, or [`UNKNOWN_COMPANY`] for unenriched products
    pub company: String,
    pub total_amount: f64,
    pub total_quantity: f64,
    /// Number of distinct products sold under this company
    pub product_count: usize,
    /// The company's products, descending by amount
    pub products: Vec<ProductAggregate>,
}

#[derive(Debug, Default)]
struct ProductAccumulator {
    display_name: String,
    quantity: f64,
    amount: f64,
    company: Option<String>,
}

fn accumulate_products(batches: &[DailyBatch]) -> HashMap<ProductKey, ProductAccumulator> {
    let mut groups: HashMap<ProductKey, ProductAccumulator> = HashMap::new();

    for batch in batches {
        for record in &batch.records {
            let entry = groups.entry(record.product_key()).or_insert_with(|| {
                ProductAccumulator {
                    display_name: record.item_name.trim().to_string(),
                    ..ProductAccumulator::default()
                }
            });
            entry.quantity += record.quantity;
            entry.amount += record.taxable_amount;
            if entry.company.is_none() {
                entry.company = record.company.clone();
            }
        }
    }

    groups
}

fn finalize(acc: ProductAccumulator, keep_company: bool) -> ProductAggregate {
    let avg_price = if acc.quantity > 0.0 {
        Some(acc.amount / acc.quantity)
    } else {
        None
    };

    ProductAggregate {
        product: acc.display_name,
        total_quantity: acc.quantity,
        total_amount: acc.amount,
        avg_price,
        company: if keep_company { acc.company } else { None },
    }
}

fn sort_by_amount_desc(aggregates: &mut [ProductAggregate]) {
    aggregates.sort_by(|a, b| {
        b.total_amount
            .partial_cmp(&a.total_amount)
            .unwrap_or(Ordering::Equal)
    });
}

/// Group all records across all batches by product, descending by amount
pub fn aggregate_by_product(batches: &[DailyBatch]) -> Vec<ProductAggregate> {
    let mut aggregates: Vec<ProductAggregate> = accumulate_products(batches)
        .into_values()
        .map(|acc| finalize(acc, false))
        .collect();
    sort_by_amount_desc(&mut aggregates);
    aggregates
}

/// Same as [`aggregate_by_product`] but annotated with the company tag.
///
/// The company of a product is taken from whichever of its records
/// carries one; under a well-formed catalog a product name maps to at
/// most one company, so any record's tag is the product's tag.
pub fn aggregate_by_product_with_company(batches: &[DailyBatch]) -> Vec<ProductAggregate> {
    let mut aggregates: Vec<ProductAggregate> = accumulate_products(batches)
        .into_values()
        .map(|acc| finalize(acc, true))
        .collect();
    sort_by_amount_desc(&mut aggregates);
    aggregates
}

/// One entry per batch, ascending by date
pub fn aggregate_by_date(batches: &[DailyBatch]) -> Vec<DateAggregate> {
    let mut aggregates: Vec<DateAggregate> = batches
        .iter()
        .map(|batch| DateAggregate {
            date: batch.date,
            category: batch.category,
            total_amount: batch.total_amount,
            total_quantity: batch.total_quantity,
        })
        .collect();
    aggregates.sort_by_key(|a| a.date);
    aggregates
}

/// Group records by resolved company, descending by amount.
///
/// Unenriched records land under the [`UNKNOWN_COMPANY`] tag; each
/// company carries its own per-product breakdown, also descending by
/// amount.
pub fn aggregate_by_company(batches: &[DailyBatch]) -> Vec<CompanyAggregate> {
    let mut per_company: HashMap<String, HashMap<ProductKey, ProductAccumulator>> = HashMap::new();

    for batch in batches {
        for record in &batch.records {
            let company = record
                .company
                .clone()
                .unwrap_or_else(|| UNKNOWN_COMPANY.to_string());
            let entry = per_company
                .entry(company)
                .or_default()
                .entry(record.product_key())
                .or_insert_with(|| ProductAccumulator {
                    display_name: record.item_name.trim().to_string(),
                    ..ProductAccumulator::default()
                });
            entry.quantity += record.quantity;
            entry.amount += record.taxable_amount;
            if entry.company.is_none() {
                entry.company = record.company.clone();
            }
        }
    }

    let mut aggregates: Vec<CompanyAggregate> = per_company
        .into_iter()
        .map(|(company, groups)| {
            let mut products: Vec<ProductAggregate> = groups
                .into_values()
                .map(|acc| finalize(acc, true))
                .collect();
            sort_by_amount_desc(&mut products);

            CompanyAggregate {
                total_amount: products.iter().map(|p| p.total_amount).sum(),
                total_quantity: products.iter().map(|p| p.total_quantity).sum(),
                product_count: products.len(),
                products,
                company,
            }
        })
        .collect();

    aggregates.sort_by(|a, b| {
        b.total_amount
            .partial_cmp(&a.total_amount)
            .unwrap_or(Ordering::Equal)
    });
    aggregates
}

/// Grand total of taxable amounts over the (possibly filtered) batch list
pub fn total_sales(batches: &[DailyBatch]) -> f64 {
    batches.iter().map(|b| b.total_amount).sum()
}

/// Grand total of quantities over the (possibly filtered) batch list
pub fn total_quantity(batches: &[DailyBatch]) -> f64 {
    batches.iter().map(|b| b.total_quantity).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::SalesRecord;
    use chrono::NaiveDate;

    fn record(name: &str, quantity: f64, amount: f64, company: Option<&str>) -> SalesRecord {
        SalesRecord {
            item_code: "2106".to_string(),
            item_name: name.to_string(),
            quantity,
            taxable_amount: amount,
            tax_rate: 12.0,
            company: company.map(str::to_string),
        }
    }

    fn day(d: u32, category: SalesCategory, records: Vec<SalesRecord>) -> DailyBatch {
        DailyBatch::new(
            NaiveDate::from_ymd_opt(2025, 12, d).unwrap(),
            category,
            records,
        )
    }

    fn sample_batches() -> Vec<DailyBatch> {
        vec![
            day(
                1,
                SalesCategory::Ps,
                vec![
                    record("Monaco", 10.0, 1000.0, Some("Parle")),
                    record("Good Day", 5.0, 500.0, Some("Britannia")),
                ],
            ),
            day(
                2,
                SalesCategory::Fs,
                vec![
                    // Same product, different casing: must merge with day 1
                    record("  monaco ", 20.0, 2000.0, Some("Parle")),
                    record("Loose Jaggery", 3.0, 150.0, None),
                ],
            ),
        ]
    }

    #[test]
    fn by_product_merges_normalized_names() {
        let products = aggregate_by_product(&sample_batches());

        assert_eq!(products.len(), 3);
        let monaco = &products[0];
        assert_eq!(monaco.product, "Monaco");
        assert_eq!(monaco.total_quantity, 30.0);
        assert_eq!(monaco.total_amount, 3000.0);
        assert_eq!(monaco.avg_price, Some(100.0));
        // Plain product view carries no company tag
        assert_eq!(monaco.company, None);
    }

    #[test]
    fn by_product_sorts_descending_by_amount() {
        let products = aggregate_by_product(&sample_batches());
        let amounts: Vec<f64> = products.iter().map(|p| p.total_amount).collect();
        assert_eq!(amounts, vec![3000.0, 500.0, 150.0]);
    }

    #[test]
    fn zero_quantity_product_has_unknown_avg_price() {
        let batches = vec![day(
            1,
            SalesCategory::Ps,
            vec![record("Free Sample", 0.0, 0.0, None)],
        )];
        let products = aggregate_by_product(&batches);
        assert_eq!(products[0].avg_price, None);
    }

    #[test]
    fn with_company_carries_tags_through() {
        let products = aggregate_by_product_with_company(&sample_batches());

        let monaco = products.iter().find(|p| p.product == "Monaco").unwrap();
        assert_eq!(monaco.company.as_deref(), Some("Parle"));

        let jaggery = products.iter().find(|p| p.product == "Loose Jaggery").unwrap();
        assert_eq!(jaggery.company, None);
    }

    #[test]
    fn by_date_is_one_entry_per_batch_ascending() {
        let dates = aggregate_by_date(&sample_batches());

        assert_eq!(dates.len(), 2);
        assert!(dates[0].date < dates[1].date);
        assert_eq!(dates[0].category, SalesCategory::Ps);
        assert_eq!(dates[0].total_amount, 1500.0);
        assert_eq!(dates[1].total_quantity, 23.0);
    }

    #[test]
    fn by_company_groups_unknown_and_sorts() {
        let companies = aggregate_by_company(&sample_batches());

        assert_eq!(companies.len(), 3);
        assert_eq!(companies[0].company, "Parle");
        assert_eq!(companies[0].total_amount, 3000.0);
        assert_eq!(companies[0].product_count, 1);

        let unknown = companies
            .iter()
            .find(|c| c.company == UNKNOWN_COMPANY)
            .unwrap();
        assert_eq!(unknown.total_amount, 150.0);
        assert_eq!(unknown.products[0].product, "Loose Jaggery");
    }

    #[test]
    fn company_totals_conserve_the_grand_total() {
        let batches = sample_batches();
        let companies = aggregate_by_company(&batches);
        let products = aggregate_by_product(&batches);

        let company_sum: f64 = companies.iter().map(|c| c.total_amount).sum();
        let product_sum: f64 = products.iter().map(|p| p.total_amount).sum();

        assert!((company_sum - total_sales(&batches)).abs() < 1e-9);
        assert!((product_sum - total_sales(&batches)).abs() < 1e-9);
    }

    #[test]
    fn totals_follow_the_filtered_batch_list() {
        let batches = sample_batches();
        assert_eq!(total_sales(&batches), 3650.0);
        assert_eq!(total_quantity(&batches), 38.0);

        // Filtering to one category must recompute, not reuse, totals
        let ps_only: Vec<DailyBatch> = batches
            .iter()
            .filter(|b| b.category == SalesCategory::Ps)
            .cloned()
            .collect();
        assert_eq!(total_sales(&ps_only), 1500.0);
        assert_eq!(total_quantity(&ps_only), 15.0);
    }

    #[test]
    fn empty_input_degrades_to_empty_views() {
        let batches: Vec<DailyBatch> = Vec::new();
        assert!(aggregate_by_product(&batches).is_empty());
        assert!(aggregate_by_date(&batches).is_empty());
        assert!(aggregate_by_company(&batches).is_empty());
        assert_eq!(total_sales(&batches), 0.0);
        assert_eq!(total_quantity(&batches), 0.0);
    }
}
