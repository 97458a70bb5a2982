//! Utility helpers for demos and tests

use crate::record::{DailyBatch, SalesCategory, SalesRecord};
use chrono::{Days, NaiveDate};

/// Generate randomized daily extract batches for testing purposes.
///
/// Produces one PS and one FS batch per day starting 2025-01-01, each
/// with `products_per_category` stable product names whose quantities
/// vary randomly around `base_quantity`.
///
/// # Arguments
/// * `num_days` - Number of consecutive days to generate
/// * `products_per_category` - Distinct products per category
/// * `base_quantity` - Center of the random daily quantity
pub fn generate_test_batches(
    num_days: usize,
    products_per_category: usize,
    base_quantity: f64,
) -> Vec<DailyBatch> {
    use rand::{thread_rng, Rng};

    let mut rng = thread_rng();
    let base_date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    let mut batches = Vec::with_capacity(num_days * 2);

    for day in 0..num_days {
        let date = base_date
            .checked_add_days(Days::new(day as u64))
            .unwrap();

        for category in [SalesCategory::Ps, SalesCategory::Fs] {
            let mut records = Vec::with_capacity(products_per_category);

            for i in 0..products_per_category {
                let quantity = (base_quantity * (0.5 + rng.gen::<f64>())).round();
                let unit_price = 20.0 + rng.gen::<f64>() * 180.0;

                records.push(SalesRecord {
                    item_code: format!("{}{:04}", category, i + 1),
                    item_name: format!("{} Item {}", category, i + 1),
                    quantity,
                    taxable_amount: quantity * unit_price,
                    tax_rate: if i % 2 == 0 { 5.0 } else { 12.0 },
                    company: None,
                });
            }

            batches.push(DailyBatch::new(date, category, records));
        }
    }

    batches
}
