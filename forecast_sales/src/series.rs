//! Dense per-product daily time series
//!
//! Forecasting works on fixed-length series spanning every distinct
//! date present in the batch set, with zero-filled points on dates a
//! product did not sell. Skipping the zero days instead would overstate
//! the trend of intermittently-sold products, so the dense filling is
//! load-bearing, not cosmetic.

use chrono::NaiveDate;
use sales_core::aggregate::aggregate_by_product_with_company;
use sales_core::record::{DailyBatch, ProductKey};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// One day of a product's series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub revenue: f64,
    pub quantity: f64,
}

/// Daily revenue/quantity series for one product, dense over the full
/// observed date range
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSeries {
    pub product: String,
    pub company: Option<String>,
    pub points: Vec<SeriesPoint>,
}

impl ProductSeries {
    pub fn revenues(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.revenue).collect()
    }

    pub fn quantities(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.quantity).collect()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// All distinct dates present in the batch set, ascending
pub fn distinct_dates(batches: &[DailyBatch]) -> Vec<NaiveDate> {
    let dates: BTreeSet<NaiveDate> = batches.iter().map(|b| b.date).collect();
    dates.into_iter().collect()
}

/// Build dense daily series for the top `top_n` products by revenue.
///
/// Each series spans every distinct date in the batch set; dates the
/// product did not sell on carry explicit zero revenue and quantity.
pub fn build_product_series(batches: &[DailyBatch], top_n: usize) -> Vec<ProductSeries> {
    let dates = distinct_dates(batches);
    if dates.is_empty() || top_n == 0 {
        return Vec::new();
    }

    // Per-product daily accumulation in one pass over the records
    let mut daily: HashMap<ProductKey, HashMap<NaiveDate, (f64, f64)>> = HashMap::new();
    for batch in batches {
        for record in &batch.records {
            let day = daily
                .entry(record.product_key())
                .or_default()
                .entry(batch.date)
                .or_insert((0.0, 0.0));
            day.0 += record.taxable_amount;
            day.1 += record.quantity;
        }
    }

    // aggregate_by_product_with_company is already descending by revenue
    aggregate_by_product_with_company(batches)
        .into_iter()
        .take(top_n)
        .map(|aggregate| {
            let key = ProductKey::new(&aggregate.product);
            let sold = daily.get(&key);

            let points = dates
                .iter()
                .map(|&date| {
                    let (revenue, quantity) = sold
                        .and_then(|days| days.get(&date))
                        .copied()
                        .unwrap_or((0.0, 0.0));
                    SeriesPoint {
                        date,
                        revenue,
                        quantity,
                    }
                })
                .collect();

            ProductSeries {
                product: aggregate.product,
                company: aggregate.company,
                points,
            }
        })
        .collect()
}
