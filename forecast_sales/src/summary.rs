//! Forecast summary: portfolio totals, aggregate confidence, and data
//! quality grading

use crate::error::Result;
use crate::models::{forecast_product, ProductForecast};
use crate::series::{build_product_series, distinct_dates};
use crate::ForecastConfig;
use retail_math::statistics::round2;
use sales_core::record::DailyBatch;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Grade of the input history, from the fraction of calendar days
/// missing between the first and last observed date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl fmt::Display for DataQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            DataQuality::Excellent => "excellent",
            DataQuality::Good => "good",
            DataQuality::Fair => "fair",
            DataQuality::Poor => "poor",
        };
        f.write_str(tag)
    }
}

/// Portfolio-level forecast rollup over the top-N products
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastSummary {
    /// Per-product forecasts, descending by total revenue
    pub forecasts: Vec<ProductForecast>,
    pub one_day_total_revenue: f64,
    pub one_day_total_quantity: f64,
    /// Simple mean of the per-product one-day confidences
    pub one_day_confidence: u8,
    pub seven_day_total_revenue: f64,
    pub seven_day_total_quantity: f64,
    /// Simple mean of the per-product seven-day confidences
    pub seven_day_confidence: u8,
    pub data_quality: DataQuality,
    /// Distinct dates observed in the batch set
    pub days_of_history: usize,
    /// Calendar days missing inside the observed date range
    pub missing_days: usize,
    pub warnings: Vec<String>,
}

impl ForecastSummary {
    /// Serialize the summary to a JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn mean_confidence(confidences: impl Iterator<Item = u8>) -> u8 {
    let values: Vec<f64> = confidences.map(|c| c as f64).collect();
    if values.is_empty() {
        return 0;
    }
    (values.iter().sum::<f64>() / values.len() as f64).round() as u8
}

/// Grade the calendar coverage of the observed date range.
///
/// The gap detection runs over the full inclusive range between the
/// first and last observed date, not just the count of distinct dates.
fn grade_coverage(dates: &[chrono::NaiveDate]) -> (DataQuality, usize) {
    let (Some(first), Some(last)) = (dates.first(), dates.last()) else {
        return (DataQuality::Poor, 0);
    };

    let expected = (*last - *first).num_days() as usize + 1;
    let missing = expected - dates.len();
    let missing_ratio = missing as f64 / expected as f64;

    let quality = if missing_ratio < 0.05 {
        DataQuality::Excellent
    } else if missing_ratio < 0.15 {
        DataQuality::Good
    } else if missing_ratio < 0.30 {
        DataQuality::Fair
    } else {
        DataQuality::Poor
    };

    (quality, missing)
}

/// Forecast the top-N products and roll their predictions up into
/// portfolio totals, aggregate confidences, and data-quality warnings.
pub fn generate_forecast_summary(
    batches: &[DailyBatch],
    config: &ForecastConfig,
) -> Result<ForecastSummary> {
    let dates = distinct_dates(batches);
    let (data_quality, missing_days) = grade_coverage(&dates);

    let forecasts = build_product_series(batches, config.top_products)
        .iter()
        .map(forecast_product)
        .collect::<Result<Vec<ProductForecast>>>()?;

    let mut warnings = Vec::new();
    if dates.len() < 30 {
        warnings.push(format!(
            "Only {} days of history; forecasts may be unreliable",
            dates.len()
        ));
    }
    if missing_days > 0 {
        warnings.push(format!(
            "{} calendar days missing between the first and last extract",
            missing_days
        ));
    }

    Ok(ForecastSummary {
        one_day_total_revenue: round2(forecasts.iter().map(|f| f.one_day.revenue).sum()),
        one_day_total_quantity: round2(forecasts.iter().map(|f| f.one_day.quantity).sum()),
        one_day_confidence: mean_confidence(forecasts.iter().map(|f| f.one_day.confidence)),
        seven_day_total_revenue: round2(forecasts.iter().map(|f| f.seven_day.revenue).sum()),
        seven_day_total_quantity: round2(forecasts.iter().map(|f| f.seven_day.quantity).sum()),
        seven_day_confidence: mean_confidence(forecasts.iter().map(|f| f.seven_day.confidence)),
        forecasts,
        data_quality,
        days_of_history: dates.len(),
        missing_days,
        warnings,
    })
}
