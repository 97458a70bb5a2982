//! Weighted-moving-average and ensemble forecasting with confidence
//! scoring
//!
//! Confidence is the average of two 0-100 sub-scores: a data-quality
//! score penalizing history shorter than the requested window, and a
//! variability score penalizing noisy series via the coefficient of
//! variation. Degenerate inputs (empty series, zero means) produce
//! defined zero-confidence values, never errors, so a thin dataset
//! degrades the forecast instead of aborting the pipeline.

use crate::error::Result;
use crate::series::ProductSeries;
use crate::ForecastError;
use chrono::{Duration, NaiveDate};
use retail_math::moving_averages::LinearWeightedMovingAverage;
use retail_math::statistics::{coefficient_of_variation, mean, population_std_dev, round2};
use serde::{Deserialize, Serialize};

/// Moving-average windows blended by the ensemble forecast
pub const ENSEMBLE_WINDOWS: [usize; 3] = [7, 14, 30];

/// A forecast value with its 0-100 confidence score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedForecast {
    pub value: f64,
    pub confidence: u8,
}

/// One horizon of a product forecast
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub revenue: f64,
    pub quantity: f64,
    /// The lower of the revenue and quantity confidences
    pub confidence: u8,
    pub target_date: NaiveDate,
}

/// Descriptive statistics over a product's full series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalMetrics {
    pub avg_daily_revenue: f64,
    pub avg_daily_quantity: f64,
    pub revenue_std_dev: f64,
    pub quantity_std_dev: f64,
    pub days_of_history: usize,
}

/// One-day and seven-day forecasts for a product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductForecast {
    pub product: String,
    pub company: Option<String>,
    pub one_day: Prediction,
    pub seven_day: Prediction,
    pub history: HistoricalMetrics,
}

fn clamp_confidence(score: f64) -> u8 {
    score.round().clamp(0.0, 100.0) as u8
}

/// Linearly weighted moving average over the tail of a series.
///
/// The effective window shrinks to the series length when history is
/// short; the data-quality half of the confidence score drops
/// proportionally. An empty series forecasts 0 with zero confidence.
pub fn weighted_moving_average(values: &[f64], window: usize) -> Result<WeightedForecast> {
    if window == 0 {
        return Err(ForecastError::InvalidParameter(
            "Window size must be positive".to_string(),
        ));
    }

    let effective_window = window.min(values.len());
    if effective_window == 0 {
        return Ok(WeightedForecast {
            value: 0.0,
            confidence: 0,
        });
    }

    let tail = &values[values.len() - effective_window..];

    let mut lwma = LinearWeightedMovingAverage::new(effective_window)?;
    for &value in tail {
        lwma.update(value);
    }
    let value = lwma.value()?;

    let data_quality = (effective_window as f64 / window as f64).min(1.0) * 100.0;
    let variability = (1.0 - coefficient_of_variation(tail)?).max(0.0) * 100.0;
    let confidence = clamp_confidence((data_quality + variability) / 2.0);

    Ok(WeightedForecast { value, confidence })
}

/// Blend the 7/14/30-day weighted moving averages, each weighted by its
/// own confidence. The overall confidence is their unweighted mean.
pub fn ensemble_forecast(values: &[f64]) -> Result<WeightedForecast> {
    let forecasts = ENSEMBLE_WINDOWS
        .iter()
        .map(|&window| weighted_moving_average(values, window))
        .collect::<Result<Vec<WeightedForecast>>>()?;

    let confidence_total: f64 = forecasts.iter().map(|f| f.confidence as f64).sum();
    let value = if confidence_total > 0.0 {
        forecasts
            .iter()
            .map(|f| f.value * f.confidence as f64)
            .sum::<f64>()
            / confidence_total
    } else {
        0.0
    };

    let confidence = clamp_confidence(confidence_total / forecasts.len() as f64);

    Ok(WeightedForecast { value, confidence })
}

/// Forecast one product from its dense daily series.
///
/// One-day-ahead applies the 7-day weighted moving average to the
/// revenue and quantity series independently; seven-day-ahead is the
/// ensembled daily rate extrapolated flat across a week. Each horizon's
/// confidence is the lower of its revenue and quantity confidences.
pub fn forecast_product(series: &ProductSeries) -> Result<ProductForecast> {
    let last_date = series.last_date().ok_or_else(|| {
        ForecastError::DataError(format!("Empty series for product {}", series.product))
    })?;

    let revenues = series.revenues();
    let quantities = series.quantities();

    let one_day_revenue = weighted_moving_average(&revenues, 7)?;
    let one_day_quantity = weighted_moving_average(&quantities, 7)?;
    let one_day = Prediction {
        revenue: round2(one_day_revenue.value),
        quantity: round2(one_day_quantity.value),
        confidence: one_day_revenue.confidence.min(one_day_quantity.confidence),
        target_date: last_date + Duration::days(1),
    };

    let week_revenue = ensemble_forecast(&revenues)?;
    let week_quantity = ensemble_forecast(&quantities)?;
    let seven_day = Prediction {
        revenue: round2(week_revenue.value * 7.0),
        quantity: round2(week_quantity.value * 7.0),
        confidence: week_revenue.confidence.min(week_quantity.confidence),
        target_date: last_date + Duration::days(7),
    };

    let history = HistoricalMetrics {
        avg_daily_revenue: round2(mean(&revenues)?),
        avg_daily_quantity: round2(mean(&quantities)?),
        revenue_std_dev: round2(population_std_dev(&revenues)?),
        quantity_std_dev: round2(population_std_dev(&quantities)?),
        days_of_history: series.len(),
    };

    Ok(ProductForecast {
        product: series.product.clone(),
        company: series.company.clone(),
        one_day,
        seven_day,
        history,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_series_forecasts_itself_with_full_confidence() {
        let values = vec![250.0; 30];

        for window in [7, 14, 30] {
            let forecast = weighted_moving_average(&values, window).unwrap();
            assert!((forecast.value - 250.0).abs() < 1e-9);
            assert_eq!(forecast.confidence, 100);
        }

        let ensemble = ensemble_forecast(&values).unwrap();
        assert!((ensemble.value - 250.0).abs() < 1e-9);
        assert_eq!(ensemble.confidence, 100);
    }

    #[test]
    fn short_history_halves_data_quality() {
        // 7 days of constant history against a 14-day window: the
        // variability score is 100 but data quality is only 50
        let values = vec![100.0; 7];
        let forecast = weighted_moving_average(&values, 14).unwrap();
        assert!((forecast.value - 100.0).abs() < 1e-9);
        assert_eq!(forecast.confidence, 75);
    }

    #[test]
    fn empty_series_forecasts_zero_with_zero_confidence() {
        let forecast = weighted_moving_average(&[], 7).unwrap();
        assert_eq!(forecast.value, 0.0);
        assert_eq!(forecast.confidence, 0);

        let ensemble = ensemble_forecast(&[]).unwrap();
        assert_eq!(ensemble.value, 0.0);
        assert_eq!(ensemble.confidence, 0);
    }

    #[test]
    fn all_zero_series_has_zero_variability_score() {
        // Mean of zero defines CV as 1, so only data quality remains
        let values = vec![0.0; 7];
        let forecast = weighted_moving_average(&values, 7).unwrap();
        assert_eq!(forecast.value, 0.0);
        assert_eq!(forecast.confidence, 50);
    }

    #[test]
    fn recent_values_dominate_the_average() {
        let mut values = vec![10.0; 6];
        values.push(100.0);

        let forecast = weighted_moving_average(&values, 7).unwrap();
        // Weighted mean = (10*(1+..+6) + 100*7) / 28 = (210 + 700) / 28
        assert!((forecast.value - 910.0 / 28.0).abs() < 1e-9);
        assert!(forecast.value > 10.0);
    }

    #[test]
    fn zero_window_is_rejected() {
        assert!(weighted_moving_average(&[1.0], 0).is_err());
    }
}
