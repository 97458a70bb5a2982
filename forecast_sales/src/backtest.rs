//! Backtesting: forecast accuracy against held-out history
//!
//! The last `test_days` points are held out; the prediction is the
//! 7-day weighted moving average computed once from the training tail
//! and held static against every test point. The forecast is not rolled
//! forward day by day, so the metrics measure the quality of a single
//! point-in-time prediction over the following week.

use crate::error::Result;
use crate::models::weighted_moving_average;
use crate::series::build_product_series;
use crate::ForecastConfig;
use crate::ForecastError;
use retail_math::accuracy::forecast_accuracy;
use retail_math::statistics::round2;
use sales_core::record::DailyBatch;
use serde::{Deserialize, Serialize};

/// Accuracy of the static weekly prediction over a held-out period.
///
/// `test_period_days == 0` signals that history was too short to
/// backtest; all metrics are zero in that case.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BacktestReport {
    pub mae: f64,
    pub mape: f64,
    pub rmse: f64,
    pub test_period_days: usize,
}

impl BacktestReport {
    fn insufficient_history() -> Self {
        Self {
            mae: 0.0,
            mape: 0.0,
            rmse: 0.0,
            test_period_days: 0,
        }
    }
}

/// Backtest of one product's revenue series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductBacktest {
    pub product: String,
    pub company: Option<String>,
    pub report: BacktestReport,
}

/// Backtest a value series by holding out its last `test_days` points.
///
/// Requires `test_days + 7` days of history so the training tail can
/// fill a 7-day window; shorter series report the zero-metrics
/// sentinel rather than an error.
pub fn backtest(values: &[f64], test_days: usize) -> Result<BacktestReport> {
    if test_days == 0 {
        return Err(ForecastError::InvalidParameter(
            "Test period must be at least one day".to_string(),
        ));
    }

    if values.len() < test_days + 7 {
        return Ok(BacktestReport::insufficient_history());
    }

    let (train, actual) = values.split_at(values.len() - test_days);
    let prediction = weighted_moving_average(train, 7)?.value;

    let forecast = vec![prediction; test_days];
    let accuracy = forecast_accuracy(&forecast, actual)?;

    Ok(BacktestReport {
        mae: round2(accuracy.mae),
        mape: round2(accuracy.mape),
        rmse: round2(accuracy.rmse),
        test_period_days: test_days,
    })
}

/// Backtest the revenue series of the same top-N product set used for
/// forecasting
pub fn backtest_all(batches: &[DailyBatch], config: &ForecastConfig) -> Result<Vec<ProductBacktest>> {
    build_product_series(batches, config.top_products)
        .into_iter()
        .map(|series| {
            let report = backtest(&series.revenues(), config.backtest_days)?;
            Ok(ProductBacktest {
                product: series.product,
                company: series.company,
                report,
            })
        })
        .collect()
}
