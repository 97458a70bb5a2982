//! # Forecast Sales
//!
//! Short-horizon revenue and quantity forecasting for daily sales
//! extracts.
//!
//! ## Features
//!
//! - Dense per-product daily time series (zero-filled non-selling days)
//! - Linearly weighted moving averages with confidence scoring
//! - Multi-window ensemble forecasts (7/14/30 days)
//! - One-day and seven-day predictions per product
//! - Portfolio summary with data-quality grading and warnings
//! - Backtesting with MAE/MAPE/RMSE accuracy metrics
//!
//! ## Quick Start
//!
//! ```
//! use forecast_sales::{backtest_all, generate_forecast_summary, ForecastConfig};
//! use sales_core::utils::generate_test_batches;
//!
//! let batches = generate_test_batches(45, 6, 20.0);
//! let config = ForecastConfig::default();
//!
//! let summary = generate_forecast_summary(&batches, &config).unwrap();
//! assert_eq!(summary.forecasts.len(), 10);
//! assert_eq!(summary.days_of_history, 45);
//!
//! let backtests = backtest_all(&batches, &config).unwrap();
//! assert!(backtests.iter().all(|b| b.report.test_period_days == 7));
//! ```

pub mod backtest;
pub mod error;
pub mod models;
pub mod series;
pub mod summary;

// Re-export commonly used types
pub use crate::backtest::{backtest_all, BacktestReport, ProductBacktest};
pub use crate::error::{ForecastError, Result};
pub use crate::models::{
    ensemble_forecast, forecast_product, weighted_moving_average, HistoricalMetrics, Prediction,
    ProductForecast, WeightedForecast, ENSEMBLE_WINDOWS,
};
pub use crate::series::{build_product_series, distinct_dates, ProductSeries, SeriesPoint};
pub use crate::summary::{generate_forecast_summary, DataQuality, ForecastSummary};

/// Tuning knobs for forecasting and backtesting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastConfig {
    /// How many products (by total revenue) to forecast
    pub top_products: usize,
    /// Held-out days for backtesting
    pub backtest_days: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            top_products: 10,
            backtest_days: 7,
        }
    }
}
