//! # Retail Math
//!
//! Mathematical building blocks for retail sales analytics: weighted
//! moving averages, descriptive statistics, and forecast accuracy
//! metrics. The heavier analytics (aggregation, velocity, forecasting)
//! live in the `sales_core` and `forecast_sales` crates and delegate
//! their numeric work here.

use thiserror::Error;

pub mod accuracy;
pub mod moving_averages;
pub mod statistics;

/// Errors that can occur in analytics-related calculations
#[derive(Error, Debug)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for retail math operations
pub type Result<T> = std::result::Result<T, MathError>;
