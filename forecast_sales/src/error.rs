//! Error types for the forecast_sales crate

use thiserror::Error;

/// Custom error types for the forecast_sales crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Error related to series data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from an underlying math calculation
    #[error("Math error: {0}")]
    Math(#[from] retail_math::MathError),

    /// Error from serializing a summary
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;
