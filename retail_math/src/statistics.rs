//! Descriptive statistics over value series
//!
//! Population statistics are used throughout: the batch set is the whole
//! universe of observed sales, not a sample drawn from one.

use crate::{MathError, Result};

/// Arithmetic mean of a slice
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot compute the mean of an empty slice".to_string(),
        ));
    }

    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation of a slice
pub fn population_std_dev(values: &[f64]) -> Result<f64> {
    let m = mean(values)?;
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    Ok(variance.sqrt())
}

/// Coefficient of variation (std dev / mean) of a slice.
///
/// A zero mean makes the ratio undefined; by convention it is reported
/// as 1.0, which downstream confidence scoring treats as fully noisy.
pub fn coefficient_of_variation(values: &[f64]) -> Result<f64> {
    let m = mean(values)?;
    if m == 0.0 {
        return Ok(1.0);
    }
    let sd = population_std_dev(values)?;
    Ok(sd / m)
}

/// Round to two decimal places, half away from zero
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
