//! Weighted moving average implementations
//!
//! Contains the linearly weighted moving average used by the forecasting
//! crate, both as a sliding accumulator and as a one-shot slice helper.

use crate::{MathError, Result};
use std::collections::VecDeque;

/// Compute the linearly weighted mean of a slice.
///
/// The last element carries the highest weight; weights rise linearly
/// from 1 at the oldest value to `values.len()` at the newest.
pub fn weighted_mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot compute a weighted mean of an empty slice".to_string(),
        ));
    }

    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;
    for (i, &value) in values.iter().enumerate() {
        let weight = (i + 1) as f64;
        weighted_sum += value * weight;
        weight_total += weight;
    }

    Ok(weighted_sum / weight_total)
}

/// Linearly Weighted Moving Average (LWMA) implementation
///
/// Recent values are weighted more heavily than older ones, making the
/// average react faster to recent movement than a simple moving average.
#[derive(Debug, Clone)]
pub struct LinearWeightedMovingAverage {
    period: usize,
    values: VecDeque<f64>,
}

impl LinearWeightedMovingAverage {
    /// Create a new LWMA with the specified period
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(MathError::InvalidInput(
                "Period must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            period,
            values: VecDeque::with_capacity(period),
        })
    }

    /// Update the LWMA with a new value
    pub fn update(&mut self, value: f64) {
        self.values.push_back(value);

        // Keep only the most recent `period` values
        if self.values.len() > self.period {
            self.values.pop_front();
        }
    }

    /// Get the current LWMA value
    pub fn value(&self) -> Result<f64> {
        if self.values.len() < self.period {
            return Err(MathError::InsufficientData(format!(
                "Not enough data for LWMA calculation. Need {} values, have {}.",
                self.period,
                self.values.len()
            )));
        }

        let window: Vec<f64> = self.values.iter().copied().collect();
        weighted_mean(&window)
    }

    /// Get the current period
    pub fn period(&self) -> usize {
        self.period
    }

    /// Reset the LWMA, clearing all values
    pub fn reset(&mut self) {
        self.values.clear();
    }
}
