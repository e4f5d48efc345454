//! EMA (Exponential Moving Average) indicator

use crate::common::math;

/// EMA of `values` for a span, seeded with the first value.
pub fn calculate_ema_series(values: &[f64], span: usize) -> Vec<f64> {
    math::ema_series(values, span)
}

/// Latest EMA value for a span.
pub fn calculate_ema(values: &[f64], span: usize) -> Option<f64> {
    calculate_ema_series(values, span).last().copied()
}
