//! MACD (Moving Average Convergence Divergence) indicator

use crate::indicators::trend::calculate_ema_series;
use crate::models::indicators::{IndicatorValue, PriceSeries};

pub const DEFAULT_FAST_PERIOD: usize = 12;
pub const DEFAULT_SLOW_PERIOD: usize = 26;
pub const DEFAULT_SIGNAL_PERIOD: usize = 9;

/// MACD line, signal line and histogram, one entry per close.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// Calculate the MACD series
///
/// MACD = EMA(fast) - EMA(slow)
/// Signal = EMA(signal) of MACD
/// Histogram = MACD - Signal
///
/// Every EMA is seeded with its first input, so values are defined from the
/// first close onwards (early values carry little information).
pub fn calculate_macd_series(
    closes: &[f64],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> MacdSeries {
    let fast = calculate_ema_series(closes, fast_period);
    let slow = calculate_ema_series(closes, slow_period);
    let macd: Vec<f64> = fast.iter().zip(slow.iter()).map(|(f, s)| f - s).collect();
    let signal = calculate_ema_series(&macd, signal_period);
    let histogram = macd.iter().zip(signal.iter()).map(|(m, s)| m - s).collect();

    MacdSeries {
        macd,
        signal,
        histogram,
    }
}

/// MACD histogram with default periods (12, 26, 9)
pub fn calculate_macd_histogram(closes: &[f64]) -> Vec<IndicatorValue> {
    calculate_macd_series(closes, DEFAULT_FAST_PERIOD, DEFAULT_SLOW_PERIOD, DEFAULT_SIGNAL_PERIOD)
        .histogram
        .into_iter()
        .map(Some)
        .collect()
}

/// Latest MACD histogram value; undefined only for an empty series.
pub fn latest_macd_histogram(series: &PriceSeries) -> IndicatorValue {
    calculate_macd_histogram(&series.closes()).last().copied().flatten()
}
