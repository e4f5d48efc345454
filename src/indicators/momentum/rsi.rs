//! RSI (Relative Strength Index) indicator

use crate::common::math;
use crate::models::indicators::{IndicatorValue, PriceSeries};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_RSI_PERIOD: usize = 14;

/// How average gain and loss are smoothed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsiSmoothing {
    /// Trailing arithmetic mean of the last `period` deltas.
    Simple,
    /// Wilder smoothing, alpha = 1 / period.
    #[default]
    Exponential,
}

impl fmt::Display for RsiSmoothing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RsiSmoothing::Simple => f.write_str("simple"),
            RsiSmoothing::Exponential => f.write_str("exponential"),
        }
    }
}

impl FromStr for RsiSmoothing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" | "sma" => Ok(RsiSmoothing::Simple),
            "exponential" | "ema" | "wilder" => Ok(RsiSmoothing::Exponential),
            other => Err(format!("unknown RSI smoothing '{}'", other)),
        }
    }
}

/// RSI for every close in `closes`.
///
/// RSI = 100 - (100 / (1 + RS)), RS = average gain / average loss.
/// The output has the same length as the input and the first `period`
/// entries are undefined. A flat window (no gains, no losses) is undefined;
/// a window with gains and no losses is 100.
pub fn calculate_rsi_series(closes: &[f64], period: usize, smoothing: RsiSmoothing) -> Vec<IndicatorValue> {
    if period == 0 {
        return vec![None; closes.len()];
    }

    let mut gains: Vec<Option<f64>> = Vec::with_capacity(closes.len());
    let mut losses: Vec<Option<f64>> = Vec::with_capacity(closes.len());
    for i in 0..closes.len() {
        if i == 0 {
            gains.push(None);
            losses.push(None);
            continue;
        }
        let change = closes[i] - closes[i - 1];
        gains.push(Some(change.max(0.0)));
        losses.push(Some((-change).max(0.0)));
    }

    let (avg_gain, avg_loss) = match smoothing {
        RsiSmoothing::Simple => (
            math::rolling_mean(&gains, period),
            math::rolling_mean(&losses, period),
        ),
        RsiSmoothing::Exponential => {
            let alpha = 1.0 / period as f64;
            (
                math::smoothed_series(&gains, alpha, period),
                math::smoothed_series(&losses, alpha, period),
            )
        }
    };

    avg_gain
        .into_iter()
        .zip(avg_loss)
        .map(|(gain, loss)| match (gain, loss) {
            (Some(g), Some(l)) => rsi_from_averages(g, l),
            _ => None,
        })
        .collect()
}

/// Latest RSI of a price series; undefined for fewer than `period + 1` closes.
pub fn calculate_rsi(series: &PriceSeries, period: usize, smoothing: RsiSmoothing) -> IndicatorValue {
    if series.len() < period + 1 {
        return None;
    }
    calculate_rsi_series(&series.closes(), period, smoothing)
        .last()
        .copied()
        .flatten()
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> IndicatorValue {
    if avg_loss == 0.0 {
        return if avg_gain > 0.0 { Some(100.0) } else { None };
    }
    let rs = avg_gain / avg_loss;
    Some(100.0 - (100.0 / (1.0 + rs)))
}
