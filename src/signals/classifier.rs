//! RSI threshold classification

use crate::models::indicators::IndicatorValue;
use crate::models::state::MarketState;
use serde::{Deserialize, Serialize};

pub const DEFAULT_OVERBOUGHT: f64 = 70.0;
pub const DEFAULT_OVERSOLD: f64 = 30.0;

/// Exclusive bounds: RSI strictly above `overbought` or strictly below
/// `oversold` leaves the neutral band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RsiThresholds {
    pub overbought: f64,
    pub oversold: f64,
}

impl Default for RsiThresholds {
    fn default() -> Self {
        Self {
            overbought: DEFAULT_OVERBOUGHT,
            oversold: DEFAULT_OVERSOLD,
        }
    }
}

impl RsiThresholds {
    pub fn new(overbought: f64, oversold: f64) -> Result<Self, String> {
        if !(overbought.is_finite() && oversold.is_finite()) {
            return Err("RSI thresholds must be finite".to_string());
        }
        if oversold >= overbought {
            return Err(format!(
                "oversold threshold ({}) must be below overbought threshold ({})",
                oversold, overbought
            ));
        }
        Ok(Self {
            overbought,
            oversold,
        })
    }
}

/// Map an RSI value to a market state.
pub fn classify(rsi: f64, thresholds: &RsiThresholds) -> MarketState {
    if rsi > thresholds.overbought {
        MarketState::Overbought
    } else if rsi < thresholds.oversold {
        MarketState::Oversold
    } else {
        MarketState::Neutral
    }
}

/// Classify a possibly undefined reading. `None` means "not classified",
/// never `Neutral`.
pub fn classify_value(rsi: IndicatorValue, thresholds: &RsiThresholds) -> Option<MarketState> {
    rsi.filter(|v| v.is_finite()).map(|v| classify(v, thresholds))
}
