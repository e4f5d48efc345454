use crate::models::instrument::Instrument;
use crate::models::state::MarketState;
use serde::{Deserialize, Serialize};

/// A state change worth reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transition {
    EnteredOverbought,
    EnteredOversold,
    ReturnedToNeutral,
}

impl Transition {
    pub fn target(&self) -> MarketState {
        match self {
            Transition::EnteredOverbought => MarketState::Overbought,
            Transition::EnteredOversold => MarketState::Oversold,
            Transition::ReturnedToNeutral => MarketState::Neutral,
        }
    }
}

/// Message announcing one instrument's transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub instrument: Instrument,
    pub transition: Transition,
    pub rsi: f64,
}

impl Notification {
    pub fn new(instrument: Instrument, transition: Transition, rsi: f64) -> Self {
        Self {
            instrument,
            transition,
            rsi,
        }
    }

    /// Text sent to the messaging destination.
    pub fn message(&self) -> String {
        let name = &self.instrument.name;
        let symbol = &self.instrument.symbol;
        match self.transition {
            Transition::EnteredOverbought => format!(
                "🔴 {} ({}) entering Overbought | RSI {:.2}",
                name, symbol, self.rsi
            ),
            Transition::EnteredOversold => format!(
                "🟢 {} ({}) entering Oversold | RSI {:.2}",
                name, symbol, self.rsi
            ),
            Transition::ReturnedToNeutral => format!(
                "⚪ {} ({}) returned to neutral range (Neutral) | RSI {:.2}",
                name, symbol, self.rsi
            ),
        }
    }
}
