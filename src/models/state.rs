//! Market state labels and the persisted per-instrument record.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Discrete state derived from the latest RSI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketState {
    Overbought,
    Oversold,
    Neutral,
}

impl MarketState {
    pub fn label(&self) -> &'static str {
        match self {
            MarketState::Overbought => "Overbought",
            MarketState::Oversold => "Oversold",
            MarketState::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for MarketState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Last notified state per instrument symbol.
///
/// A symbol missing from the record is "unknown": no notification has ever
/// been sent for it, which is different from a stored `Neutral`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateRecord {
    states: BTreeMap<String, MarketState>,
}

impl StateRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, symbol: &str) -> Option<MarketState> {
        self.states.get(symbol).copied()
    }

    pub fn set(&mut self, symbol: impl Into<String>, state: MarketState) {
        self.states.insert(symbol.into(), state);
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl FromIterator<(String, MarketState)> for StateRecord {
    fn from_iter<I: IntoIterator<Item = (String, MarketState)>>(iter: I) -> Self {
        Self {
            states: iter.into_iter().collect(),
        }
    }
}
