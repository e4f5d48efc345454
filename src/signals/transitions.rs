//! Per-instrument state machine.
//!
//! States are `unknown` (never recorded) plus the three market states. The
//! first classification of an unknown instrument only alerts when it lands
//! outside the neutral band.

use crate::models::notification::Transition;
use crate::models::state::MarketState;

/// Transition implied by moving from `prior` to `current`, if any.
pub fn next_transition(prior: Option<MarketState>, current: MarketState) -> Option<Transition> {
    match (prior, current) {
        (Some(previous), current) if previous == current => None,
        (None, MarketState::Neutral) => None,
        (_, MarketState::Overbought) => Some(Transition::EnteredOverbought),
        (_, MarketState::Oversold) => Some(Transition::EnteredOversold),
        (Some(_), MarketState::Neutral) => Some(Transition::ReturnedToNeutral),
    }
}
