//! Job and result types for per-instrument evaluation

use crate::error::{AlertError, DeliveryError};
use crate::models::indicators::{IndicatorSnapshot, RsiHistory};
use crate::models::instrument::Instrument;
use crate::models::notification::Transition;
use crate::models::state::MarketState;
use crate::signals::engine::AlertDecision;
use chrono::NaiveDate;

/// Evaluate one instrument against its stored state.
#[derive(Debug, Clone)]
pub struct EvaluateInstrumentJob {
    pub instrument: Instrument,
    pub prior: Option<MarketState>,
    /// Last day of the price window.
    pub end_date: NaiveDate,
}

/// What happened to the notification for a classified instrument.
#[derive(Debug)]
pub enum DeliveryOutcome {
    NotRequired,
    /// A transition happened but policy says not to report it.
    Suppressed(Transition),
    Sent(Transition),
    Failed {
        transition: Transition,
        error: DeliveryError,
    },
}

#[derive(Debug)]
pub enum InstrumentOutcome {
    Classified {
        decision: AlertDecision,
        delivery: DeliveryOutcome,
    },
    /// `DataUnavailable` or `IndeterminateIndicator`; not a failure.
    Skipped(AlertError),
    /// Fetching failed after retries.
    Failed(AlertError),
}

#[derive(Debug)]
pub struct InstrumentReport {
    pub instrument: Instrument,
    pub prior: Option<MarketState>,
    pub snapshot: Option<IndicatorSnapshot>,
    pub rsi_history: Option<RsiHistory>,
    pub outcome: InstrumentOutcome,
    /// Value to write into the state record; `None` leaves the entry as it was.
    pub next_state: Option<MarketState>,
}

impl InstrumentReport {
    pub fn state(&self) -> Option<MarketState> {
        match &self.outcome {
            InstrumentOutcome::Classified { decision, .. } => Some(decision.state),
            _ => None,
        }
    }

    pub fn notified(&self) -> bool {
        matches!(
            self.outcome,
            InstrumentOutcome::Classified {
                delivery: DeliveryOutcome::Sent(_),
                ..
            }
        )
    }

    pub fn delivery_failed(&self) -> bool {
        matches!(
            self.outcome,
            InstrumentOutcome::Classified {
                delivery: DeliveryOutcome::Failed { .. },
                ..
            }
        )
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.outcome, InstrumentOutcome::Skipped(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, InstrumentOutcome::Failed(_))
    }
}
