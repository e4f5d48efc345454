//! Alert engine: indicators, classification and the notify/update decision
//! for a single instrument.

use crate::config::AppConfig;
use crate::error::AlertError;
use crate::indicators::momentum::{calculate_macd_histogram, calculate_rsi_series, RsiSmoothing};
use crate::models::indicators::{IndicatorSnapshot, PriceSeries, RsiHistory};
use crate::models::instrument::Instrument;
use crate::models::notification::{Notification, Transition};
use crate::models::state::MarketState;
use crate::signals::classifier::{classify, classify_value, RsiThresholds};
use crate::signals::transitions::next_transition;
use serde::{Deserialize, Serialize};

/// Knobs that shape evaluation and alerting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertPolicy {
    pub rsi_period: usize,
    pub smoothing: RsiSmoothing,
    pub thresholds: RsiThresholds,
    pub notify_on_return_to_neutral: bool,
    pub update_state_on_delivery_failure: bool,
}

impl Default for AlertPolicy {
    fn default() -> Self {
        Self {
            rsi_period: crate::indicators::momentum::DEFAULT_RSI_PERIOD,
            smoothing: RsiSmoothing::default(),
            thresholds: RsiThresholds::default(),
            notify_on_return_to_neutral: true,
            update_state_on_delivery_failure: true,
        }
    }
}

impl From<&AppConfig> for AlertPolicy {
    fn from(config: &AppConfig) -> Self {
        Self {
            rsi_period: config.rsi_period,
            smoothing: config.smoothing,
            thresholds: config.thresholds,
            notify_on_return_to_neutral: config.notify_on_return_to_neutral,
            update_state_on_delivery_failure: config.update_state_on_delivery_failure,
        }
    }
}

/// What the engine concluded for a classified instrument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertDecision {
    pub state: MarketState,
    pub rsi: f64,
    pub transition: Option<Transition>,
    /// False when there is no transition or the transition is suppressed by policy.
    pub notify: bool,
}

impl AlertDecision {
    pub fn notification(&self, instrument: &Instrument) -> Option<Notification> {
        match (self.notify, self.transition) {
            (true, Some(transition)) => Some(Notification::new(instrument.clone(), transition, self.rsi)),
            _ => None,
        }
    }
}

/// Outcome of sending the decided notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    NotAttempted,
    Delivered,
    Failed,
}

/// Everything computed for one instrument in one run.
#[derive(Debug)]
pub struct InstrumentEvaluation {
    pub snapshot: Option<IndicatorSnapshot>,
    pub rsi_history: RsiHistory,
    /// `Err` carries `DataUnavailable` or `IndeterminateIndicator`: the
    /// instrument is skipped and its stored state left alone.
    pub verdict: Result<AlertDecision, AlertError>,
}

#[derive(Debug, Clone)]
pub struct AlertEngine {
    policy: AlertPolicy,
}

impl AlertEngine {
    pub fn new(policy: AlertPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &AlertPolicy {
        &self.policy
    }

    /// Compute indicators for `series` and decide against the stored state.
    pub fn evaluate(
        &self,
        instrument: &Instrument,
        series: &PriceSeries,
        prior: Option<MarketState>,
    ) -> InstrumentEvaluation {
        let closes = series.closes();
        let rsi_values = calculate_rsi_series(&closes, self.policy.rsi_period, self.policy.smoothing);
        let macd_values = calculate_macd_histogram(&closes);

        let snapshot = series.last().map(|last| IndicatorSnapshot {
            date: last.date,
            close: last.close,
            rsi: rsi_values.last().copied().flatten(),
            macd_histogram: macd_values.last().copied().flatten(),
        });
        let rsi_history = RsiHistory {
            dates: series.dates(),
            values: rsi_values,
        };

        let required = self.policy.rsi_period + 1;
        let verdict = if series.len() < required {
            Err(AlertError::DataUnavailable {
                symbol: instrument.symbol.clone(),
                detail: format!("{} closes, need at least {}", series.len(), required),
            })
        } else {
            let rsi = snapshot.as_ref().and_then(|s| s.rsi);
            match rsi.zip(classify_value(rsi, &self.policy.thresholds)) {
                Some((rsi, state)) => Ok(self.decide_classified(rsi, state, prior)),
                None => Err(AlertError::IndeterminateIndicator {
                    symbol: instrument.symbol.clone(),
                }),
            }
        };

        InstrumentEvaluation {
            snapshot,
            rsi_history,
            verdict,
        }
    }

    /// Classify a defined RSI and decide whether the change is notifiable.
    pub fn decide(&self, rsi: f64, prior: Option<MarketState>) -> AlertDecision {
        let state = classify(rsi, &self.policy.thresholds);
        self.decide_classified(rsi, state, prior)
    }

    fn decide_classified(&self, rsi: f64, state: MarketState, prior: Option<MarketState>) -> AlertDecision {
        let transition = next_transition(prior, state);
        let notify = match transition {
            Some(Transition::ReturnedToNeutral) => self.policy.notify_on_return_to_neutral,
            Some(_) => true,
            None => false,
        };
        AlertDecision {
            state,
            rsi,
            transition,
            notify,
        }
    }

    /// State to write back for a classified instrument; `None` leaves the
    /// stored entry untouched.
    pub fn next_record_state(&self, decision: &AlertDecision, delivery: Delivery) -> Option<MarketState> {
        match delivery {
            Delivery::Failed if !self.policy.update_state_on_delivery_failure => None,
            _ => Some(decision.state),
        }
    }
}
