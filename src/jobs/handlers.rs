//! Job handler for the per-instrument evaluation workflow
//!
//! fetch → indicators → classify → compare with stored state → notify.
//! Every failure is captured in the returned report so one instrument can
//! never abort the batch.

use crate::error::{AlertError, DeliveryError};
use crate::jobs::context::JobContext;
use crate::jobs::types::{DeliveryOutcome, EvaluateInstrumentJob, InstrumentOutcome, InstrumentReport};
use crate::signals::engine::Delivery;
use chrono::Duration;
use tracing::{debug, error, info, warn};

pub async fn handle_evaluate_instrument(job: EvaluateInstrumentJob, ctx: &JobContext) -> InstrumentReport {
    let EvaluateInstrumentJob {
        instrument,
        prior,
        end_date,
    } = job;
    let symbol = instrument.symbol.clone();
    let start_date = end_date - Duration::days(ctx.lookback_days);

    debug!(
        symbol = %symbol,
        start = %start_date,
        end = %end_date,
        "EvaluateInstrument: fetching daily closes for {}",
        symbol
    );

    let series = match ctx.provider.fetch(&symbol, start_date, end_date).await {
        Ok(series) => series,
        Err(e) => {
            error!(symbol = %symbol, error = %e, "EvaluateInstrument: price fetch failed for {}", symbol);
            return InstrumentReport {
                instrument,
                prior,
                snapshot: None,
                rsi_history: None,
                outcome: InstrumentOutcome::Failed(AlertError::Provider {
                    symbol: symbol.clone(),
                    source: e,
                }),
                next_state: None,
            };
        }
    };

    let evaluation = ctx.engine.evaluate(&instrument, &series, prior);

    let decision = match evaluation.verdict {
        Ok(decision) => decision,
        Err(reason) => {
            let kind = match reason {
                AlertError::DataUnavailable { .. } => "data_unavailable",
                _ => "indeterminate_indicator",
            };
            info!(
                symbol = %symbol,
                reason = kind,
                detail = %reason,
                prior = ?prior,
                "EvaluateInstrument: skipping {} this run",
                symbol
            );
            return InstrumentReport {
                instrument,
                prior,
                snapshot: evaluation.snapshot,
                rsi_history: Some(evaluation.rsi_history),
                outcome: InstrumentOutcome::Skipped(reason),
                next_state: None,
            };
        }
    };

    info!(
        symbol = %symbol,
        rsi = decision.rsi,
        state = %decision.state,
        prior = ?prior,
        transition = ?decision.transition,
        "EvaluateInstrument: {} classified {} (RSI {:.2})",
        symbol,
        decision.state,
        decision.rsi
    );

    let delivery = match (decision.transition, decision.notification(&instrument)) {
        (None, _) => DeliveryOutcome::NotRequired,
        (Some(transition), None) => {
            debug!(
                symbol = %symbol,
                transition = ?transition,
                "EvaluateInstrument: transition not reported by policy"
            );
            DeliveryOutcome::Suppressed(transition)
        }
        (Some(transition), Some(notification)) => {
            let message = notification.message();
            match send_with_timeout(ctx, &message).await {
                Ok(()) => {
                    info!(symbol = %symbol, transition = ?transition, "EvaluateInstrument: notification sent for {}", symbol);
                    DeliveryOutcome::Sent(transition)
                }
                Err(e) => {
                    warn!(
                        symbol = %symbol,
                        transition = ?transition,
                        error = %e,
                        "EvaluateInstrument: notification delivery failed for {}",
                        symbol
                    );
                    DeliveryOutcome::Failed { transition, error: e }
                }
            }
        }
    };

    let delivery_status = match &delivery {
        DeliveryOutcome::Sent(_) => Delivery::Delivered,
        DeliveryOutcome::Failed { .. } => Delivery::Failed,
        DeliveryOutcome::NotRequired | DeliveryOutcome::Suppressed(_) => Delivery::NotAttempted,
    };
    let next_state = ctx.engine.next_record_state(&decision, delivery_status);
    if next_state.is_none() {
        warn!(
            symbol = %symbol,
            prior = ?prior,
            "EvaluateInstrument: keeping stored state for {} so the alert is retried next run",
            symbol
        );
    }

    InstrumentReport {
        instrument,
        prior,
        snapshot: evaluation.snapshot,
        rsi_history: Some(evaluation.rsi_history),
        outcome: InstrumentOutcome::Classified { decision, delivery },
        next_state,
    }
}

async fn send_with_timeout(ctx: &JobContext, message: &str) -> Result<(), DeliveryError> {
    match tokio::time::timeout(ctx.delivery_timeout, ctx.notifier.send_text(&ctx.destination, message)).await {
        Ok(result) => result,
        Err(_) => Err(DeliveryError::Timeout(ctx.delivery_timeout)),
    }
}
