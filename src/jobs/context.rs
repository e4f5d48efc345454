//! Job context for dependency injection

use crate::services::market_data::PriceProvider;
use crate::services::notifier::NotificationSink;
use crate::signals::engine::AlertEngine;
use std::sync::Arc;
use std::time::Duration;

/// Shared, read-only dependencies of the evaluation handlers.
///
/// The state record is deliberately absent: handlers get the prior state in
/// the job and return the next state, the runtime owns the record.
pub struct JobContext {
    pub provider: Arc<dyn PriceProvider + Send + Sync>,
    pub notifier: Arc<dyn NotificationSink + Send + Sync>,
    /// Messaging destination (chat id).
    pub destination: String,
    pub engine: AlertEngine,
    pub lookback_days: i64,
    /// Upper bound on a single notification delivery.
    pub delivery_timeout: Duration,
}

impl JobContext {
    pub fn new(
        provider: Arc<dyn PriceProvider + Send + Sync>,
        notifier: Arc<dyn NotificationSink + Send + Sync>,
        destination: impl Into<String>,
        engine: AlertEngine,
    ) -> Self {
        Self {
            provider,
            notifier,
            destination: destination.into(),
            engine,
            lookback_days: 365,
            delivery_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_lookback_days(mut self, days: i64) -> Self {
        self.lookback_days = days;
        self
    }

    pub fn with_delivery_timeout(mut self, timeout: Duration) -> Self {
        self.delivery_timeout = timeout;
        self
    }
}
