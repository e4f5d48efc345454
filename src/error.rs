//! Error taxonomy shared across the engine layers.

use std::time::Duration;
use thiserror::Error;

/// Failure while fetching a price series from the market-data provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("HTTP request failed")]
    Http(#[source] reqwest::Error),
    #[error("provider returned status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("malformed provider response: {0}")]
    Decode(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ProviderError {
    /// Timeouts, connection failures, throttling and upstream 5xx are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::Timeout(_) => true,
            ProviderError::Http(e) => e.is_connect() || e.is_request(),
            ProviderError::Status { status, .. } => *status == 429 || *status >= 500,
            ProviderError::Decode(_) | ProviderError::InvalidRequest(_) => false,
        }
    }
}

/// Failure delivering a notification or image to the messaging destination.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("delivery timed out after {0:?}")]
    Timeout(Duration),
    #[error("HTTP request failed")]
    Http(#[source] reqwest::Error),
    #[error("messaging API rejected the request ({code}): {description}")]
    Rejected { code: i64, description: String },
    #[error("failed to read attachment: {0}")]
    Attachment(#[from] std::io::Error),
}

/// Failure reading or writing the persisted state record.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("state file I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("state file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to replace state file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Failure producing the chart artifact.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("nothing to plot")]
    Empty,
    #[error("chart I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to replace chart file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Per-instrument and per-run failure classes.
#[derive(Debug, Error)]
pub enum AlertError {
    #[error("no usable price data for {symbol}: {detail}")]
    DataUnavailable { symbol: String, detail: String },
    #[error("RSI is undefined for {symbol}")]
    IndeterminateIndicator { symbol: String },
    #[error("price provider failed for {symbol}: {source}")]
    Provider {
        symbol: String,
        #[source]
        source: ProviderError,
    },
    #[error("state persistence failed: {0}")]
    Persistence(#[from] StoreError),
}

/// Failure wiring the runtime's collaborators at startup.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("failed to build price provider: {0}")]
    Provider(#[from] ProviderError),
    #[error("failed to build notifier: {0}")]
    Notifier(#[from] DeliveryError),
}
