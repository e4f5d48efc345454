//! Yahoo Finance daily price provider implementation

use crate::error::ProviderError;
use crate::models::indicators::{PricePoint, PriceSeries};
use crate::services::market_data::PriceProvider;
use backon::{ExponentialBuilder, Retryable};
use chrono::{DateTime, NaiveDate, NaiveTime};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::messages::{ChartResponse, ChartResult};

const USER_AGENT: &str = "Mozilla/5.0 (compatible; marketpulse/0.1)";

pub struct YahooPriceProvider {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
    max_retries: usize,
    retry_delay: Duration,
}

impl YahooPriceProvider {
    /// Provider with its own HTTP client bounded by `timeout` per request.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(ProviderError::Http)?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            timeout,
            max_retries: 2,
            retry_delay: Duration::from_millis(500),
        })
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
            max_retries: 2,
            retry_delay: Duration::from_millis(500),
        }
    }

    pub fn with_retry(mut self, max_retries: usize, retry_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = retry_delay;
        self
    }

    fn chart_url(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<Url, ProviderError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ProviderError::InvalidRequest(format!("bad base URL '{}': {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| ProviderError::InvalidRequest(format!("base URL '{}' cannot have a path", self.base_url)))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", symbol]);

        let period1 = start.and_time(NaiveTime::MIN).and_utc().timestamp();
        let period2 = end
            .succ_opt()
            .unwrap_or(end)
            .and_time(NaiveTime::MIN)
            .and_utc()
            .timestamp();
        url.query_pairs_mut()
            .append_pair("period1", &period1.to_string())
            .append_pair("period2", &period2.to_string())
            .append_pair("interval", "1d")
            .append_pair("includeAdjustedClose", "true");
        Ok(url)
    }

    async fn fetch_once(&self, url: &Url) -> Result<Option<ChartResponse>, ProviderError> {
        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(self.timeout)
            } else {
                ProviderError::Http(e)
            }
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(self.timeout)
            } else {
                ProviderError::Http(e)
            }
        })?;

        if status == StatusCode::NOT_FOUND {
            // unknown or delisted symbol
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let parsed: ChartResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Decode(e.to_string()))?;
        Ok(Some(parsed))
    }
}

/// Convert one chart result into dated closes within `[start, end]`.
///
/// Adjusted closes are preferred when the provider sends a complete column;
/// bars without a close are dropped.
fn to_series(result: &ChartResult, start: NaiveDate, end: NaiveDate) -> PriceSeries {
    let adjusted = result
        .indicators
        .adjclose
        .first()
        .map(|a| &a.adjclose)
        .filter(|closes| closes.len() == result.timestamp.len());
    let closes = match adjusted {
        Some(closes) => closes.as_slice(),
        None => result
            .indicators
            .quote
            .first()
            .map(|q| q.close.as_slice())
            .unwrap_or(&[]),
    };

    let offset = result.meta.gmtoffset;
    let points = result
        .timestamp
        .iter()
        .zip(closes.iter())
        .filter_map(|(ts, close)| {
            let close = (*close)?;
            let date = DateTime::from_timestamp(ts + offset, 0)?.date_naive();
            (date >= start && date <= end).then(|| PricePoint::new(date, close))
        });

    PriceSeries::from_points(points)
}

#[async_trait::async_trait]
impl PriceProvider for YahooPriceProvider {
    async fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, ProviderError> {
        let url = self.chart_url(symbol, start, end)?;
        let backoff = ExponentialBuilder::default()
            .with_min_delay(self.retry_delay)
            .with_max_times(self.max_retries);

        let response = (|| async { self.fetch_once(&url).await })
            .retry(backoff)
            .when(|e: &ProviderError| e.is_retryable())
            .notify(|e: &ProviderError, delay: Duration| {
                warn!(
                    symbol = %symbol,
                    error = %e,
                    delay_ms = delay.as_millis() as u64,
                    "YahooPriceProvider: request failed, retrying"
                );
            })
            .await?;

        let Some(response) = response else {
            debug!(symbol = %symbol, "YahooPriceProvider: symbol not found");
            return Ok(PriceSeries::default());
        };

        if let Some(err) = response.chart.error {
            if err.code.eq_ignore_ascii_case("not found") {
                return Ok(PriceSeries::default());
            }
            return Err(ProviderError::Decode(format!("{}: {}", err.code, err.description)));
        }

        let series = response
            .chart
            .result
            .as_ref()
            .and_then(|results| results.first())
            .map(|result| to_series(result, start, end))
            .unwrap_or_default();

        debug!(
            symbol = %symbol,
            count = series.len(),
            "YahooPriceProvider: fetched {} daily closes for {}",
            series.len(),
            symbol
        );
        Ok(series)
    }
}
