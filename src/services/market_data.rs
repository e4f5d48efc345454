//! Market data provider interface.

use crate::error::ProviderError;
use crate::models::indicators::PriceSeries;
use chrono::NaiveDate;

#[async_trait::async_trait]
pub trait PriceProvider {
    /// Daily closes for `symbol` between `start` and `end` (inclusive).
    ///
    /// An unknown symbol or an empty window is an empty series, not an error.
    async fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, ProviderError>;
}
