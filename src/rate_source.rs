use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::RatesError;

/// One exchange rate quote: the value of 1 unit of `currency` expressed in
/// the reference currency, on a single calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateObservation {
    pub date: NaiveDate,
    pub currency: String,
    pub rate: f64,
}

/// Remote service publishing the daily rate table.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Currency codes the upstream currently quotes, alphabetically sorted.
    async fn fetch_available_currencies(&self) -> Result<Vec<String>, RatesError>;

    /// Published rates for `currency` within `start..=end`.
    ///
    /// Returns [`RatesError::NoDataForRange`] when the upstream reports no
    /// published rates for the combination, e.g. a brand-new code or a range
    /// made of non-trading days only.
    async fn fetch_rates(
        &self,
        currency: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RateObservation>, RatesError>;
}
