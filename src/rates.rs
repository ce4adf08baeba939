//! Cache reconciliation: decide whether the local store already covers a
//! requested range and refetch from the remote source when it does not.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::dates;
use crate::error::RatesError;
use crate::rate_source::{RateObservation, RateSource};
use crate::store::RateStore;

pub struct RateService<S, R> {
    store: S,
    remote: R,
}

impl<S: RateStore, R: RateSource> RateService<S, R> {
    pub fn new(store: S, remote: R) -> Self {
        Self { store, remote }
    }

    /// Authoritative observations for `currency` within `start..=end`.
    ///
    /// The cache is sufficient only when every business day of the range is
    /// already stored; a single missing day refetches the whole range. The
    /// store alone shapes the response: after any fetch the rows are re-read
    /// so that deduplication on write is reflected in what is served.
    pub async fn get_rates(
        &self,
        currency: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RateObservation>, RatesError> {
        let required = dates::business_days_in_range(start, end);
        if required.is_empty() {
            debug!(%currency, %start, %end, "no business days in range, serving store contents");
            return self.store.query(currency, start, end).await;
        }

        let present = self.store.dates_present(currency, start, end).await?;
        if required.iter().all(|day| present.contains(day)) {
            info!(%currency, %start, %end, "requested range fully cached");
        } else {
            info!(%currency, %start, %end, "cache incomplete, fetching range from remote source");
            let fetched = self.remote.fetch_rates(currency, start, end).await?;
            self.store.upsert_many(&fetched).await?;
        }

        self.store.query(currency, start, end).await
    }

    pub async fn available_currencies(&self) -> Result<Vec<String>, RatesError> {
        self.remote.fetch_available_currencies().await
    }
}
