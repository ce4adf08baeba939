use std::collections::BTreeSet;
use std::path::Path;

use async_trait::async_trait;
use chrono::NaiveDate;
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle};
use tracing::debug;

use crate::dates;
use crate::error::RatesError;
use crate::rate_source::RateObservation;
use crate::store::RateStore;

/// Rate observations persisted in a fjall keyspace.
///
/// Keys are `"{CODE}/{YYYY-MM-DD}"`, so a lexicographic range scan over one
/// currency prefix walks its dates in ascending order. Values hold the rate
/// as JSON. `upsert_many` commits a single batch, so readers never observe a
/// partially written fetch result.
pub struct DiskRateStore {
    keyspace: Keyspace,
    rates: PartitionHandle,
}

impl DiskRateStore {
    pub fn open(path: &Path) -> Result<Self, RatesError> {
        debug!(path = %path.display(), "opening rate store");
        let keyspace = fjall::Config::new(path)
            .open()
            .map_err(RatesError::storage)?;
        let rates = keyspace
            .open_partition("rates", PartitionCreateOptions::default())
            .map_err(RatesError::storage)?;
        Ok(Self { keyspace, rates })
    }

    fn key(currency: &str, date: NaiveDate) -> String {
        format!("{currency}/{}", dates::format_date(date))
    }

    fn decode(key: &[u8], value: &[u8]) -> Result<RateObservation, RatesError> {
        let key = std::str::from_utf8(key).map_err(RatesError::storage)?;
        let (currency, date) = key.split_once('/').ok_or_else(|| {
            RatesError::StorageUnavailable(anyhow::anyhow!("malformed store key: {key}"))
        })?;
        let date =
            NaiveDate::parse_from_str(date, dates::DATE_FORMAT).map_err(RatesError::storage)?;
        let rate: f64 = serde_json::from_slice(value).map_err(RatesError::storage)?;
        Ok(RateObservation {
            date,
            currency: currency.to_string(),
            rate,
        })
    }
}

#[async_trait]
impl RateStore for DiskRateStore {
    async fn upsert_many(&self, observations: &[RateObservation]) -> Result<(), RatesError> {
        let mut batch = self.keyspace.batch();
        for obs in observations {
            let value = serde_json::to_vec(&obs.rate).map_err(RatesError::storage)?;
            batch.insert(&self.rates, Self::key(&obs.currency, obs.date), value);
        }
        batch.commit().map_err(RatesError::storage)?;
        debug!(count = observations.len(), "committed rate batch");
        Ok(())
    }

    async fn query(
        &self,
        currency: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RateObservation>, RatesError> {
        let range = Self::key(currency, start)..=Self::key(currency, end);
        let mut rows = Vec::new();
        for entry in self.rates.range(range) {
            let (key, value) = entry.map_err(RatesError::storage)?;
            rows.push(Self::decode(&key, &value)?);
        }
        Ok(rows)
    }

    async fn dates_present(
        &self,
        currency: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BTreeSet<NaiveDate>, RatesError> {
        let rows = self.query(currency, start, end).await?;
        Ok(rows.into_iter().map(|obs| obs.date).collect())
    }
}
