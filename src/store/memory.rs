use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;

use crate::error::RatesError;
use crate::rate_source::RateObservation;
use crate::store::RateStore;

/// In-memory twin of the disk store, same contract, nothing persisted.
/// Backs the engine tests and runs without a writable data directory.
#[derive(Default)]
pub struct MemoryRateStore {
    rows: Mutex<BTreeMap<(String, NaiveDate), f64>>,
}

impl MemoryRateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RateStore for MemoryRateStore {
    async fn upsert_many(&self, observations: &[RateObservation]) -> Result<(), RatesError> {
        let mut rows = self.rows.lock().await;
        for obs in observations {
            rows.insert((obs.currency.clone(), obs.date), obs.rate);
        }
        Ok(())
    }

    async fn query(
        &self,
        currency: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RateObservation>, RatesError> {
        let rows = self.rows.lock().await;
        let window = (currency.to_string(), start)..=(currency.to_string(), end);
        Ok(rows
            .range(window)
            .map(|((currency, date), rate)| RateObservation {
                date: *date,
                currency: currency.clone(),
                rate: *rate,
            })
            .collect())
    }

    async fn dates_present(
        &self,
        currency: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BTreeSet<NaiveDate>, RatesError> {
        let rows = self.rows.lock().await;
        let window = (currency.to_string(), start)..=(currency.to_string(), end);
        Ok(rows.range(window).map(|((_, date), _)| *date).collect())
    }
}
