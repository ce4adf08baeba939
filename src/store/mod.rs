pub mod disk;
pub mod memory;

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::RatesError;
use crate::rate_source::RateObservation;

pub use disk::DiskRateStore;
pub use memory::MemoryRateStore;

/// Durable table of rate observations keyed by (currency, date).
///
/// An inaccessible store surfaces as [`RatesError::StorageUnavailable`],
/// never as an empty result.
#[async_trait]
pub trait RateStore: Send + Sync {
    /// Insert-or-replace every observation, all-or-nothing as one batch.
    async fn upsert_many(&self, observations: &[RateObservation]) -> Result<(), RatesError>;

    /// Matching observations ascending by date. Empty when nothing matches.
    async fn query(
        &self,
        currency: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RateObservation>, RatesError>;

    /// Date projection of `query`, for coverage checks.
    async fn dates_present(
        &self,
        currency: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BTreeSet<NaiveDate>, RatesError>;
}
