use chrono::NaiveDate;
use thiserror::Error;

/// Every failure the rate pipeline can surface.
///
/// `Display` strings are safe to show to a user. Upstream diagnostics
/// (status code, response body) travel as fields and only ever reach the
/// logs.
#[derive(Debug, Error)]
pub enum RatesError {
    #[error("invalid date '{input}', expected YYYY-MM-DD")]
    MalformedDate { input: String },

    #[error("start date {start} cannot be after end date {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },

    #[error("date range spans {days} days, maximum is {max_days} calendar days")]
    RangeTooLarge { days: i64, max_days: i64 },

    #[error("no data found for {currency} between {start} and {end}")]
    NoDataForRange {
        currency: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("failed to reach the exchange rate service, check the connection")]
    UpstreamUnavailable {
        status: Option<u16>,
        detail: String,
    },

    #[error("local rate store is unavailable")]
    StorageUnavailable(#[source] anyhow::Error),
}

impl RatesError {
    pub(crate) fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        RatesError::StorageUnavailable(anyhow::Error::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_detail_stays_out_of_display() {
        let err = RatesError::UpstreamUnavailable {
            status: Some(503),
            detail: "<html>secret backend trace</html>".to_string(),
        };
        let shown = err.to_string();
        assert!(!shown.contains("503"));
        assert!(!shown.contains("secret"));
    }

    #[test]
    fn range_errors_mention_the_limits() {
        let err = RatesError::RangeTooLarge {
            days: 120,
            max_days: 93,
        };
        assert!(err.to_string().contains("93"));
    }
}
