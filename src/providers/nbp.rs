//! Client for the National Bank of Poland web API, table A mid rates.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::dates;
use crate::error::RatesError;
use crate::rate_source::{RateObservation, RateSource};

/// All table A rates are quoted against the Polish złoty.
pub const REFERENCE_CURRENCY: &str = "PLN";

pub const DEFAULT_BASE_URL: &str = "https://api.nbp.pl";

pub struct NbpClient {
    base_url: String,
    timeout: Duration,
}

impl NbpClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        NbpClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    fn http_client(&self) -> Result<reqwest::Client, RatesError> {
        reqwest::Client::builder()
            .user_agent("ratescope/0.1")
            .timeout(self.timeout)
            .build()
            .map_err(|e| RatesError::UpstreamUnavailable {
                status: None,
                detail: e.to_string(),
            })
    }

    async fn get_text(&self, url: &str) -> Result<(reqwest::StatusCode, String), RatesError> {
        debug!(%url, "sending GET request to NBP API");
        let response = self.http_client()?.get(url).send().await.map_err(|e| {
            warn!(error = %e, %url, "transport failure talking to NBP API");
            RatesError::UpstreamUnavailable {
                status: None,
                detail: e.to_string(),
            }
        })?;
        let status = response.status();
        let body = response.text().await.map_err(|e| {
            warn!(error = %e, %url, "failed to read NBP API response body");
            RatesError::UpstreamUnavailable {
                status: Some(status.as_u16()),
                detail: e.to_string(),
            }
        })?;
        debug!(status = %status, "received NBP API response");
        Ok((status, body))
    }

    fn unexpected_status(status: reqwest::StatusCode, body: &str) -> RatesError {
        warn!(status = %status, body, "unexpected response from NBP API");
        RatesError::UpstreamUnavailable {
            status: Some(status.as_u16()),
            detail: body.to_string(),
        }
    }

    fn malformed_payload(
        status: reqwest::StatusCode,
        err: &serde_json::Error,
        body: &str,
    ) -> RatesError {
        warn!(status = %status, error = %err, body, "malformed payload from NBP API");
        RatesError::UpstreamUnavailable {
            status: Some(status.as_u16()),
            detail: err.to_string(),
        }
    }
}

// The tables endpoint answers with a one-element list wrapping the whole
// daily table; the per-currency endpoint answers with a single series.
#[derive(Debug, Deserialize)]
struct RateTable {
    rates: Vec<TableEntry>,
}

#[derive(Debug, Deserialize)]
struct TableEntry {
    code: String,
}

#[derive(Debug, Deserialize)]
struct RateSeries {
    code: String,
    rates: Vec<SeriesEntry>,
}

#[derive(Debug, Deserialize)]
struct SeriesEntry {
    #[serde(rename = "effectiveDate")]
    effective_date: NaiveDate,
    mid: f64,
}

#[async_trait]
impl RateSource for NbpClient {
    async fn fetch_available_currencies(&self) -> Result<Vec<String>, RatesError> {
        let url = format!("{}/api/exchangerates/tables/a/?format=json", self.base_url);
        let (status, body) = self.get_text(&url).await?;
        if !status.is_success() {
            return Err(Self::unexpected_status(status, &body));
        }
        let tables: Vec<RateTable> = serde_json::from_str(&body)
            .map_err(|e| Self::malformed_payload(status, &e, &body))?;
        let table = tables.into_iter().next().ok_or_else(|| {
            warn!("NBP API returned an empty table list");
            RatesError::UpstreamUnavailable {
                status: Some(status.as_u16()),
                detail: "empty table list".to_string(),
            }
        })?;

        let mut codes: Vec<String> = table.rates.into_iter().map(|entry| entry.code).collect();
        codes.sort();
        Ok(codes)
    }

    async fn fetch_rates(
        &self,
        currency: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RateObservation>, RatesError> {
        let url = format!(
            "{}/api/exchangerates/rates/a/{}/{}/{}/?format=json",
            self.base_url,
            currency,
            dates::format_date(start),
            dates::format_date(end),
        );
        let (status, body) = self.get_text(&url).await?;
        if status == reqwest::StatusCode::NOT_FOUND {
            debug!(%currency, %start, %end, "NBP API reports no data for the requested range");
            return Err(RatesError::NoDataForRange {
                currency: currency.to_string(),
                start,
                end,
            });
        }
        if !status.is_success() {
            return Err(Self::unexpected_status(status, &body));
        }
        let RateSeries { code, rates } = serde_json::from_str(&body)
            .map_err(|e| Self::malformed_payload(status, &e, &body))?;

        Ok(rates
            .into_iter()
            .map(|entry| RateObservation {
                date: entry.effective_date,
                // The upstream echoes the canonical code; persist that one.
                currency: code.clone(),
                rate: entry.mid,
            })
            .collect())
    }
}
